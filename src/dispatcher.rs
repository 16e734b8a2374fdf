//! Fire Dispatcher.
//!
//! Watches KICK_CMD and turns it into a fixed-length discharge pulse. The
//! command is level-triggered: the line is sampled once per poll cycle and
//! never during a pulse, so a master that keeps KICK_CMD asserted gets a new
//! pulse every `PULSE_DURATION_MS + POLL_INTERVAL_MS`.

use core::convert::Infallible;

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::config::{POLL_INTERVAL_MS, PULSE_DURATION_MS};
use crate::error::{Error, Line};
use crate::signal::SignalLine;

/// Owns the KICK_CMD input, the discharge driver and the status indicator.
pub struct FireDispatcher<C, D, L> {
    command: C,
    discharge: SignalLine<D>,
    indicator: SignalLine<L>,
    pulses: u32,
}

impl<C, D, L> FireDispatcher<C, D, L>
where
    C: InputPin,
    D: OutputPin,
    L: OutputPin,
{
    pub fn new(command: C, discharge: D, indicator: L) -> Self {
        Self {
            command,
            discharge: SignalLine::new(discharge, Line::Discharge),
            indicator: SignalLine::new(indicator, Line::Indicator),
            pulses: 0,
        }
    }

    /// Pulses fired since startup.
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Startup state: indicator off, discharge off.
    pub fn init(&mut self) -> Result<(), Error> {
        self.indicator.deassert()?;
        self.discharge.deassert()
    }

    /// Samples KICK_CMD once and fires if it is asserted.
    ///
    /// Returns whether a pulse was fired.
    pub async fn dispatch<T: DelayNs>(&mut self, delay: &mut T) -> Result<bool, Error> {
        if !self.command.is_high().map_err(|_| Error::Command)? {
            return Ok(false);
        }
        self.fire(delay).await?;
        Ok(true)
    }

    /// Drives one discharge pulse of `PULSE_DURATION_MS`.
    ///
    /// Blocks the dispatcher for the whole pulse. If this future is dropped
    /// mid-pulse both outputs are still deasserted.
    pub async fn fire<T: DelayNs>(&mut self, delay: &mut T) -> Result<(), Error> {
        let pulse = FirePulse::begin(&mut self.indicator, &mut self.discharge)?;
        delay.delay_ms(PULSE_DURATION_MS).await;
        pulse.end()?;

        self.pulses = self.pulses.wrapping_add(1);

        #[cfg(feature = "defmt")]
        defmt::info!("kick #{}", self.pulses);

        Ok(())
    }

    /// Dispatches once, then sleeps for the poll interval.
    pub async fn cycle<T: DelayNs>(&mut self, delay: &mut T) -> Result<bool, Error> {
        let fired = self.dispatch(delay).await?;
        delay.delay_ms(POLL_INTERVAL_MS).await;
        Ok(fired)
    }

    /// Dispatches forever.
    ///
    /// Only returns on a fault, after discharge and indicator are deasserted.
    pub async fn run<T: DelayNs>(&mut self, mut delay: T) -> Result<Infallible, Error> {
        let fault = match self.init() {
            Ok(()) => loop {
                if let Err(e) = self.cycle(&mut delay).await {
                    break e;
                }
            },
            Err(e) => e,
        };

        #[cfg(feature = "defmt")]
        defmt::error!("fire dispatcher stopped after {} kicks: {}", self.pulses, fault);

        self.disable();
        Err(fault)
    }

    /// Best-effort safe state. Errors are ignored; the caller already has a fault.
    pub fn disable(&mut self) {
        let _ = self.discharge.deassert();
        let _ = self.indicator.deassert();
    }
}

/// Discharge and indicator held asserted.
///
/// Ending the pulse explicitly reports driver errors; dropping it releases
/// both outputs silently.
#[must_use]
struct FirePulse<'a, L: OutputPin, D: OutputPin> {
    indicator: &'a mut SignalLine<L>,
    discharge: &'a mut SignalLine<D>,
    active: bool,
}

impl<'a, L: OutputPin, D: OutputPin> FirePulse<'a, L, D> {
    fn begin(
        indicator: &'a mut SignalLine<L>,
        discharge: &'a mut SignalLine<D>,
    ) -> Result<Self, Error> {
        let mut pulse = Self {
            indicator,
            discharge,
            active: true,
        };
        pulse.indicator.assert()?;
        pulse.discharge.assert()?;
        Ok(pulse)
    }

    fn end(mut self) -> Result<(), Error> {
        self.active = false;
        let indicator = self.indicator.deassert();
        let discharge = self.discharge.deassert();
        indicator.and(discharge)
    }
}

impl<L: OutputPin, D: OutputPin> Drop for FirePulse<'_, L, D> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.indicator.deassert();
            let _ = self.discharge.deassert();
        }
    }
}
