//! Charge Regulator.
//!
//! Keeps the kick capacitor charged and tells the master whether a kick is
//! possible. Every cycle takes one sample, compares it against
//! [`CHARGE_THRESHOLD`] and drives the READY line and the charging PWM from
//! the result. The decision is memoryless: there is no hysteresis band, so a
//! sample sitting exactly on the boundary flips the outputs every cycle it
//! crosses.
//!
//! ```text
//!            sample >= threshold
//! CHARGING ──────────────────────▶ READY
//!    ▲                               │
//!    └───────────────────────────────┘
//!            sample <  threshold
//! ```

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

use crate::config::{CHARGE_THRESHOLD, LOADING_DUTY_TICKS, POLL_INTERVAL_MS, PWM_PERIOD_TICKS};
use crate::error::{Error, Line};
use crate::sensor::{ChargeSample, ChargeSensor};
use crate::signal::SignalLine;

/// Whether the capacitor holds enough charge to kick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadinessState {
    #[default]
    Charging,
    Ready,
}

impl ReadinessState {
    /// Inclusive threshold test: a sample equal to the threshold is ready.
    pub const fn from_sample(sample: ChargeSample) -> Self {
        if sample.value() >= CHARGE_THRESHOLD {
            Self::Ready
        } else {
            Self::Charging
        }
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Charging is gated on/off; there is no intermediate duty.
    pub const fn duty_cycle(self) -> DutyCycle {
        match self {
            Self::Ready => DutyCycle::Off,
            Self::Charging => DutyCycle::Loading,
        }
    }
}

/// Duty applied to the charging actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutyCycle {
    Off,
    Loading,
}

impl DutyCycle {
    /// On-ticks out of [`PWM_PERIOD_TICKS`].
    pub const fn ticks(self) -> u16 {
        match self {
            Self::Off => 0,
            Self::Loading => LOADING_DUTY_TICKS,
        }
    }
}

/// Owns the charge sensor, the charging PWM channel and the READY line.
pub struct ChargeRegulator<S, P, R> {
    sensor: S,
    pwm: P,
    ready: SignalLine<R>,
    state: ReadinessState,
}

impl<S, P, R> ChargeRegulator<S, P, R>
where
    S: ChargeSensor,
    P: SetDutyCycle,
    R: OutputPin,
{
    pub fn new(sensor: S, pwm: P, ready: R) -> Self {
        Self {
            sensor,
            pwm,
            ready: SignalLine::new(ready, Line::Ready),
            state: ReadinessState::Charging,
        }
    }

    pub fn state(&self) -> ReadinessState {
        self.state
    }

    /// Puts the outputs in the startup state: not ready, charger idle.
    ///
    /// The charger stays off until the first sample has been validated.
    pub fn init(&mut self) -> Result<(), Error> {
        self.ready.deassert()?;
        self.set_duty(DutyCycle::Off)?;
        self.state = ReadinessState::Charging;
        Ok(())
    }

    /// One read-decide-act step.
    pub async fn regulate(&mut self) -> Result<ReadinessState, Error> {
        let sample = self.sensor.sample().await?;
        let state = ReadinessState::from_sample(sample);

        self.ready.drive(state.is_ready())?;
        self.set_duty(state.duty_cycle())?;

        if state != self.state {
            #[cfg(feature = "defmt")]
            defmt::info!("kicker {} at sample {}", state, sample.value());
        }
        self.state = state;

        Ok(state)
    }

    /// Regulates once, then sleeps for the poll interval.
    pub async fn cycle<D: DelayNs>(&mut self, delay: &mut D) -> Result<ReadinessState, Error> {
        let state = self.regulate().await?;
        delay.delay_ms(POLL_INTERVAL_MS).await;
        Ok(state)
    }

    /// Regulates forever.
    ///
    /// Only returns on a fault, after the charger has been switched off and
    /// READY deasserted.
    pub async fn run<D: DelayNs>(&mut self, mut delay: D) -> Result<Infallible, Error> {
        let fault = match self.init() {
            Ok(()) => loop {
                if let Err(e) = self.cycle(&mut delay).await {
                    break e;
                }
            },
            Err(e) => e,
        };

        #[cfg(feature = "defmt")]
        defmt::error!("charge regulator stopped: {}", fault);

        self.disable();
        Err(fault)
    }

    /// Best-effort safe state. Errors are ignored; the caller already has a fault.
    pub fn disable(&mut self) {
        let _ = self.set_duty(DutyCycle::Off);
        let _ = self.ready.deassert();
        self.state = ReadinessState::Charging;
    }

    fn set_duty(&mut self, duty: DutyCycle) -> Result<(), Error> {
        self.pwm
            .set_duty_cycle_fraction(duty.ticks(), PWM_PERIOD_TICKS)
            .map_err(|_| Error::Output(Line::ChargePwm))
    }
}
