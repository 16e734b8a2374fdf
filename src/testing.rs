//! Host-side fakes for the kicker's hardware capabilities.
//!
//! All fakes share a virtual [`Clock`] that only moves when a [`FakeDelay`]
//! is awaited, so pulse widths and poll spacing can be checked exactly.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{self, ErrorKind, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;

use crate::config::PWM_PERIOD_TICKS;
use crate::error::SensorError;
use crate::sensor::{ChargeSample, ChargeSensor};

pub const NS_PER_MS: u64 = 1_000_000;

#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ns(&self) -> u64 {
        self.0.get()
    }

    pub fn now_ms(&self) -> u64 {
        self.0.get() / NS_PER_MS
    }

    fn advance(&self, ns: u64) {
        self.0.set(self.0.get() + ns);
    }
}

/// Advances the shared clock by exactly the requested amount.
pub struct FakeDelay {
    clock: Clock,
}

impl FakeDelay {
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
        }
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.clock.advance(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.clock.advance(u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.clock.advance(u64::from(ms) * NS_PER_MS);
    }
}

/// A delay that never completes.
pub struct StalledDelay;

impl DelayNs for StalledDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        core::future::pending::<()>().await
    }
}

#[derive(Clone)]
pub struct RecordingPin {
    clock: Clock,
    history: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl RecordingPin {
    /// Starts low, the reset level of the board's push-pull outputs.
    pub fn new(clock: &Clock) -> Self {
        Self {
            clock: clock.clone(),
            history: Rc::new(RefCell::new(vec![(clock.now_ns(), false)])),
        }
    }

    pub fn is_high(&self) -> bool {
        self.history.borrow().last().is_some_and(|&(_, level)| level)
    }

    /// Every level written, including repeats.
    pub fn writes(&self) -> Vec<bool> {
        self.history.borrow().iter().skip(1).map(|&(_, l)| l).collect()
    }

    /// `(rise, fall)` timestamps in ns of every completed high pulse.
    pub fn pulses(&self) -> Vec<(u64, u64)> {
        let mut pulses = Vec::new();
        let mut rise = None;
        let mut level = false;
        for &(t, l) in self.history.borrow().iter() {
            match (level, l) {
                (false, true) => rise = Some(t),
                (true, false) => pulses.extend(rise.take().map(|r| (r, t))),
                _ => {}
            }
            level = l;
        }
        pulses
    }

    fn write(&mut self, level: bool) {
        self.history.borrow_mut().push((self.clock.now_ns(), level));
    }
}

impl digital::ErrorType for RecordingPin {
    type Error = Infallible;
}

impl OutputPin for RecordingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

pub struct FailingPin;

impl digital::ErrorType for FailingPin {
    type Error = ErrorKind;
}

impl OutputPin for FailingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(ErrorKind::Other)
    }
}

impl InputPin for FailingPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Err(ErrorKind::Other)
    }
}

/// Input line that is high during the given `[start, end)` windows (ms).
pub struct ScriptedLine {
    clock: Clock,
    windows: Vec<(u64, u64)>,
}

impl ScriptedLine {
    pub fn high_during(clock: &Clock, windows_ms: &[(u64, u64)]) -> Self {
        Self {
            clock: clock.clone(),
            windows: windows_ms
                .iter()
                .map(|&(s, e)| (s * NS_PER_MS, e * NS_PER_MS))
                .collect(),
        }
    }

    pub fn low(clock: &Clock) -> Self {
        Self::high_during(clock, &[])
    }
}

impl digital::ErrorType for ScriptedLine {
    type Error = Infallible;
}

impl InputPin for ScriptedLine {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let now = self.clock.now_ns();
        Ok(self.windows.iter().any(|&(s, e)| (s..e).contains(&now)))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// PWM channel whose maximum equals the PWM period, so duties read back as ticks.
#[derive(Clone)]
pub struct RecordingPwm {
    duties: Rc<RefCell<Vec<u16>>>,
}

impl RecordingPwm {
    pub fn new() -> Self {
        Self {
            duties: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn duties(&self) -> Vec<u16> {
        self.duties.borrow().clone()
    }

    pub fn current(&self) -> Option<u16> {
        self.duties.borrow().last().copied()
    }
}

impl pwm::ErrorType for RecordingPwm {
    type Error = Infallible;
}

impl SetDutyCycle for RecordingPwm {
    fn max_duty_cycle(&self) -> u16 {
        PWM_PERIOD_TICKS
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duties.borrow_mut().push(duty);
        Ok(())
    }
}

pub struct FailingPwm;

impl pwm::ErrorType for FailingPwm {
    type Error = pwm::ErrorKind;
}

impl SetDutyCycle for FailingPwm {
    fn max_duty_cycle(&self) -> u16 {
        PWM_PERIOD_TICKS
    }

    fn set_duty_cycle(&mut self, _duty: u16) -> Result<(), Self::Error> {
        Err(pwm::ErrorKind::Other)
    }
}

/// Replays raw converter values, then reports a read failure once exhausted.
pub struct ScriptedSensor {
    readings: VecDeque<Result<u16, SensorError>>,
}

impl ScriptedSensor {
    pub fn new(raw: &[u16]) -> Self {
        Self {
            readings: raw.iter().copied().map(Ok).collect(),
        }
    }

    pub fn then_fail(mut self, e: SensorError) -> Self {
        self.readings.push_back(Err(e));
        self
    }
}

impl ChargeSensor for ScriptedSensor {
    async fn sample(&mut self) -> Result<ChargeSample, SensorError> {
        let raw = self.readings.pop_front().unwrap_or(Err(SensorError::ReadFailed))?;
        ChargeSample::new(raw)
    }
}
