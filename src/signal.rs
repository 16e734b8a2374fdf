//! Logical output lines shared by both processes.
//!
//! A [`SignalLine`] owns one digital output and speaks in terms of
//! asserted/deasserted rather than pin levels. All lines on the kicker
//! board are active-high push-pull, so asserting drives the pin high.
//! Driver errors are reported as [`Error::Output`] tagged with the line.

use embedded_hal::digital::OutputPin;

use crate::error::{Error, Line};

pub struct SignalLine<P> {
    pin: P,
    line: Line,
}

impl<P: OutputPin> SignalLine<P> {
    /// Wraps `pin` without touching its current level.
    pub fn new(pin: P, line: Line) -> Self {
        Self { pin, line }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn assert(&mut self) -> Result<(), Error> {
        self.pin.set_high().map_err(|_| Error::Output(self.line))
    }

    pub fn deassert(&mut self) -> Result<(), Error> {
        self.pin.set_low().map_err(|_| Error::Output(self.line))
    }

    /// Asserts when `on` is true, deasserts otherwise.
    pub fn drive(&mut self, on: bool) -> Result<(), Error> {
        if on { self.assert() } else { self.deassert() }
    }
}
