//! Fault taxonomy for the kicker.
//!
//! Every fault is fatal for the process that hits it: the process drives its
//! own outputs to the safe state and stops. Variants are `Copy` so they can
//! be handed to the logger after the process has released its hardware.

use core::fmt;

/// A fault that stopped the Charge Regulator or the Fire Dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The charge sensor did not produce a usable sample.
    Sensor(SensorError),
    /// An output line or the charging PWM channel could not be driven.
    Output(Line),
    /// The KICK_CMD input could not be read.
    Command,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor read failed: {e}"),
            Self::Output(line) => write!(f, "could not drive {line}"),
            Self::Command => f.write_str("could not read KICK_CMD line"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The converter reported a driver-level failure.
    ReadFailed,
    /// The converter returned a value outside the sensor's resolution.
    OutOfRange { raw: u16 },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => f.write_str("converter fault"),
            Self::OutOfRange { raw } => write!(f, "raw value {raw} outside sensor range"),
        }
    }
}

/// Identifies a hardware output owned by one of the two processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// READY signal to the master (regulator).
    Ready,
    /// Charging actuator PWM channel (regulator).
    ChargePwm,
    /// Discharge driver (dispatcher).
    Discharge,
    /// Status indicator LED (dispatcher).
    Indicator,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ready => "READY line",
            Self::ChargePwm => "charge PWM",
            Self::Discharge => "discharge output",
            Self::Indicator => "status indicator",
        })
    }
}
