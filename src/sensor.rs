//! Charge sensing.

use crate::config::SENSOR_MAX_SAMPLE;
use crate::error::SensorError;

/// One validated reading from the capacitor charge sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargeSample(u16);

impl ChargeSample {
    /// Validates a raw converter value against the 12-bit range.
    ///
    /// A value the sensor cannot physically produce is treated as a read
    /// failure rather than as a charge level.
    pub const fn new(raw: u16) -> Result<Self, SensorError> {
        if raw > SENSOR_MAX_SAMPLE {
            Err(SensorError::OutOfRange { raw })
        } else {
            Ok(Self(raw))
        }
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

/// Capability to take one charge sample.
///
/// Each call performs a single conversion and waits for it to finish.
#[allow(async_fn_in_trait)]
pub trait ChargeSensor {
    async fn sample(&mut self) -> Result<ChargeSample, SensorError>;
}
