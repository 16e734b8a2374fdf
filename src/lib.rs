//! Control logic for a capacitor kicker slaved to a master controller.
//!
//! Two processes run side by side for the lifetime of the board:
//!
//! - [`regulator::ChargeRegulator`] samples the capacitor charge, gates the
//!   charging PWM and reports READY to the master.
//! - [`dispatcher::FireDispatcher`] watches KICK_CMD and fires a fixed-length
//!   discharge pulse while it is asserted.
//!
//! They share no state. Each one is handed the hardware it owns at
//! construction (embedded-hal traits plus [`sensor::ChargeSensor`]), so the
//! same code runs on the STM32 firmware and against host-side fakes.
//!
//! # Module Organization
//!
//! - [`config`] - Build-time constants
//! - [`error`] - Fault taxonomy
//! - [`signal`] - Logical assert/deassert over output lines
//! - [`sensor`] - Charge samples and the sensor capability
//! - [`regulator`] - Charge Regulator
//! - [`dispatcher`] - Fire Dispatcher

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod regulator;
pub mod sensor;
pub mod signal;

#[cfg(test)]
mod testing;

pub use error::{Error, Line, SensorError};
