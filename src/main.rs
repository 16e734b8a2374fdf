//! Firmware for a capacitor kicker slaved to a master controller.
//!
//! # Overview
//!
//! The board charges a high-voltage capacitor and discharges it through the
//! kicking solenoid when the master asks for it. The master link is two
//! wires:
//! - **READY** (out): high while the capacitor charge is at or above the
//!   loaded threshold
//! - **KICK_CMD** (in): held high by the master to request a kick
//!
//! # Hardware
//!
//! - **MCU**: STM32F030K6 (Cortex-M0)
//! - **Charge sense**: 12-bit ADC on the capacitor voltage divider
//! - **Charger**: boost stage gated by a 10 kHz PWM channel
//! - **Kick**: discharge driver plus a status LED
//!
//! # Tasks
//!
//! - **charge_regulator_task**: samples charge every 10 ms, gates the
//!   charger and drives READY
//! - **main**: polls KICK_CMD every 10 ms and fires 500 ms pulses
//!
//! A fault stops only the process that hit it, after it has switched its
//! own outputs off.
//!
//! # Module Organization
//!
//! - [`hardware`] - Pin mappings and peripheral initialization

#![no_std]
#![no_main]

mod hardware;

use embassy_executor::Spawner;
use embassy_stm32::Config;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use hardware::{Peripherals, Regulator};

/// Runs the Charge Regulator until it faults.
///
/// The fault has already been logged and the charger switched off by the
/// time `run` returns, so the task just ends.
#[embassy_executor::task]
async fn charge_regulator_task(mut regulator: Regulator) {
    let _ = regulator.run(Delay).await;
}

/// Main entry point for kicker firmware.
///
/// # Initialization Sequence
///
/// 1. Initialize STM32 peripherals (default clocks, HSI 8 MHz)
/// 2. Initialize ADC, PWM and GPIO with every output off
/// 3. Spawn the charge regulator task
/// 4. Run the fire dispatcher in the main task
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Config::default());

    defmt::info!("kicker firmware starting");

    #[cfg(feature = "debug-mode")]
    defmt::info!("Initializing peripherals...");

    let peripherals = Peripherals::new(p);
    let mut dispatcher = peripherals.dispatcher;

    #[cfg(feature = "debug-mode")]
    defmt::info!("Spawning charge regulator task...");

    spawner
        .spawn(charge_regulator_task(peripherals.regulator))
        .unwrap();

    #[cfg(feature = "debug-mode")]
    defmt::info!("Entering fire dispatch loop...");

    let _ = dispatcher.run(Delay).await;

    // Kick outputs are off; leave the regulator running on its own.
    core::future::pending::<()>().await
}
