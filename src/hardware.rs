//! Hardware abstraction and peripheral initialization.
//!
//! This module defines the pin mappings and peripheral initialization
//! for the kicker board (STM32F030K6).
//!
//! # Pin Assignments
//!
//! ## Charging
//! - **PA5**: ADC_IN5 - Capacitor charge sense (12-bit)
//! - **PB1**: TIM3_CH4 - Charging actuator PWM, 10 kHz
//!
//! ## Master Link
//! - **PA9**: READY - Output, high when the capacitor is loaded
//! - **PA10**: KICK_CMD - Input with pull-down, high requests a kick
//!
//! ## Kick
//! - **PA6**: KICK - Discharge driver, active high
//! - **PA4**: LED - Status indicator, lit during a kick
//!
//! ## Timers
//! - **TIM1**: embassy time driver (TIM3 is reserved for the charging PWM)

use embassy_stm32::adc::{self, Adc, AdcChannel, AnyAdcChannel, Resolution, SampleTime};
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, OutputType, Pull, Speed};
use embassy_stm32::peripherals::{ADC1, TIM3};
use embassy_stm32::time::hz;
use embassy_stm32::timer::low_level::CountingMode;
use embassy_stm32::timer::simple_pwm::{PwmPin, SimplePwm, SimplePwmChannel};

use kicker_fw::config::PWM_FREQUENCY_HZ;
use kicker_fw::dispatcher::FireDispatcher;
use kicker_fw::regulator::ChargeRegulator;
use kicker_fw::sensor::{ChargeSample, ChargeSensor};
use kicker_fw::SensorError;

bind_interrupts!(struct Irqs {
    ADC1 => adc::InterruptHandler<ADC1>;
});

pub type Regulator =
    ChargeRegulator<AdcChargeSensor, SimplePwmChannel<'static, TIM3>, Output<'static>>;

pub type Dispatcher = FireDispatcher<Input<'static>, Output<'static>, Output<'static>>;

/// Capacitor charge sense on ADC1 channel 5.
pub struct AdcChargeSensor {
    adc: Adc<'static, ADC1>,
    channel: AnyAdcChannel<ADC1>,
}

impl AdcChargeSensor {
    /// Configures 12-bit conversions with the shortest sample time.
    pub fn new(mut adc: Adc<'static, ADC1>, channel: AnyAdcChannel<ADC1>) -> Self {
        adc.set_resolution(Resolution::BITS12);
        adc.set_sample_time(SampleTime::CYCLES1_5);
        Self { adc, channel }
    }
}

impl ChargeSensor for AdcChargeSensor {
    async fn sample(&mut self) -> Result<ChargeSample, SensorError> {
        let raw = self.adc.read(&mut self.channel).await;
        ChargeSample::new(raw)
    }
}

/// Top-level peripheral container for the kicker.
///
/// Splits the board into the two processes. Each one owns its pins
/// outright, so the regulator can never touch the kick outputs and the
/// dispatcher can never touch READY or the charger.
pub struct Peripherals {
    /// Charge sense, charging PWM and READY line
    pub regulator: Regulator,
    /// KICK_CMD, discharge driver and status LED
    pub dispatcher: Dispatcher,
}

impl Peripherals {
    /// Initializes all peripherals from STM32 peripheral singleton.
    ///
    /// # Initial GPIO States
    ///
    /// - PA4 (LED): Low
    /// - PA6 (KICK): Low
    /// - PA9 (READY): Low (not ready)
    /// - PB1 (PWM): 0 % duty, channel enabled
    pub fn new(p: embassy_stm32::Peripherals) -> Self {
        let sensor = AdcChargeSensor::new(Adc::new(p.ADC1, Irqs), p.PA5.degrade_adc());

        let pwm = SimplePwm::new(
            p.TIM3,
            None,
            None,
            None,
            Some(PwmPin::new(p.PB1, OutputType::PushPull)),
            hz(PWM_FREQUENCY_HZ),
            CountingMode::EdgeAlignedUp,
        );
        let mut charge_pwm = pwm.split().ch4;
        charge_pwm.set_duty_cycle_fully_off();
        charge_pwm.enable();

        Self {
            regulator: ChargeRegulator::new(
                sensor,
                charge_pwm,
                Output::new(p.PA9, Level::Low, Speed::Low),
            ),
            dispatcher: FireDispatcher::new(
                Input::new(p.PA10, Pull::Down),
                Output::new(p.PA6, Level::Low, Speed::Low),
                Output::new(p.PA4, Level::Low, Speed::Low),
            ),
        }
    }
}
