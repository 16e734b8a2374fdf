//! Build-time configuration for the kicker.
//!
//! Every tunable lives here. There is no runtime configuration; changing a
//! value means rebuilding the firmware.

/// Charge sample at or above which the capacitor counts as loaded.
pub const CHARGE_THRESHOLD: u16 = 1500;

/// Largest value the 12-bit charge sensor can produce.
pub const SENSOR_MAX_SAMPLE: u16 = 4095;

/// PWM timer clock in hertz.
pub const PWM_TIMER_CLOCK_HZ: u32 = 2_000_000;

/// Timer ticks in one PWM period.
pub const PWM_PERIOD_TICKS: u16 = 200;

/// Resulting PWM frequency (10 kHz).
pub const PWM_FREQUENCY_HZ: u32 = PWM_TIMER_CLOCK_HZ / PWM_PERIOD_TICKS as u32;

/// On-ticks per period while charging ("loading speed", 80 %).
pub const LOADING_DUTY_TICKS: u16 = 160;

/// Delay between control cycles, shared by both processes.
pub const POLL_INTERVAL_MS: u32 = 10;

/// How long discharge and indicator stay asserted during a kick.
pub const PULSE_DURATION_MS: u32 = 500;

const _: () = assert!(LOADING_DUTY_TICKS > 0 && LOADING_DUTY_TICKS <= PWM_PERIOD_TICKS);
const _: () = assert!(CHARGE_THRESHOLD <= SENSOR_MAX_SAMPLE);
