//! Configuration constants for the rover
//!
//! All the magic numbers of the input pipeline live here. [`RoverConfig`]
//! bundles the ones that differ between board revisions so they can be set
//! at start-up instead of edited in place.

use embassy_time::Duration;
use thiserror::Error;

// Joystick
/// Neutral raw reading of both joystick axes
pub const CENTER: i32 = 512;
/// Largest raw reading of the analog joystick (10-bit ADC)
pub const MAX_RAW: u16 = 1023;
/// Magnitude around the centre treated as neutral
pub const DEADZONE: i32 = 50;

// Motors
/// PWM value reached at full stick deflection
pub const FULL_SPEED: u8 = 150;

// Mode cycling
/// Number of LED/buzzer modes
pub const MODE_COUNT: u8 = 9;
/// Number of tunes; the tune index is `mode % TUNE_COUNT`
pub const TUNE_COUNT: u8 = 4;

// Timing
/// Switch level must be stable for longer than this before it is accepted
pub const DEBOUNCE_DELAY_MS: u64 = 50;
/// Minimum time between two LED strip refreshes
pub const RENDER_INTERVAL_MS: u64 = 100;
/// Silent hold when there is no note to play
pub const SILENCE_HOLD_MS: u32 = 100;

// LED strip
/// Number of pixels on the LED ring
pub const NUM_PIXELS: usize = 64;

// Remote link
/// Prefix of a continuous joystick frame
pub const FRAME_START: u8 = b'*';
/// Suffix of a continuous joystick frame
pub const FRAME_END: u8 = b'_';
/// Longest continuous frame kept; extra bytes before the end marker are dropped
pub const FRAME_CAPACITY: usize = 32;
/// Continuous frame values are multiplied by this before centring
pub const FRAME_VALUE_SCALE: i32 = 4;
/// Largest value a continuous frame field may carry
pub const FRAME_VALUE_MAX: u32 = 255;

/// Rejected configuration values
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("joystick center must be positive")]
    ZeroCenter,
    #[error("full speed must be non-zero")]
    ZeroFullSpeed,
    #[error("at least one mode is required")]
    ZeroModeCount,
}

/// Tunables of the input-to-actuation pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoverConfig {
    /// Neutral raw joystick reading, also the magnitude of pad directions
    pub center: i32,
    /// Neutral band half-width in raw units
    pub deadzone: i32,
    /// PWM value at full deflection
    pub full_speed: u8,
    /// Number of modes the mode counter cycles through
    pub mode_count: u8,
    /// Switch debounce window
    pub debounce_delay: Duration,
    /// LED strip refresh interval
    pub render_interval: Duration,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            center: CENTER,
            deadzone: DEADZONE,
            full_speed: FULL_SPEED,
            mode_count: MODE_COUNT,
            debounce_delay: Duration::from_millis(DEBOUNCE_DELAY_MS),
            render_interval: Duration::from_millis(RENDER_INTERVAL_MS),
        }
    }
}

impl RoverConfig {
    pub fn with_center(mut self, center: i32) -> Self {
        self.center = center;
        self
    }

    pub fn with_deadzone(mut self, deadzone: i32) -> Self {
        self.deadzone = deadzone;
        self
    }

    pub fn with_full_speed(mut self, full_speed: u8) -> Self {
        self.full_speed = full_speed;
        self
    }

    pub fn with_mode_count(mut self, mode_count: u8) -> Self {
        self.mode_count = mode_count;
        self
    }

    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    pub fn with_render_interval(mut self, interval: Duration) -> Self {
        self.render_interval = interval;
        self
    }

    /// Check the values the pipeline divides by or takes a modulus of
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.center <= 0 {
            return Err(ConfigError::ZeroCenter);
        }
        if self.full_speed == 0 {
            return Err(ConfigError::ZeroFullSpeed);
        }
        if self.mode_count == 0 {
            return Err(ConfigError::ZeroModeCount);
        }
        Ok(())
    }
}
