//! Operating mode shared by the LED ring and the buzzer
//!
//! One counter selects both outputs: the full value picks the LED pattern,
//! `mode % TUNE_COUNT` picks the tune. The counter only ever moves forward
//! by one and wraps at the configured mode count.

use crate::config::TUNE_COUNT;

/// Current value of the mode counter
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct OperatingMode(u8);

impl OperatingMode {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    /// Tune family shared by a static mode and its dynamic twin
    pub const fn tune_index(self) -> u8 {
        self.0 % TUNE_COUNT
    }
}

/// Position inside the current tune
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TuneCursor(usize);

impl TuneCursor {
    pub const fn position(self) -> usize {
        self.0
    }

    pub fn step(&mut self) {
        self.0 += 1;
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Cyclic mode counter with the tune cursor it restarts
#[derive(Clone, Debug)]
pub struct ModeMachine {
    mode: OperatingMode,
    count: u8,
    cursor: TuneCursor,
}

impl ModeMachine {
    /// `count` must be non-zero, see [`crate::config::RoverConfig::validate`]
    pub const fn new(count: u8) -> Self {
        Self {
            mode: OperatingMode(0),
            count,
            cursor: TuneCursor(0),
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// Move to the next mode and restart its tune
    pub fn advance(&mut self) -> OperatingMode {
        self.mode = OperatingMode((self.mode.0 + 1) % self.count);
        self.cursor.reset();
        info!("New mode: {}", self.mode.0);
        self.mode
    }

    pub fn cursor(&self) -> TuneCursor {
        self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut TuneCursor {
        &mut self.cursor
    }
}
