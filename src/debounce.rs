//! Debounce for the joystick push switch
//!
//! The switch is active-low. Any change of the raw level restarts the
//! debounce window; a level that stays put for longer than the window
//! becomes the stable level. Only the stable transition to Low is reported.
//!
//! The stable level starts Low while the last raw level starts High, so a
//! switch already held at power-up settles silently and only a later press
//! counts. A released switch settles to High one window after boot.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::PinState;

/// Validated switch edge
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pressed;

/// Per-switch debounce state
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    last_raw: PinState,
    last_change: Instant,
    stable: PinState,
}

impl Debouncer {
    /// Start with the window anchored at `now`
    pub fn new(delay: Duration, now: Instant) -> Self {
        Self {
            delay,
            last_raw: PinState::High,
            last_change: now,
            stable: PinState::Low,
        }
    }

    /// Feed one raw sample; returns [`Pressed`] on a validated press
    pub fn update(&mut self, raw: PinState, now: Instant) -> Option<Pressed> {
        if raw != self.last_raw {
            self.last_change = now;
        }
        self.last_raw = raw;

        if now.saturating_duration_since(self.last_change) > self.delay && raw != self.stable {
            self.stable = raw;
            if self.stable == PinState::Low {
                debug!("Switch pressed");
                return Some(Pressed);
            }
        }
        None
    }

    /// Last validated level
    pub fn stable(&self) -> PinState {
        self.stable
    }
}
