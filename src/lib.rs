//! Input-to-actuation core of a two-motor rover
//!
//! Joystick or Bluetooth commands are decoded into a displacement vector,
//! mapped onto the two tank-drive motors, and a shared mode counter picks the
//! LED ring pattern and buzzer tune. All hardware sits behind
//! `embedded-hal`, `embedded-io` and `smart-leds` traits; the board crate
//! wires real peripherals into [`rover::Rover`] and calls
//! [`rover::Rover::tick`] in its main loop.
#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
mod fmt;

pub mod buzzer;
pub mod command;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod led;
pub mod link;
pub mod mode;
pub mod motor;
pub mod rover;

pub use command::{CommandDecoder, Decoded, DisplacementVector, InputSource};
pub use config::RoverConfig;
pub use controller::{DrivePair, DriveTrain, map_drive};
pub use mode::{ModeMachine, OperatingMode};
pub use motor::{ActuationSink, DriveCommand, DriveMode, Side};
pub use rover::{Rover, RoverParts, TickOutcome};
