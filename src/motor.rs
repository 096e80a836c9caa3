//! H-bridge motor channel (L298N style) using embedded-hal pins
//!
//! Each side of the rover is one bridge channel:
//! - IN1=LOW,  IN2=HIGH → Forward
//! - IN1=HIGH, IN2=LOW  → Backward
//! - IN1=LOW,  IN2=LOW  → Stopped (coast)
//! - EN duty cycle controls speed (0-255)

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use thiserror::Error;

/// Full-scale speed value; maps to 100% duty
pub const MAX_SPEED: u8 = u8::MAX;

/// Per-motor drive mode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveMode {
    #[default]
    Stopped,
    Forward,
    Backward,
}

impl DriveMode {
    /// Direction pin levels `(in1, in2)` for this mode
    pub const fn pin_levels(self) -> (PinState, PinState) {
        match self {
            DriveMode::Forward => (PinState::Low, PinState::High),
            DriveMode::Backward => (PinState::High, PinState::Low),
            DriveMode::Stopped => (PinState::Low, PinState::Low),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DriveMode::Stopped => "STOPPED",
            DriveMode::Forward => "FORWARD",
            DriveMode::Backward => "BACKWARDS",
        }
    }
}

/// Drive mode and PWM speed for one side
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveCommand {
    pub mode: DriveMode,
    pub speed: u8,
}

impl DriveCommand {
    pub const STOP: Self = Self::new(DriveMode::Stopped, 0);

    pub const fn new(mode: DriveMode, speed: u8) -> Self {
        Self { mode, speed }
    }

    pub const fn forward(speed: u8) -> Self {
        Self::new(DriveMode::Forward, speed)
    }

    pub const fn backward(speed: u8) -> Self {
        Self::new(DriveMode::Backward, speed)
    }
}

/// Rover side a motor sits on
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Anything that can turn a [`DriveCommand`] into motor motion
pub trait ActuationSink {
    type Error;

    fn apply_drive(&mut self, side: Side, command: DriveCommand) -> Result<(), Self::Error>;
}

/// Failure while driving a motor channel
#[derive(Debug, Error)]
pub enum MotorError<P, W> {
    #[error("direction pin write failed: {0:?}")]
    Pin(P),
    #[error("PWM duty update failed: {0:?}")]
    Pwm(W),
}

/// Single motor channel on the H-bridge
pub struct Motor<P, W> {
    in1: P,
    in2: P,
    pwm: W,
    current_speed: u8,
    current_mode: DriveMode,
}

impl<P, W> Motor<P, W>
where
    P: OutputPin,
    W: SetDutyCycle,
{
    /// Create a new motor and put it in the stopped state
    ///
    /// - `in1`, `in2`: Direction control pins
    /// - `pwm`: Enable pin PWM channel for speed control
    pub fn new(in1: P, in2: P, pwm: W) -> Result<Self, MotorError<P::Error, W::Error>> {
        let mut motor = Self {
            in1,
            in2,
            pwm,
            current_speed: 0,
            current_mode: DriveMode::Stopped,
        };
        motor.stop()?;
        Ok(motor)
    }

    /// Set the direction pins for `mode`
    pub fn set_mode(&mut self, mode: DriveMode) -> Result<(), MotorError<P::Error, W::Error>> {
        let (in1, in2) = mode.pin_levels();
        self.in1.set_state(in1).map_err(MotorError::Pin)?;
        self.in2.set_state(in2).map_err(MotorError::Pin)?;
        self.current_mode = mode;
        Ok(())
    }

    /// Set motor speed (0-255), proportional to the duty cycle
    pub fn set_speed(&mut self, speed: u8) -> Result<(), MotorError<P::Error, W::Error>> {
        self.pwm
            .set_duty_cycle_fraction(u16::from(speed), u16::from(MAX_SPEED))
            .map_err(MotorError::Pwm)?;
        self.current_speed = speed;
        Ok(())
    }

    /// Apply mode then speed
    pub fn drive(&mut self, command: DriveCommand) -> Result<(), MotorError<P::Error, W::Error>> {
        self.set_mode(command.mode)?;
        self.set_speed(command.speed)
    }

    /// Stop the motor (coast)
    pub fn stop(&mut self) -> Result<(), MotorError<P::Error, W::Error>> {
        self.drive(DriveCommand::STOP)
    }

    /// Get current speed
    pub fn speed(&self) -> u8 {
        self.current_speed
    }

    /// Get current drive mode
    pub fn mode(&self) -> DriveMode {
        self.current_mode
    }
}
