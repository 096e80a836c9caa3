//! Movement controller for tank-style differential drive
//!
//! Converts a joystick displacement vector into a drive mode and a PWM speed
//! for each side, and applies the result to the left and right motors.
//!
//! X is the throttle axis (positive = forward) and Y the steering axis.
//! The mapping works by quadrant:
//! - Throttle outside the deadzone: both sides run in the throttle direction,
//!   the inner side is slowed by half the steering magnitude.
//! - Throttle neutral, steering outside the deadzone: spin in place.
//! - Both axes neutral: stop.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::command::DisplacementVector;
use crate::config::RoverConfig;
use crate::motor::{ActuationSink, DriveCommand, DriveMode, Motor, MotorError, Side};

/// Per-side output of [`map_drive`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrivePair {
    pub left: DriveCommand,
    pub right: DriveCommand,
}

impl DrivePair {
    pub const STOP: Self = Self {
        left: DriveCommand::STOP,
        right: DriveCommand::STOP,
    };

    pub const fn new(left: DriveCommand, right: DriveCommand) -> Self {
        Self { left, right }
    }
}

/// Saturate a computed speed into the PWM range
pub fn clamp_speed(value: i32) -> u8 {
    value.clamp(0, i32::from(u8::MAX)) as u8
}

/// Convert a displacement vector to left/right drive commands
///
/// `v / SCALE` with `SCALE = center / full_speed` is computed as
/// `v * full_speed / center`, truncating toward zero.
///
/// The side slowed by steering is `t/SCALE -/+ (y/SCALE)/2` taken as one
/// exact quotient and truncated once, then clamped to `[0, 255]`. The other
/// side takes the scaled throttle truncated to `u8`, unclamped.
pub fn map_drive(vector: DisplacementVector, config: &RoverConfig) -> DrivePair {
    let full_speed = i32::from(config.full_speed);
    let center = config.center;
    let scale = |v: i32| v * full_speed / center;
    // (2t + steer) / (2 * SCALE)
    let halved = |t: i32, steer: i32| clamp_speed((2 * t + steer) * full_speed / (2 * center));
    let deadzone = config.deadzone;
    let DisplacementVector { x, y } = vector;

    if x > deadzone || x < -deadzone {
        let (mode, t) = if x > deadzone {
            (DriveMode::Forward, x)
        } else {
            (DriveMode::Backward, -x)
        };
        let throttle = scale(t) as u8;

        let (left, right) = if y < 0 {
            (halved(t, y), throttle)
        } else {
            (throttle, halved(t, -y))
        };
        DrivePair::new(
            DriveCommand::new(mode, left),
            DriveCommand::new(mode, right),
        )
    } else if y < -deadzone {
        let speed = scale(-y) as u8;
        DrivePair::new(DriveCommand::backward(speed), DriveCommand::forward(speed))
    } else if y > deadzone {
        let speed = scale(y) as u8;
        DrivePair::new(DriveCommand::forward(speed), DriveCommand::backward(speed))
    } else {
        DrivePair::STOP
    }
}

/// Left and right H-bridge channels of the rover
pub struct DriveTrain<P, W> {
    left_motor: Motor<P, W>,
    right_motor: Motor<P, W>,
}

impl<P, W> DriveTrain<P, W>
where
    P: OutputPin,
    W: SetDutyCycle,
{
    pub fn new(left_motor: Motor<P, W>, right_motor: Motor<P, W>) -> Self {
        Self {
            left_motor,
            right_motor,
        }
    }

    /// Apply both sides of a [`DrivePair`], mode before speed
    pub fn apply(&mut self, pair: DrivePair) -> Result<(), MotorError<P::Error, W::Error>> {
        self.left_motor.set_mode(pair.left.mode)?;
        self.right_motor.set_mode(pair.right.mode)?;
        debug!(
            "Updated motors modes (L,R): ( {} , {} )",
            pair.left.mode.name(),
            pair.right.mode.name()
        );
        self.right_motor.set_speed(pair.right.speed)?;
        self.left_motor.set_speed(pair.left.speed)?;
        debug!(
            "Updated motors speed (L,R): ( {} , {} )",
            pair.left.speed,
            pair.right.speed
        );
        Ok(())
    }

    /// Coast both sides
    pub fn stop(&mut self) -> Result<(), MotorError<P::Error, W::Error>> {
        self.apply(DrivePair::STOP)
    }

    /// Left channel, for bench checks
    pub fn left(&mut self) -> &mut Motor<P, W> {
        &mut self.left_motor
    }

    pub fn right(&mut self) -> &mut Motor<P, W> {
        &mut self.right_motor
    }

    /// Bench test: both motors at a constant speed, one way then the other
    pub fn demo_constant(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<(), MotorError<P::Error, W::Error>> {
        info!("Demo: constant speed forward then backward");
        self.apply(DrivePair::new(
            DriveCommand::forward(200),
            DriveCommand::forward(200),
        ))?;
        delay.delay_ms(2000);
        self.left_motor.set_mode(DriveMode::Backward)?;
        self.right_motor.set_mode(DriveMode::Backward)?;
        delay.delay_ms(2000);
        self.stop()
    }

    /// Bench test: ramp both motors up to `peak` and back down
    pub fn demo_ramp(
        &mut self,
        delay: &mut impl DelayNs,
        peak: u8,
    ) -> Result<(), MotorError<P::Error, W::Error>> {
        info!("Demo: ramping 0->{}->0", peak);
        self.apply(DrivePair::new(
            DriveCommand::backward(0),
            DriveCommand::backward(0),
        ))?;
        for speed in (0..=peak).chain((0..=peak).rev()) {
            self.left_motor.set_speed(speed)?;
            self.right_motor.set_speed(speed)?;
            delay.delay_ms(20);
        }
        self.stop()
    }

    /// Bench test: full speed burst followed by a pause
    pub fn demo_full_speed(
        &mut self,
        delay: &mut impl DelayNs,
        full_speed: u8,
    ) -> Result<(), MotorError<P::Error, W::Error>> {
        info!("Demo: full speed burst at {}", full_speed);
        self.apply(DrivePair::new(
            DriveCommand::backward(full_speed),
            DriveCommand::backward(full_speed),
        ))?;
        delay.delay_ms(2000);
        self.stop()?;
        delay.delay_ms(2000);
        Ok(())
    }
}

impl<P, W> ActuationSink for DriveTrain<P, W>
where
    P: OutputPin,
    W: SetDutyCycle,
{
    type Error = MotorError<P::Error, W::Error>;

    fn apply_drive(&mut self, side: Side, command: DriveCommand) -> Result<(), Self::Error> {
        match side {
            Side::Left => self.left_motor.drive(command),
            Side::Right => self.right_motor.drive(command),
        }
    }
}
