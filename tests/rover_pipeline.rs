use rover_firmware::buzzer::ToneOutput;
use rover_firmware::command::JoystickAxes;
use rover_firmware::link::SerialLink;
use rover_firmware::motor::Motor;
use rover_firmware::*;
extern crate std;

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin, PinState};
use embedded_hal::pwm::{self, SetDutyCycle};
use smart_leds::{RGB8, SmartLedsWrite};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Clone, Default)]
struct Level(Rc<Cell<bool>>);

impl Level {
    fn state(&self) -> PinState {
        PinState::from(self.0.get())
    }
}

impl digital::ErrorType for Level {
    type Error = Infallible;
}

impl OutputPin for Level {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set(true);
        Ok(())
    }
}

impl InputPin for Level {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.get())
    }
}

#[derive(Clone, Default)]
struct Duty(Rc<Cell<u16>>);

impl pwm::ErrorType for Duty {
    type Error = Infallible;
}

impl SetDutyCycle for Duty {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.0.set(duty);
        Ok(())
    }
}

/// Serial port fed from the test
#[derive(Clone, Default)]
struct Port(Rc<RefCell<VecDeque<u8>>>);

impl Port {
    fn send(&self, bytes: &[u8]) {
        self.0.borrow_mut().extend(bytes.iter().copied());
    }
}

impl embedded_io::ErrorType for Port {
    type Error = Infallible;
}

impl embedded_io::Read for Port {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut queue = self.0.borrow_mut();
        let mut n = 0;
        while n < buf.len() {
            match queue.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for Port {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().is_empty())
    }
}

#[derive(Clone, Default)]
struct Stick(Rc<Cell<(u16, u16)>>);

impl JoystickAxes for Stick {
    type Error = Infallible;

    fn read_axes(&mut self) -> Result<(u16, u16), Self::Error> {
        Ok(self.0.get())
    }
}

#[derive(Clone, Default)]
struct Strip(Rc<RefCell<Vec<Vec<RGB8>>>>);

impl SmartLedsWrite for Strip {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.0
            .borrow_mut()
            .push(iterator.into_iter().map(Into::into).collect());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Tones(Rc<RefCell<Vec<u16>>>);

impl ToneOutput for Tones {
    type Error = Infallible;

    fn tone(&mut self, frequency_hz: u16, _duration_ms: u32) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(frequency_hz);
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct MotorPins {
    in1: Level,
    in2: Level,
    duty: Duty,
}

impl MotorPins {
    fn new() -> Self {
        Self {
            in1: Level::default(),
            in2: Level::default(),
            duty: Duty::default(),
        }
    }

    fn motor(&self) -> Motor<Level, Duty> {
        Motor::new(self.in1.clone(), self.in2.clone(), self.duty.clone()).unwrap()
    }

    fn mode(&self) -> DriveMode {
        match (self.in1.state(), self.in2.state()) {
            (PinState::Low, PinState::High) => DriveMode::Forward,
            (PinState::High, PinState::Low) => DriveMode::Backward,
            _ => DriveMode::Stopped,
        }
    }

    fn duty(&self) -> u16 {
        self.duty.0.get()
    }
}

struct Bench {
    rover: Rover<Level, Stick, SerialLink<Port>, DriveTrain<Level, Duty>, Strip, Tones, NoDelay, 8>,
    switch: Level,
    stick: Stick,
    port: Port,
    left: MotorPins,
    right: MotorPins,
    strip: Strip,
    tones: Tones,
}

fn bench(source: InputSource) -> Bench {
    let switch = Level::default();
    switch.0.set(true);
    let (stick, port, strip, tones) = (
        Stick::default(),
        Port::default(),
        Strip::default(),
        Tones::default(),
    );
    stick.0.set((512, 512));
    let (left, right) = (MotorPins::new(), MotorPins::new());

    let parts = RoverParts {
        switch: Some(switch.clone()),
        joystick: stick.clone(),
        link: SerialLink::new(port.clone()),
        drive: DriveTrain::new(left.motor(), right.motor()),
        strip: strip.clone(),
        tone: tones.clone(),
        delay: NoDelay,
    };
    let rover = Rover::new(RoverConfig::default(), source, parts, Instant::from_millis(0)).unwrap();

    Bench {
        rover,
        switch,
        stick,
        port,
        left,
        right,
        strip,
        tones,
    }
}

fn at(ms: u64) -> Instant {
    Instant::from_millis(ms)
}

#[test]
fn joystick_drives_the_h_bridge() {
    let b = bench(InputSource::LocalHardware);
    let mut rover = b.rover;

    b.stick.0.set((1023, 512));
    rover.tick(at(0));
    assert_eq!(b.left.mode(), DriveMode::Forward);
    assert_eq!(b.right.mode(), DriveMode::Forward);
    assert_eq!(b.left.duty(), 149);
    assert_eq!(b.right.duty(), 149);

    b.stick.0.set((512, 0));
    rover.tick(at(10));
    assert_eq!(b.left.mode(), DriveMode::Backward);
    assert_eq!(b.right.mode(), DriveMode::Forward);
    assert_eq!(b.left.duty(), 150);

    b.stick.0.set((530, 490));
    rover.tick(at(20));
    assert_eq!(b.left.mode(), DriveMode::Stopped);
    assert_eq!(b.right.mode(), DriveMode::Stopped);
    assert_eq!(b.right.duty(), 0);
}

#[test]
fn bluetooth_pad_and_frames() {
    let b = bench(InputSource::RemoteLink);
    let mut rover = b.rover;

    b.port.send(b"A");
    let outcome = rover.tick(at(0));
    assert_eq!(outcome.decoded, Decoded::Motion(DisplacementVector::new(512, 0)));
    assert_eq!(b.left.mode(), DriveMode::Forward);
    assert_eq!(b.left.duty(), 150);

    // stop code leaves the motors as they were
    b.port.send(b"S");
    assert_eq!(rover.tick(at(10)).decoded, Decoded::Stop);
    assert_eq!(b.left.mode(), DriveMode::Forward);

    b.port.send(b"*X128,Y128_");
    rover.tick(at(20));
    assert_eq!(b.left.mode(), DriveMode::Stopped);
    assert_eq!(b.right.mode(), DriveMode::Stopped);

    // idle link: nothing decoded
    assert_eq!(rover.tick(at(30)).decoded, Decoded::Ignored);
}

#[test]
fn mode_cycles_from_switch_and_link() {
    let b = bench(InputSource::RemoteLink);
    let mut rover = b.rover;

    b.port.send(b"M");
    assert!(rover.tick(at(0)).mode_changed);
    assert_eq!(rover.mode(), OperatingMode::new(1));

    // released switch settles one window after boot
    assert!(!rover.tick(at(60)).mode_changed);
    b.switch.0.set(false);
    rover.tick(at(100));
    assert!(rover.tick(at(200)).mode_changed);
    assert_eq!(rover.mode(), OperatingMode::new(2));

    // held switch does not repeat
    for t in (300..1000).step_by(100) {
        assert!(!rover.tick(at(t)).mode_changed);
    }

    b.switch.0.set(true);
    rover.tick(at(1100));
    rover.tick(at(1200));
    for _ in 0..7 {
        b.port.send(b"M");
        rover.tick(at(1300));
    }
    assert_eq!(rover.mode(), OperatingMode::new(0));
}

#[test]
fn outputs_follow_the_mode() {
    let b = bench(InputSource::RemoteLink);
    let mut rover = b.rover;

    rover.tick(at(0));
    // Nokia, mode 1
    b.port.send(b"M");
    rover.tick(at(100));
    rover.tick(at(200));
    assert_eq!(b.tones.0.borrow().as_slice(), &[659, 587]);

    let frames = b.strip.0.borrow();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0][0], RGB8::new(30, 2, 50));
    assert_eq!(frames[1][0], RGB8::new(100, 0, 0));
    assert_eq!(frames[1][1], RGB8::new(0, 100, 0));
    assert_eq!(frames[1].len(), 8);
}

#[test]
fn mode_without_tune_stays_quiet() {
    let b = bench(InputSource::RemoteLink);
    let mut rover = b.rover;

    for _ in 0..8 {
        b.port.send(b"M");
    }
    for t in 0..8 {
        rover.tick(at(t * 100));
    }
    assert_eq!(rover.mode(), OperatingMode::new(8));
    let heard = b.tones.0.borrow().len();
    rover.tick(at(900));
    rover.tick(at(1000));
    assert_eq!(b.tones.0.borrow().len(), heard);
    let frames = b.strip.0.borrow();
    assert!(frames.last().unwrap().iter().all(|&c| c == RGB8::default()));
}
