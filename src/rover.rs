//! Control loop context
//!
//! [`Rover`] owns every piece of state the firmware keeps between ticks: the
//! mode counter, the switch debouncer, the active input source and the LED
//! refresh schedule. The caller drives it by calling [`Rover::tick`] in a
//! loop with the current time.

use embassy_time::Instant;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, PinState};
use smart_leds::{RGB8, SmartLedsWrite};

use crate::buzzer::{Buzzer, Played, ToneOutput};
use crate::command::{CommandDecoder, Decoded, InputSource, JoystickAxes};
use crate::config::{ConfigError, RoverConfig};
use crate::controller::{DrivePair, map_drive};
use crate::debounce::Debouncer;
use crate::led::PatternRenderer;
use crate::link::LinkTransport;
use crate::mode::{ModeMachine, OperatingMode};
use crate::motor::{ActuationSink, Side};

/// Hardware collaborators handed to [`Rover::new`]
pub struct RoverParts<SW, J, L, A, LED, T, D> {
    /// Joystick push switch, active-low; `None` on boards without one
    pub switch: Option<SW>,
    pub joystick: J,
    pub link: L,
    pub drive: A,
    pub strip: LED,
    pub tone: T,
    pub delay: D,
}

/// What happened during one [`Rover::tick`]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub decoded: Decoded,
    /// Commands sent to the motors, if motion was requested
    pub drive: Option<DrivePair>,
    pub mode_changed: bool,
    pub rendered: bool,
    /// `None` when the tone output failed
    pub played: Option<Played>,
}

impl Default for TickOutcome {
    fn default() -> Self {
        Self {
            decoded: Decoded::Ignored,
            drive: None,
            mode_changed: false,
            rendered: false,
            played: None,
        }
    }
}

/// The rover firmware state, generic over its collaborators
pub struct Rover<SW, J, L, A, LED, T, D, const N: usize> {
    config: RoverConfig,
    decoder: CommandDecoder,
    modes: ModeMachine,
    switch: Option<(SW, Debouncer)>,
    source: InputSource,
    joystick: J,
    link: L,
    drive: A,
    leds: PatternRenderer<LED, N>,
    next_render: Instant,
    buzzer: Buzzer<T, D>,
}

impl<SW, J, L, A, LED, T, D, const N: usize> Rover<SW, J, L, A, LED, T, D, N>
where
    SW: InputPin,
    J: JoystickAxes,
    L: LinkTransport,
    A: ActuationSink,
    LED: SmartLedsWrite,
    LED::Color: From<RGB8>,
    T: ToneOutput,
    D: DelayNs,
{
    pub fn new(
        config: RoverConfig,
        source: InputSource,
        parts: RoverParts<SW, J, L, A, LED, T, D>,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        info!("Rover starting");
        info!("Input source: {}", source.name());
        info!(
            "Center {}, deadzone {}, full speed {}, {} modes",
            config.center,
            config.deadzone,
            config.full_speed,
            config.mode_count
        );

        let RoverParts {
            switch,
            joystick,
            link,
            drive,
            strip,
            tone,
            delay,
        } = parts;

        Ok(Self {
            config,
            decoder: CommandDecoder::new(config.center),
            modes: ModeMachine::new(config.mode_count),
            switch: switch.map(|pin| (pin, Debouncer::new(config.debounce_delay, now))),
            source,
            joystick,
            link,
            drive,
            leds: PatternRenderer::new(strip),
            next_render: now,
            buzzer: Buzzer::new(tone, delay),
        })
    }

    pub fn input_source(&self) -> InputSource {
        self.source
    }

    pub fn set_input_source(&mut self, source: InputSource) {
        if source != self.source {
            info!("Input source: {} -> {}", self.source.name(), source.name());
            self.source = source;
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.modes.mode()
    }

    pub fn modes(&self) -> &ModeMachine {
        &self.modes
    }

    pub fn config(&self) -> &RoverConfig {
        &self.config
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    pub fn drive_mut(&mut self) -> &mut A {
        &mut self.drive
    }

    /// Run one pass of the control loop
    ///
    /// Order: switch, decode, actuate, LED refresh when due, one buzzer note.
    /// The buzzer note blocks on the delay for the length of the note.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        if self.poll_switch(now) {
            self.modes.advance();
            outcome.mode_changed = true;
        }

        outcome.decoded = self.decode();
        if outcome.decoded == Decoded::ModeAdvanced {
            outcome.mode_changed = true;
        }

        if let Decoded::Motion(vector) = outcome.decoded {
            let pair = map_drive(vector, &self.config);
            self.actuate(pair);
            outcome.drive = Some(pair);
        }

        if now >= self.next_render {
            match self.leds.render(self.modes.mode()) {
                Ok(()) => outcome.rendered = true,
                Err(_) => warn!("LED strip write failed"),
            }
            self.next_render = now + self.config.render_interval;
        }

        let mode = self.modes.mode();
        match self.buzzer.play_next(mode, self.modes.cursor_mut()) {
            Ok(played) => outcome.played = Some(played),
            Err(_) => warn!("Buzzer output failed"),
        }

        outcome
    }

    /// `true` on a validated press
    fn poll_switch(&mut self, now: Instant) -> bool {
        let Some((pin, debouncer)) = self.switch.as_mut() else {
            return false;
        };
        match pin.is_high() {
            Ok(high) => debouncer.update(PinState::from(high), now).is_some(),
            Err(_) => {
                warn!("Switch read failed");
                false
            }
        }
    }

    fn decode(&mut self) -> Decoded {
        match self.source {
            InputSource::LocalHardware => match self.joystick.read_axes() {
                Ok((raw_x, raw_y)) => self.decoder.decode_hardware(raw_x, raw_y),
                Err(_) => {
                    warn!("Joystick read failed");
                    Decoded::Ignored
                }
            },
            InputSource::RemoteLink => self.decoder.decode_link(&mut self.link, &mut self.modes),
            InputSource::None => Decoded::Ignored,
        }
    }

    fn actuate(&mut self, pair: DrivePair) {
        debug!(
            "Left {} {} / Right {} {}",
            pair.left.mode.name(),
            pair.left.speed,
            pair.right.mode.name(),
            pair.right.speed
        );
        if self.drive.apply_drive(Side::Left, pair.left).is_err() {
            warn!("Left motor update failed");
        }
        if self.drive.apply_drive(Side::Right, pair.right).is_err() {
            warn!("Right motor update failed");
        }
    }
}
