//! Joystick and remote-link command decoding
//!
//! Both input paths end in the same [`DisplacementVector`], centred on zero
//! and spanning roughly `[-center, +center]` on each axis.
//!
//! The remote link carries two protocols over the same byte stream:
//!
//! ```text
//!   Pad (one byte)            Continuous (framed text)
//!   'A'  ( +C,  0 )            '*' X<digits> , Y<digits> '_'
//!   'B'  ( +C, +C )
//!   'C'  (  0, +C )            fields in any order, a missing
//!   'D'  ( -C, +C )            field reads as 0, each value v
//!   'E'  ( -C,  0 )            becomes 4 * v - C
//!   'F'  ( -C, -C )
//!   'G'  (  0, -C )
//!   'H'  ( +C, -C )
//!   'S'  stop, no motion
//!   'M'  next mode, no motion
//! ```
//!
//! Anything else on the link is line noise and is dropped without touching
//! any state.

use crate::config::{FRAME_END, FRAME_START, FRAME_VALUE_MAX, FRAME_VALUE_SCALE};
use crate::link::LinkTransport;
use crate::mode::ModeMachine;

/// Joystick deflection, zero-centred
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisplacementVector {
    pub x: i32,
    pub y: i32,
}

impl DisplacementVector {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One of the eight preset directions of the remote pad
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compass {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Compass {
    /// Unit direction `(x, y)`; x is the throttle axis
    pub const fn unit(self) -> (i32, i32) {
        match self {
            Compass::N => (1, 0),
            Compass::NE => (1, 1),
            Compass::E => (0, 1),
            Compass::SE => (-1, 1),
            Compass::S => (-1, 0),
            Compass::SW => (-1, -1),
            Compass::W => (0, -1),
            Compass::NW => (1, -1),
        }
    }

    /// Full-deflection vector for a joystick centred at `center`
    pub const fn vector(self, center: i32) -> DisplacementVector {
        let (x, y) = self.unit();
        DisplacementVector::new(x * center, y * center)
    }
}

/// Single-byte codes understood on the remote link
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadCode {
    Direction(Compass),
    Stop,
    Mode,
    /// Start of a continuous frame
    FrameStart,
}

impl PadCode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        let code = match byte {
            b'A' => PadCode::Direction(Compass::N),
            b'B' => PadCode::Direction(Compass::NE),
            b'C' => PadCode::Direction(Compass::E),
            b'D' => PadCode::Direction(Compass::SE),
            b'E' => PadCode::Direction(Compass::S),
            b'F' => PadCode::Direction(Compass::SW),
            b'G' => PadCode::Direction(Compass::W),
            b'H' => PadCode::Direction(Compass::NW),
            b'S' => PadCode::Stop,
            b'M' => PadCode::Mode,
            FRAME_START => PadCode::FrameStart,
            _ => return None,
        };
        Some(code)
    }
}

/// Result of decoding one input event
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decoded {
    /// Drive according to the vector
    Motion(DisplacementVector),
    /// Stop code: zero vector, motors left as they are
    Stop,
    /// The mode was advanced; no motion
    ModeAdvanced,
    /// Nothing usable was received
    Ignored,
}

impl Decoded {
    pub fn vector(&self) -> DisplacementVector {
        match self {
            Decoded::Motion(vector) => *vector,
            _ => DisplacementVector::ZERO,
        }
    }

    pub fn motion_requested(&self) -> bool {
        matches!(self, Decoded::Motion(_))
    }
}

/// Which decoder branch runs each tick
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputSource {
    LocalHardware,
    RemoteLink,
    #[default]
    None,
}

impl InputSource {
    pub const fn name(self) -> &'static str {
        match self {
            InputSource::LocalHardware => "HARDWARE",
            InputSource::RemoteLink => "BLUETOOTH",
            InputSource::None => "NO_JOYSTICK",
        }
    }
}

/// Analog joystick axes; the ADC itself lives outside this crate
pub trait JoystickAxes {
    type Error;

    /// Raw `(x, y)` samples in `[0, MAX_RAW]`
    fn read_axes(&mut self) -> Result<(u16, u16), Self::Error>;
}

/// Centre a raw analog pair
pub fn center_raw(raw_x: u16, raw_y: u16, center: i32) -> DisplacementVector {
    DisplacementVector::new(i32::from(raw_x) - center, i32::from(raw_y) - center)
}

/// Value of the first `label` field in a continuous frame
///
/// The value is the run of ASCII digits right after the label. A missing
/// label, an empty run, or a value above [`FRAME_VALUE_MAX`] all read as 0.
pub fn parse_field(frame: &[u8], label: u8) -> u32 {
    let Some(start) = frame.iter().position(|&b| b == label) else {
        return 0;
    };
    let mut value: u32 = 0;
    for &b in frame[start + 1..].iter().take_while(|b| b.is_ascii_digit()) {
        let digit = u32::from(b - b'0');
        value = match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
            Some(v) if v <= FRAME_VALUE_MAX => v,
            _ => return 0,
        };
    }
    value
}

/// Vector carried by a continuous frame body (without start/end markers)
pub fn decode_frame(frame: &[u8], center: i32) -> DisplacementVector {
    let scale = |v: u32| FRAME_VALUE_SCALE * v as i32 - center;
    DisplacementVector::new(
        scale(parse_field(frame, b'X')),
        scale(parse_field(frame, b'Y')),
    )
}

/// Turns raw input events into displacement vectors
#[derive(Clone, Copy, Debug)]
pub struct CommandDecoder {
    center: i32,
}

impl CommandDecoder {
    pub const fn new(center: i32) -> Self {
        Self { center }
    }

    pub fn center(&self) -> i32 {
        self.center
    }

    /// Local joystick: always a motion request, even at rest
    pub fn decode_hardware(&self, raw_x: u16, raw_y: u16) -> Decoded {
        trace!("(X, Y) = ({},{})", raw_x, raw_y);
        Decoded::Motion(center_raw(raw_x, raw_y, self.center))
    }

    /// Remote link: consume one code and, for a frame, the frame body
    ///
    /// Link errors and unknown bytes decode as [`Decoded::Ignored`].
    pub fn decode_link<L: LinkTransport>(
        &self,
        link: &mut L,
        modes: &mut ModeMachine,
    ) -> Decoded {
        let byte = match link.read_byte() {
            Ok(Some(byte)) => byte,
            Ok(None) => return Decoded::Ignored,
            Err(_) => {
                warn!("Link read failed");
                return Decoded::Ignored;
            }
        };

        let Some(code) = PadCode::from_byte(byte) else {
            trace!("Ignoring link byte {=u8:#x}", byte);
            return Decoded::Ignored;
        };

        match code {
            PadCode::Direction(direction) => {
                debug!("Pad direction {}", direction);
                Decoded::Motion(direction.vector(self.center))
            }
            PadCode::Stop => Decoded::Stop,
            PadCode::Mode => {
                modes.advance();
                Decoded::ModeAdvanced
            }
            PadCode::FrameStart => match link.read_frame_until(FRAME_END) {
                Ok(frame) => {
                    let vector = decode_frame(&frame, self.center);
                    debug!("Frame decoded to ({},{})", vector.x, vector.y);
                    Decoded::Motion(vector)
                }
                Err(_) => {
                    warn!("Link frame read failed");
                    Decoded::Ignored
                }
            },
        }
    }
}
