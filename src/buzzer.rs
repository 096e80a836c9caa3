//! Buzzer tunes selected by the operating mode
//!
//! A tune is a list of `(pitch, duration code)` notes. The duration code is
//! the note type: 4 = quarter note = 1000 / 4 ms, 8 = eighth, and so on.
//! Each call to [`Buzzer::play_next`] plays one note and blocks for the note
//! plus a 20% gap.

use embedded_hal::delay::DelayNs;

use crate::config::SILENCE_HOLD_MS;
use crate::led::Pattern;
use crate::mode::{OperatingMode, TuneCursor};

/// Note frequencies in Hz
pub mod pitch {
    pub const REST: u16 = 0;
    pub const FS3: u16 = 185;
    pub const G3: u16 = 196;
    pub const A3: u16 = 220;
    pub const AS3: u16 = 233;
    pub const B3: u16 = 247;
    pub const C4: u16 = 262;
    pub const CS4: u16 = 277;
    pub const D4: u16 = 294;
    pub const DS4: u16 = 311;
    pub const E4: u16 = 330;
    pub const F4: u16 = 349;
    pub const FS4: u16 = 370;
    pub const G4: u16 = 392;
    pub const GS4: u16 = 415;
    pub const A4: u16 = 440;
    pub const AS4: u16 = 466;
    pub const B4: u16 = 494;
    pub const C5: u16 = 523;
    pub const CS5: u16 = 554;
    pub const D5: u16 = 587;
    pub const DS5: u16 = 622;
    pub const E5: u16 = 659;
}

use pitch::*;

/// `(frequency Hz, duration code)`
pub type Note = (u16, u16);

#[rustfmt::skip]
pub const PINK_PANTHER: &[Note] = &[
    (REST, 2), (REST, 4), (REST, 8), (DS4, 8),
    (E4, 4), (REST, 8), (FS4, 8), (G4, 4), (REST, 8), (DS4, 8),
    (E4, 8), (FS4, 8), (G4, 8), (C5, 8), (B4, 8), (E4, 8), (G4, 8), (B4, 8),
    (AS4, 2), (A4, 16), (G4, 16), (E4, 16), (D4, 16),
    (E4, 2), (REST, 4), (REST, 8), (DS4, 4),
    (E4, 4), (REST, 8), (FS4, 8), (G4, 4), (REST, 8), (DS4, 8),
    (E4, 8), (FS4, 8), (G4, 8), (C5, 8), (B4, 8), (G4, 8), (B4, 8), (E5, 8),
    (DS5, 1),
    (D5, 2), (REST, 4), (REST, 8), (DS4, 8),
    (E4, 4), (REST, 8), (FS4, 8), (G4, 4), (REST, 8), (DS4, 8),
    (E4, 8), (FS4, 8), (G4, 8), (C5, 8), (B4, 8), (E4, 8), (G4, 8), (B4, 8),
    (AS4, 2), (A4, 16), (G4, 16), (E4, 16), (D4, 16),
    (E4, 4), (REST, 4),
    (REST, 4), (E5, 8), (D5, 8), (B4, 8), (A4, 8), (G4, 8), (E4, 8),
    (AS4, 16), (A4, 8), (AS4, 16), (A4, 8), (AS4, 16), (A4, 8), (AS4, 16), (A4, 8),
    (G4, 16), (E4, 16), (D4, 16), (E4, 16), (E4, 16), (E4, 2),
];

#[rustfmt::skip]
pub const NOKIA: &[Note] = &[
    (E5, 8), (D5, 8), (FS4, 4), (GS4, 4),
    (CS5, 8), (B4, 8), (D4, 4), (E4, 4),
    (B4, 8), (A4, 8), (CS4, 4), (E4, 4),
    (A4, 2),
];

#[rustfmt::skip]
pub const SUBWAY_SURFERS: &[Note] = &[
    (C4, 4), (REST, 8), (G4, 4), (REST, 8), (AS4, 4), (C5, 8), (AS4, 8), (REST, 16), (F4, 8), (DS4, 8), (REST, 16),
    (C4, 4), (REST, 8), (G4, 4), (REST, 8), (AS4, 4), (C5, 8), (AS4, 8), (REST, 16), (F4, 8), (DS4, 8), (REST, 16),
    (C4, 4), (REST, 8), (G4, 4), (REST, 8), (AS4, 4), (C5, 8), (AS4, 8), (REST, 16), (F4, 8), (DS4, 8), (REST, 16),
    (C4, 4), (REST, 8), (E4, 4), (REST, 8), (G4, 4), (A4, 4), (AS4, 4),
    (C5, 8), (REST, 16), (C5, 8), (REST, 16), (AS4, 8), (REST, 16), (A4, 8), (REST, 16),
    (AS4, 8), (REST, 16), (AS4, 8), (C5, 8), (REST, 16), (AS4, 8), (A4, 8), (REST, 16),
    (REST, 4),
    (C5, 8), (REST, 16), (AS4, 8), (REST, 16), (A4, 8), (REST, 16), (AS4, 8), (REST, 4), (E5, 8),
    (REST, 4),
    (C5, 8), (REST, 16), (C5, 8), (REST, 16), (AS4, 8), (REST, 16), (A4, 8), (REST, 16),
    (AS4, 8), (REST, 16), (AS4, 8), (C5, 8), (REST, 16), (AS4, 8), (A4, 8), (REST, 16),
    (REST, 4),
    (C5, 8), (REST, 16), (AS4, 8), (REST, 16), (A4, 8), (REST, 16), (AS4, 8), (REST, 4), (E4, 8),
    (REST, 1),
];

#[rustfmt::skip]
pub const THE_SIMPSONS: &[Note] = &[
    (C4, 2), (E4, 4), (FS4, 4), (REST, 32), (A4, 8),
    (G4, 2), (E4, 4), (C4, 4), (A3, 8),
    (FS3, 8), (FS3, 8), (FS3, 8), (G3, 4), (REST, 2),
    (FS3, 8), (FS3, 8), (FS3, 8), (G3, 4), (AS3, 2),
    (B3, 2), (REST, 2),
];

/// Tunes indexed by [`OperatingMode::tune_index`]
pub const TUNES: [&[Note]; 4] = [PINK_PANTHER, NOKIA, SUBWAY_SURFERS, THE_SIMPSONS];

/// Tone generator behind the buzzer pin
pub trait ToneOutput {
    type Error;

    /// Start a square wave; the output stops on its own after `duration_ms`
    fn tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), Self::Error>;

    /// Stop any tone immediately
    fn no_tone(&mut self) -> Result<(), Self::Error>;
}

/// Sounding time of a duration code, in ms
pub const fn note_duration_ms(code: u16) -> u32 {
    1000 / code as u32
}

/// Note time plus the 20% gap separating it from the next one
pub const fn note_pause_ms(duration_ms: u32) -> u32 {
    duration_ms * 6 / 5
}

/// What one [`Buzzer::play_next`] call did
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Played {
    Note { frequency_hz: u16, duration_ms: u32 },
    Silence,
}

/// Plays the tune of the current mode, one note per call
pub struct Buzzer<T, D> {
    output: T,
    delay: D,
}

impl<T, D> Buzzer<T, D>
where
    T: ToneOutput,
    D: DelayNs,
{
    pub fn new(output: T, delay: D) -> Self {
        Self { output, delay }
    }

    /// Play the note under `cursor` and step it
    ///
    /// Past the end of the tune, or in a mode without a tune, the buzzer is
    /// silenced and the call holds for a short while instead.
    pub fn play_next(
        &mut self,
        mode: OperatingMode,
        cursor: &mut TuneCursor,
    ) -> Result<Played, T::Error> {
        let note = match Pattern::for_mode(mode) {
            Pattern::Off => None,
            _ => TUNES[usize::from(mode.tune_index())]
                .get(cursor.position())
                .copied(),
        };

        let Some((frequency_hz, code)) = note else {
            self.output.no_tone()?;
            self.delay.delay_ms(SILENCE_HOLD_MS);
            return Ok(Played::Silence);
        };

        let duration_ms = note_duration_ms(code);
        if frequency_hz == REST {
            self.output.no_tone()?;
        } else {
            self.output.tone(frequency_hz, duration_ms)?;
        }
        self.delay.delay_ms(note_pause_ms(duration_ms));
        self.output.no_tone()?;
        cursor.step();

        Ok(Played::Note {
            frequency_hz,
            duration_ms,
        })
    }
}
