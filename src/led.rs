//! LED ring patterns driven by the operating mode
//!
//! The strip itself is any [`SmartLedsWrite`] driver (WS2812/NeoPixel).

use smart_leds::{RGB8, SmartLedsWrite};

use crate::mode::OperatingMode;

/// RGB color
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn off() -> Self {
        Self { r: 0, g: 0, b: 0 }
    }
}

impl From<Color> for RGB8 {
    fn from(color: Color) -> Self {
        RGB8::new(color.r, color.g, color.b)
    }
}

pub const DEFAULT_PALETTE: [Color; 4] = [
    Color::new(30, 2, 50),
    Color::new(0, 0, 100),
    Color::new(0, 50, 50),
    Color::new(69, 6, 23),
];

pub const ITALY_PALETTE: [Color; 3] = [
    Color::new(100, 0, 0),
    Color::new(0, 100, 0),
    Color::new(50, 50, 50),
];

pub const FRANCE_PALETTE: [Color; 3] = [
    Color::new(100, 0, 0),
    Color::new(50, 50, 50),
    Color::new(0, 0, 100),
];

pub const RAINBOW_PALETTE: [Color; 7] = [
    Color::new(30, 2, 50),
    Color::new(0, 0, 100),
    Color::new(5, 50, 30),
    Color::new(0, 100, 0),
    Color::new(50, 40, 0),
    Color::new(75, 15, 0),
    Color::new(100, 0, 0),
];

/// Color sequence repeated along the strip
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Palette {
    Default,
    Italy,
    France,
    Rainbow,
}

impl Palette {
    pub const fn colors(self) -> &'static [Color] {
        match self {
            Palette::Default => &DEFAULT_PALETTE,
            Palette::Italy => &ITALY_PALETTE,
            Palette::France => &FRANCE_PALETTE,
            Palette::Rainbow => &RAINBOW_PALETTE,
        }
    }

    const fn from_index(index: u8) -> Self {
        match index % 4 {
            0 => Palette::Default,
            1 => Palette::Italy,
            2 => Palette::France,
            _ => Palette::Rainbow,
        }
    }
}

/// What the ring shows for a given mode
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Palette drawn from its first color
    Static(Palette),
    /// Palette rotated one step per refresh
    Dynamic(Palette),
    /// Strip cleared
    Off,
}

impl Pattern {
    /// Modes 0-3 are static, 4-7 their rotating twins, anything above is off
    pub const fn for_mode(mode: OperatingMode) -> Self {
        match mode.index() {
            index @ 0..=3 => Pattern::Static(Palette::from_index(index)),
            index @ 4..=7 => Pattern::Dynamic(Palette::from_index(index)),
            _ => Pattern::Off,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Pattern::Static(Palette::Default) => "Default static",
            Pattern::Static(Palette::Italy) => "Italy static",
            Pattern::Static(Palette::France) => "France static",
            Pattern::Static(Palette::Rainbow) => "Rainbow static",
            Pattern::Dynamic(Palette::Default) => "Default dynamic",
            Pattern::Dynamic(Palette::Italy) => "Italy dynamic",
            Pattern::Dynamic(Palette::France) => "France dynamic",
            Pattern::Dynamic(Palette::Rainbow) => "Rainbow dynamic",
            Pattern::Off => "LED strip off",
        }
    }

    pub const fn palette(self) -> Option<Palette> {
        match self {
            Pattern::Static(palette) | Pattern::Dynamic(palette) => Some(palette),
            Pattern::Off => None,
        }
    }
}

/// Fill `pixels` with `palette` starting at `offset`
pub fn fill(pixels: &mut [Color], palette: &[Color], offset: usize) {
    for (i, pixel) in pixels.iter_mut().enumerate() {
        *pixel = palette[(offset + i) % palette.len()];
    }
}

/// Draws the mode pattern onto an `N`-pixel strip
pub struct PatternRenderer<LED, const N: usize> {
    strip: LED,
    pixels: [Color; N],
    offset: usize,
}

impl<LED, const N: usize> PatternRenderer<LED, N>
where
    LED: SmartLedsWrite,
    LED::Color: From<RGB8>,
{
    pub fn new(strip: LED) -> Self {
        Self {
            strip,
            pixels: [Color::off(); N],
            offset: 0,
        }
    }

    /// Recompute the whole strip for `mode` and push it out
    ///
    /// Dynamic patterns advance by one palette step per call, so the caller
    /// sets the animation speed by how often it calls this.
    pub fn render(&mut self, mode: OperatingMode) -> Result<(), LED::Error> {
        let pattern = Pattern::for_mode(mode);
        match pattern {
            Pattern::Static(palette) => {
                self.offset = 0;
                fill(&mut self.pixels, palette.colors(), 0);
            }
            Pattern::Dynamic(palette) => {
                let colors = palette.colors();
                self.offset = (self.offset + 1) % colors.len();
                fill(&mut self.pixels, colors, self.offset);
            }
            Pattern::Off => {
                self.offset = 0;
                self.pixels = [Color::off(); N];
            }
        }
        trace!("Current LED display: {} (pattern {})", pattern.name(), mode.index());
        self.strip
            .write(self.pixels.iter().map(|&color| RGB8::from(color)))
    }

    /// Last frame pushed to the strip
    pub fn pixels(&self) -> &[Color; N] {
        &self.pixels
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn strip(&self) -> &LED {
        &self.strip
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;
    use smart_leds::{RGB8, SmartLedsWrite};
    use std::vec::Vec;

    /// Strip keeping every frame written to it
    #[derive(Default)]
    pub struct RecordingStrip {
        pub frames: Vec<Vec<RGB8>>,
    }

    impl SmartLedsWrite for RecordingStrip {
        type Error = Infallible;
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
        where
            T: IntoIterator<Item = I>,
            I: Into<Self::Color>,
        {
            self.frames
                .push(iterator.into_iter().map(Into::into).collect());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::RecordingStrip;
    use super::*;

    #[test]
    fn mode_to_pattern() {
        assert_eq!(
            Pattern::for_mode(OperatingMode::new(0)),
            Pattern::Static(Palette::Default)
        );
        assert_eq!(
            Pattern::for_mode(OperatingMode::new(3)),
            Pattern::Static(Palette::Rainbow)
        );
        assert_eq!(
            Pattern::for_mode(OperatingMode::new(5)),
            Pattern::Dynamic(Palette::Italy)
        );
        assert_eq!(Pattern::for_mode(OperatingMode::new(8)), Pattern::Off);
        assert_eq!(Pattern::for_mode(OperatingMode::new(6)).name(), "France dynamic");
    }

    #[test]
    fn static_pattern_repeats_palette() {
        let mut renderer = PatternRenderer::<_, 8>::new(RecordingStrip::default());
        renderer.render(OperatingMode::new(1)).unwrap();
        renderer.render(OperatingMode::new(1)).unwrap();
        let expected: [Color; 8] = core::array::from_fn(|i| ITALY_PALETTE[i % 3]);
        assert_eq!(renderer.pixels(), &expected);
        assert_eq!(renderer.offset(), 0);
    }

    #[test]
    fn dynamic_pattern_rotates_per_call() {
        let mut renderer = PatternRenderer::<_, 5>::new(RecordingStrip::default());
        let mode = OperatingMode::new(4);
        renderer.render(mode).unwrap();
        assert_eq!(renderer.pixels()[0], DEFAULT_PALETTE[1]);
        renderer.render(mode).unwrap();
        assert_eq!(renderer.pixels()[0], DEFAULT_PALETTE[2]);
        renderer.render(mode).unwrap();
        renderer.render(mode).unwrap();
        assert_eq!(renderer.offset(), 0);
        assert_eq!(renderer.pixels()[4], DEFAULT_PALETTE[0]);
    }

    #[test]
    fn off_clears_strip() {
        let mut renderer = PatternRenderer::<_, 4>::new(RecordingStrip::default());
        renderer.render(OperatingMode::new(7)).unwrap();
        renderer.render(OperatingMode::new(8)).unwrap();
        assert!(renderer.pixels().iter().all(|&c| c == Color::off()));
        assert_eq!(renderer.strip.frames.len(), 2);
        assert_eq!(renderer.strip.frames[1], std::vec![RGB8::default(); 4]);
    }

    #[test]
    fn strip_receives_rgb() {
        let mut renderer = PatternRenderer::<_, 2>::new(RecordingStrip::default());
        renderer.render(OperatingMode::new(2)).unwrap();
        assert_eq!(
            renderer.strip.frames[0],
            std::vec![RGB8::new(100, 0, 0), RGB8::new(50, 50, 50)]
        );
    }
}
