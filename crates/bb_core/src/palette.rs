//! Background recoloring and label contrast selection.
//!
//! Everything here is pure: the live loop feeds a random seed into
//! [`wall_hit_colors`], tests feed fixed seeds.

use std::fmt;

/// Brightness strictly above this picks a black label.
pub const BRIGHTNESS_THRESHOLD: f64 = 128.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from the low 24 bits of `value` (`0xRRGGBB`).
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Perceptual brightness on a 0..=255 scale.
    pub fn brightness(self) -> f64 {
        (self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) as f64 / 1000.0
    }

    pub fn is_bright(self) -> bool {
        self.brightness() > BRIGHTNESS_THRESHOLD
    }

    /// Channels as `[0.0, 1.0]` sRGB floats.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Label color that stays readable on `background`.
pub fn contrast_label_color(background: Rgb) -> Rgb {
    if background.is_bright() {
        Rgb::BLACK
    } else {
        Rgb::WHITE
    }
}

/// Maps a seed to `(background, label)`. Only the low 24 bits of the seed are
/// used, so every seed in `0..=0xFFFFFF` is a distinct background.
pub fn wall_hit_colors(seed: u32) -> (Rgb, Rgb) {
    let background = Rgb::from_u24(seed);
    (background, contrast_label_color(background))
}
