//! ASCII palette lookup
//!
//! Maps a sampled pixel to a palette character. The palette is ordered from
//! darkest (index 0) to brightest (last index).

use crate::filters::luminance;
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default palette, darkest first.
///
/// The sparse-to-dense ramp `" .-iTSA"` reversed, so dense glyphs sit on
/// dark cells.
pub const DEFAULT_PALETTE: [char; 7] = ['A', 'S', 'T', 'i', '-', '.', ' '];

/// Which pixel value drives character selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    /// Red channel only. Green and blue are ignored.
    #[default]
    Red,
    /// ITU-R 601-2 luma (0.299R + 0.587G + 0.114B)
    Luminance,
}

impl BrightnessMode {
    /// Brightness of a pixel in `[0.0, 1.0)`
    ///
    /// The channel value is divided by 256, not 255, so a full-scale channel
    /// still lands strictly below 1.0.
    pub fn brightness(self, pixel: &Rgba<u8>) -> f32 {
        let value = match self {
            BrightnessMode::Red => pixel[0],
            BrightnessMode::Luminance => luminance(pixel[0], pixel[1], pixel[2]),
        };
        value as f32 / 256.0
    }

    pub fn name(self) -> &'static str {
        match self {
            BrightnessMode::Red => "red",
            BrightnessMode::Luminance => "luminance",
        }
    }
}

impl fmt::Display for BrightnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrightnessMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(BrightnessMode::Red),
            "luminance" | "luma" => Ok(BrightnessMode::Luminance),
            other => Err(format!(
                "unknown brightness mode `{other}` (expected `red` or `luminance`)"
            )),
        }
    }
}

/// Palette index for a brightness value
///
/// # Arguments
/// * `brightness` - Brightness, nominally in `[0.0, 1.0)`
/// * `palette_len` - Number of characters in the palette (must be > 0)
///
/// # Returns
/// `floor(palette_len * brightness)`, clamped to `0..palette_len`
pub fn palette_index(brightness: f32, palette_len: usize) -> usize {
    debug_assert!(palette_len > 0, "palette must not be empty");

    let scaled = (palette_len as f32 * brightness.max(0.0)).floor() as usize;
    // A brightness of exactly 1.0 would index one past the end
    scaled.min(palette_len - 1)
}

/// Select the palette character for a sampled pixel
///
/// # Arguments
/// * `pixel` - Sampled RGBA pixel
/// * `mode` - Brightness source
/// * `palette` - Characters ordered darkest first (must be non-empty)
pub fn select_char(pixel: &Rgba<u8>, mode: BrightnessMode, palette: &[char]) -> char {
    let index = palette_index(mode.brightness(pixel), palette.len());
    palette[index]
}
