//! Text rendering onto RGBA canvases
//!
//! Two renderers share the [`GlyphRenderer`] trait:
//! - [`TrueTypeFont`] draws with a TrueType/OpenType face via `imageproc`
//! - [`BitmapFont`] draws built-in 8x8 glyphs scaled to the requested size,
//!   so no font file is needed

use crate::config::FontConfig;
use crate::error::{ProcessError, Result};
use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};

/// Draws text onto an RGBA canvas
pub trait GlyphRenderer {
    /// Draw `text` with its top-left corner at `(x, y)`, glyph height `size`
    /// pixels. Pixels falling outside the canvas are skipped.
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
    );

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Load the renderer selected by the font configuration
///
/// # Errors
/// `FontNotFound` when the font file is missing, `FontLoad` when it cannot
/// be read or parsed. The built-in bitmap font never fails.
pub fn load_glyphs(config: &FontConfig) -> Result<Box<dyn GlyphRenderer>> {
    if config.builtin {
        return Ok(Box::new(BitmapFont));
    }
    Ok(Box::new(TrueTypeFont::load(&config.path)?))
}

/// TrueType/OpenType face loaded into memory
pub struct TrueTypeFont {
    path: PathBuf,
    font: FontVec,
}

impl TrueTypeFont {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ProcessError::FontNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|e| ProcessError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|e| ProcessError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        log::debug!("Loaded font {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            font,
        })
    }
}

impl GlyphRenderer for TrueTypeFont {
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
    ) {
        draw_text_mut(canvas, color, x, y, PxScale::from(size), &self.font, text);
    }

    fn describe(&self) -> String {
        format!("truetype font {}", self.path.display())
    }
}

/// Built-in monospaced bitmap glyphs
///
/// Each character is an 8x8 bitmap stretched over a `size x size` cell and
/// advances the pen by one cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

impl GlyphRenderer for BitmapFont {
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Rgba<u8>,
    ) {
        let cell = size.round().max(1.0) as u32;
        let (width, height) = canvas.dimensions();

        for (i, ch) in text.chars().enumerate() {
            let origin_x = x as i64 + i as i64 * cell as i64;
            for cy in 0..cell {
                for cx in 0..cell {
                    // Nearest-neighbour scale of the 8x8 glyph onto the cell
                    if !should_draw_pixel(ch, cx * 8 / cell, cy * 8 / cell) {
                        continue;
                    }
                    let px = origin_x + cx as i64;
                    let py = y as i64 + cy as i64;
                    if px >= 0 && py >= 0 && px < width as i64 && py < height as i64 {
                        canvas.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }

    fn describe(&self) -> String {
        "built-in bitmap font".to_string()
    }
}

/// Determine if a pixel should be drawn for a character at a given position
///
/// Covers the default palette plus a few common ramp characters. Anything
/// else renders as a filled block.
///
/// # Arguments
/// * `ch` - The character
/// * `x` - X position within 8x8 grid (0-7)
/// * `y` - Y position within 8x8 grid (0-7)
///
/// # Returns
/// true if pixel should be drawn (foreground color), false for background
pub fn should_draw_pixel(ch: char, x: u32, y: u32) -> bool {
    let mid = |v: u32| (3..=4).contains(&v);
    match ch {
        ' ' => false,

        '.' => mid(x) && (5..=6).contains(&y),

        '-' => mid(y) && (1..=6).contains(&x),

        'i' => mid(x) && (y == 1 || y >= 3),

        'T' => y <= 1 || mid(x),

        'S' => {
            let bars = (y == 0 || mid(y) || y == 7) && (1..=6).contains(&x);
            let upper_left = x <= 1 && (1..=3).contains(&y);
            let lower_right = x >= 6 && (4..=6).contains(&y);
            bars || upper_left || lower_right
        }

        'A' => {
            let apex = y <= 1 && (2..=5).contains(&x);
            let legs = (x <= 1 || x >= 6) && y >= 1;
            apex || legs || mid(y)
        }

        '|' => mid(x),

        ':' => mid(x) && (y == 2 || y == 5),

        '=' => y == 2 || y == 5,

        '+' => mid(x) || mid(y),

        '#' => x == 2 || x == 5 || y == 2 || y == 5,

        '@' => {
            // Filled circle approximation
            let dx = x as i32 - 3;
            let dy = y as i32 - 3;
            dx * dx + dy * dy <= 12
        }

        _ => true,
    }
}
