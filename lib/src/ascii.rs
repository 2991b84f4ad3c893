use crate::config::AsciiConfig;
use crate::error::{ProcessError, Result};
use crate::filters::{contrast, grayscale};
use crate::glyphs::GlyphRenderer;
use crate::lut::select_char;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Number of grid cells for an image
///
/// # Arguments
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `font_size` - Cell edge length in pixels (must be > 0)
///
/// # Returns
/// `(floor(width / font_size), floor(height / font_size))`
pub fn grid_dimensions(width: u32, height: u32, font_size: u32) -> (u32, u32) {
    (width / font_size, height / font_size)
}

/// Downsample an image to one pixel per grid cell
///
/// # Arguments
/// * `image` - Working image
/// * `grid_width` - Number of cells horizontally
/// * `grid_height` - Number of cells vertically
///
/// # Returns
/// RGBA image of exactly `grid_width x grid_height` pixels
pub fn sample_grid(image: &DynamicImage, grid_width: u32, grid_height: u32) -> RgbaImage {
    imageops::resize(
        &image.to_rgba8(),
        grid_width,
        grid_height,
        FilterType::CatmullRom,
    )
}

/// Select a palette character for every sampled cell
///
/// # Arguments
/// * `sample` - Downsampled image, one pixel per cell
/// * `config` - Palette and brightness mode
///
/// # Returns
/// Characters in row-major order, `sample.width() * sample.height()` long
pub fn select_ascii_chars(sample: &RgbaImage, config: &AsciiConfig) -> Vec<char> {
    sample
        .pixels()
        .map(|pixel| select_char(pixel, config.brightness, &config.palette))
        .collect()
}

/// Render ASCII characters to an image
///
/// Each character occupies a `font_size x font_size` cell on a canvas
/// pre-filled with the background color.
///
/// # Arguments
/// * `chars` - Characters in row-major order (one per cell)
/// * `grid_width` - Number of cells horizontally
/// * `grid_height` - Number of cells vertically
/// * `config` - Font size and colors
/// * `glyphs` - Renderer used to draw each character
///
/// # Returns
/// RGBA image of `grid_width * font_size x grid_height * font_size` pixels
pub fn render_ascii_to_image(
    chars: &[char],
    grid_width: u32,
    grid_height: u32,
    config: &AsciiConfig,
    glyphs: &dyn GlyphRenderer,
) -> RgbaImage {
    assert_eq!(chars.len(), (grid_width * grid_height) as usize);

    let font_size = config.font_size;
    let [br, bg, bb] = config.background;
    let [fr, fg, fb] = config.foreground;
    let fg_color = Rgba([fr, fg, fb, 255]);

    let mut canvas = RgbaImage::from_pixel(
        grid_width * font_size,
        grid_height * font_size,
        Rgba([br, bg, bb, 255]),
    );

    let mut buf = [0u8; 4];
    for (idx, ch) in chars.iter().enumerate() {
        let x = idx as u32 % grid_width;
        let y = idx as u32 / grid_width;
        glyphs.draw_text(
            &mut canvas,
            ch.encode_utf8(&mut buf),
            (x * font_size) as i32,
            (y * font_size) as i32,
            font_size as f32,
            fg_color,
        );
    }

    canvas
}

/// Converts an image to ASCII art
///
/// 1. Derive the grid from the current image dimensions
/// 2. Grayscale + contrast enhancement
/// 3. Pick the working image: the enhanced buffer, or the originally
///    decoded image when `reload_before_sample` is set
/// 4. Downsample the working image to the grid
/// 5. Select one palette character per cell
/// 6. Draw the characters onto a fresh background-filled canvas
///
/// # Arguments
/// * `current` - Image in its current (possibly already transformed) state
/// * `original` - Image as first decoded from disk
/// * `config` - Conversion settings
/// * `glyphs` - Renderer used to draw the characters
///
/// # Errors
/// `InvalidInput` when the image is narrower or shorter than one cell.
pub fn convert_to_ascii(
    current: &DynamicImage,
    original: &DynamicImage,
    config: &AsciiConfig,
    glyphs: &dyn GlyphRenderer,
) -> Result<RgbaImage> {
    config.validate()?;

    let (width, height) = current.dimensions();
    let (grid_width, grid_height) = grid_dimensions(width, height, config.font_size);
    if grid_width == 0 || grid_height == 0 {
        return Err(ProcessError::InvalidInput(format!(
            "{width}x{height} image is smaller than one {size}x{size} ASCII cell",
            size = config.font_size
        )));
    }

    let enhanced = contrast(&grayscale(current), config.contrast);
    let working = if config.reload_before_sample {
        // Enhancement is discarded, sampling sees the untouched pixels
        original
    } else {
        &enhanced
    };

    let sample = sample_grid(working, grid_width, grid_height);
    let chars = select_ascii_chars(&sample, config);

    log::debug!(
        "ASCII grid {}x{} ({} cells) with {}",
        grid_width,
        grid_height,
        chars.len(),
        glyphs.describe()
    );

    Ok(render_ascii_to_image(
        &chars,
        grid_width,
        grid_height,
        config,
        glyphs,
    ))
}
