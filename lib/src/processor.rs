use crate::ascii::convert_to_ascii;
use crate::config::{AsciiConfig, ProcessConfig, WatermarkConfig};
use crate::error::{ProcessError, Result};
use crate::filters;
use crate::glyphs::GlyphRenderer;
use crate::step::Step;
use crate::transform;
use image::{DynamicImage, Rgba, RgbaImage, imageops};
use std::path::{Path, PathBuf};

/// Whether a path's extension names a format without an alpha channel
///
/// JPEG output gets flattened to RGB before encoding.
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

/// One image being transformed
///
/// Holds the decoded image and replaces it with the result of every
/// transformation. The image as first decoded is kept alongside so the
/// ASCII converter can sample it in its legacy reload mode.
pub struct ImageProcessor {
    path: PathBuf,
    original: DynamicImage,
    image: DynamicImage,
}

impl ImageProcessor {
    /// Decode an image file, converting it to RGBA8
    ///
    /// # Errors
    /// `Decode` when the file cannot be read or decoded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| ProcessError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_image(path, DynamicImage::ImageRgba8(decoded.to_rgba8())))
    }

    /// Wrap an in-memory image; `path` is only used for naming and reporting
    pub fn from_image(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            original: image.clone(),
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_image(self) -> DynamicImage {
        self.image
    }

    /// Rotate counter-clockwise by `angle` degrees, keeping the canvas size
    pub fn rotate(&mut self, angle: f32) {
        self.image = transform::rotate(&self.image, angle);
    }

    /// Shrink to fit inside `width x height`, preserving aspect ratio
    pub fn thumbnail(&mut self, width: u32, height: u32) {
        self.image = transform::thumbnail(&self.image, width, height);
    }

    pub fn grayscale(&mut self) {
        self.image = filters::grayscale(&self.image);
    }

    pub fn contrast(&mut self, amount: f32) {
        self.image = filters::contrast(&self.image, amount);
    }

    /// Centre square crop resized to `size x size`
    pub fn square(&mut self, size: u32) -> Result<()> {
        self.image = transform::square(&self.image, size)?;
        Ok(())
    }

    /// Overlay semi-transparent text
    ///
    /// The image is converted to RGBA so colored text can go on top of a
    /// grayscale image. Text is drawn on a transparent layer which is then
    /// alpha-composited, so the color's alpha sets the opacity.
    pub fn watermark(&mut self, config: &WatermarkConfig, glyphs: &dyn GlyphRenderer) {
        let mut base = self.image.to_rgba8();
        let (width, height) = base.dimensions();

        let mut layer = RgbaImage::new(width, height);
        let [x, y] = config.position;
        glyphs.draw_text(
            &mut layer,
            &config.text,
            x,
            y,
            config.size,
            Rgba(config.color),
        );

        imageops::overlay(&mut base, &layer, 0, 0);
        self.image = DynamicImage::ImageRgba8(base);
    }

    /// Replace the image with its ASCII-art rendering
    ///
    /// # Errors
    /// `InvalidInput` when the image is smaller than one cell.
    pub fn ascii(&mut self, config: &AsciiConfig, glyphs: &dyn GlyphRenderer) -> Result<()> {
        let canvas = convert_to_ascii(&self.image, &self.original, config, glyphs)?;
        self.image = DynamicImage::ImageRgba8(canvas);
        Ok(())
    }

    /// Apply one configured step
    ///
    /// `glyphs` is required by text-drawing steps only.
    pub fn apply(
        &mut self,
        step: &Step,
        config: &ProcessConfig,
        glyphs: Option<&dyn GlyphRenderer>,
    ) -> Result<()> {
        log::debug!("{}: {}", self.path.display(), step);

        let require_glyphs = || {
            glyphs.ok_or_else(|| {
                ProcessError::InvalidInput(format!("step `{}` needs a font", step.name()))
            })
        };

        match *step {
            Step::Rotate(angle) => self.rotate(angle),
            Step::Thumbnail { width, height } => self.thumbnail(width, height),
            Step::Grayscale => self.grayscale(),
            Step::Contrast(amount) => self.contrast(amount),
            Step::Square(size) => self.square(size)?,
            Step::Watermark => self.watermark(&config.watermark, require_glyphs()?),
            Step::Ascii => self.ascii(&config.ascii, require_glyphs()?)?,
        }
        Ok(())
    }

    /// Encode the current image to `output_path`
    ///
    /// JPEG targets are flattened to RGB first since JPEG has no alpha.
    ///
    /// # Errors
    /// `Encode` when the format is unsupported or writing fails.
    pub fn save(&self, output_path: impl AsRef<Path>) -> Result<()> {
        let output_path = output_path.as_ref();

        let result = if is_jpeg_path(output_path) {
            DynamicImage::ImageRgb8(self.image.to_rgb8()).save(output_path)
        } else {
            self.image.save(output_path)
        };
        result.map_err(|e| ProcessError::Encode {
            path: output_path.to_path_buf(),
            source: e,
        })?;

        log::info!("saved in {}", output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::BitmapFont;
    use image::{ColorType, GenericImageView};

    fn rgba(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    #[test]
    fn test_is_jpeg_path() {
        assert!(is_jpeg_path(Path::new("out/a.jpg")));
        assert!(is_jpeg_path(Path::new("out/a.JPEG")));
        assert!(!is_jpeg_path(Path::new("out/a.png")));
        assert!(!is_jpeg_path(Path::new("out/jpg")));
    }

    #[test]
    fn test_open_missing_file_is_decode_error() {
        assert!(matches!(
            ImageProcessor::open("no/such/image.png"),
            Err(ProcessError::Decode { .. })
        ));
    }

    #[test]
    fn test_open_converts_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::new(6, 4).save(&path).unwrap();

        let processor = ImageProcessor::open(&path).unwrap();
        assert_eq!(processor.image().color(), ColorType::Rgba8);
        assert_eq!(processor.image().dimensions(), (6, 4));
    }

    #[test]
    fn test_save_jpg_strips_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let processor = ImageProcessor::from_image(&path, rgba(16, 16, [10, 200, 30, 120]));

        processor.save(&path).unwrap();

        let reopened = image::open(&path).unwrap();
        assert_eq!(reopened.color(), ColorType::Rgb8);
        assert_eq!(reopened.color().channel_count(), 3);
    }

    #[test]
    fn test_save_png_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let processor = ImageProcessor::from_image(&path, rgba(4, 4, [1, 2, 3, 4]));

        processor.save(&path).unwrap();

        let reopened = image::open(&path).unwrap();
        assert_eq!(reopened.color(), ColorType::Rgba8);
    }

    #[test]
    fn test_save_unknown_extension_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("image.notaformat");
        let processor = ImageProcessor::from_image(&path, rgba(4, 4, [0, 0, 0, 255]));
        assert!(matches!(
            processor.save(&path),
            Err(ProcessError::Encode { .. })
        ));
    }

    #[test]
    fn test_chain_of_transformations() {
        let mut processor = ImageProcessor::from_image("a.png", rgba(400, 200, [90, 90, 90, 255]));
        processor.square(100).unwrap();
        processor.grayscale();
        processor.contrast(1.5);
        processor.rotate(180.0);
        processor.thumbnail(64, 64);

        assert_eq!(processor.image().dimensions(), (64, 64));
        assert_eq!(processor.image().color(), ColorType::L8);
    }

    #[test]
    fn test_watermark_blends_translucent_text() {
        let mut processor = ImageProcessor::from_image(
            "a.png",
            DynamicImage::ImageLuma8(image::GrayImage::new(80, 80)),
        );
        let config = WatermarkConfig {
            text: "#".to_string(),
            position: [0, 0],
            size: 8.0,
            color: [0, 255, 0, 100],
        };
        processor.watermark(&config, &BitmapFont);

        let out = processor.image().to_rgba8();
        assert_eq!(processor.image().color(), ColorType::Rgba8);
        // Glyph pixel: green blended over black at ~40% opacity
        let inked = out.get_pixel(2, 0);
        assert_eq!(inked[0], 0);
        assert!(inked[1] > 80 && inked[1] < 120, "{inked:?}");
        assert_eq!(inked[3], 255);
        // Outside the text the image is untouched
        assert_eq!(out.get_pixel(40, 40), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_ascii_replaces_image() {
        let mut processor = ImageProcessor::from_image("a.png", rgba(45, 33, [0, 0, 0, 255]));
        processor.ascii(&AsciiConfig::default(), &BitmapFont).unwrap();
        assert_eq!(processor.image().dimensions(), (40, 30));
    }

    #[test]
    fn test_ascii_reload_samples_original() {
        let mut processor = ImageProcessor::from_image("a.png", rgba(20, 20, [255, 255, 255, 255]));
        processor.contrast(0.0);
        processor.rotate(90.0);
        let config = AsciiConfig {
            reload_before_sample: true,
            ..Default::default()
        };
        processor.ascii(&config, &BitmapFont).unwrap();

        // White original renders as spaces only: nothing but background
        let out = processor.image().to_rgba8();
        assert!(out.pixels().all(|p| *p == Rgba([0x27, 0x27, 0xe6, 255])));
    }

    #[test]
    fn test_apply_steps() {
        let config = ProcessConfig::default();
        let mut processor = ImageProcessor::from_image("a.png", rgba(300, 100, [0, 0, 0, 255]));

        processor.apply(&Step::Square(50), &config, None).unwrap();
        processor.apply(&Step::Ascii, &config, Some(&BitmapFont)).unwrap();

        assert_eq!(processor.image().dimensions(), (50, 50));
    }

    #[test]
    fn test_apply_text_step_without_font() {
        let config = ProcessConfig::default();
        let mut processor = ImageProcessor::from_image("a.png", rgba(30, 30, [0, 0, 0, 255]));
        assert!(matches!(
            processor.apply(&Step::Watermark, &config, None),
            Err(ProcessError::InvalidInput(_))
        ));
    }
}
