//! Batch configuration
//!
//! Every struct implements `Default` with the values the tool runs with when
//! no config file is given, and all fields are optional in TOML.

use crate::error::ConfigError;
use crate::lut::DEFAULT_PALETTE;
use crate::step::Step;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::lut::BrightnessMode;

/// Root configuration for one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Directory scanned for source images
    pub input_dir: PathBuf,

    /// Directory results are written to, mirroring input file names
    pub output_dir: PathBuf,

    /// Transformations applied to every image, in order
    pub steps: Vec<Step>,

    /// Font used by text-drawing steps
    pub font: FontConfig,

    /// ASCII conversion settings
    pub ascii: AsciiConfig,

    /// Watermark settings
    pub watermark: WatermarkConfig,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("inputs"),
            output_dir: PathBuf::from("outputs"),
            steps: vec![Step::Ascii],
            font: FontConfig::default(),
            ascii: AsciiConfig::default(),
            watermark: WatermarkConfig::default(),
        }
    }
}

impl ProcessConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: ProcessConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ascii.validate()?;
        self.watermark.validate()?;
        for step in &self.steps {
            step.validate()?;
        }
        Ok(())
    }

    /// Whether any configured step draws text and therefore needs a font
    pub fn needs_font(&self) -> bool {
        self.steps.iter().any(Step::needs_font)
    }
}

/// Font selection for text-drawing steps
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// TrueType/OpenType font file
    pub path: PathBuf,

    /// Use the built-in bitmap glyphs instead of `path`
    pub builtin: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ibm-plex-mono.ttf"),
            builtin: false,
        }
    }
}

/// Configuration for ASCII art conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// Grid cell and glyph size in pixels
    pub font_size: u32,          // default 10

    /// Characters ordered darkest first
    pub palette: Vec<char>,

    /// Contrast factor applied after grayscale, before sampling
    pub contrast: f32,           // default 3.0

    /// Colors
    pub background: [u8; 3],     // RGB, default #2727e6
    pub foreground: [u8; 3],     // RGB, default white

    /// Sample the originally decoded image instead of the enhanced one
    pub reload_before_sample: bool, // default false

    /// Which pixel value drives character selection
    pub brightness: BrightnessMode, // default red
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self {
            font_size: 10,
            palette: DEFAULT_PALETTE.to_vec(),
            contrast: 3.0,

            background: [0x27, 0x27, 0xe6],
            foreground: [255, 255, 255],

            reload_before_sample: false,
            brightness: BrightnessMode::Red,
        }
    }
}

impl AsciiConfig {
    /// Validates the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.font_size == 0 {
            return Err(ConfigError::Invalid("ascii.font_size must be at least 1".to_string()));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("ascii.palette must not be empty".to_string()));
        }
        if !self.contrast.is_finite() || self.contrast < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ascii.contrast must be a non-negative number, got {}",
                self.contrast
            )));
        }
        Ok(())
    }
}

/// Configuration for the text watermark
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub text: String,

    /// Top-left corner of the text in pixels
    pub position: [i32; 2],

    /// Glyph size in pixels
    pub size: f32,

    /// RGBA; the alpha channel sets the overlay opacity
    pub color: [u8; 4],
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: "watermark".to_string(),
            position: [32, 32],
            size: 24.0,
            color: [0, 255, 0, 100],
        }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text.is_empty() {
            return Err(ConfigError::Invalid("watermark.text must not be empty".to_string()));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "watermark.size must be positive, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ProcessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.steps, vec![Step::Ascii]);
        assert!(config.needs_font());
    }

    #[test]
    fn test_ascii_defaults() {
        let config = AsciiConfig::default();
        assert_eq!(config.font_size, 10);
        assert_eq!(config.palette, vec!['A', 'S', 'T', 'i', '-', '.', ' ']);
        assert_eq!(config.background, [39, 39, 230]);
        assert!(!config.reload_before_sample);
        assert_eq!(config.brightness, BrightnessMode::Red);
    }

    #[test]
    fn test_invalid_font_size() {
        let config = AsciiConfig {
            font_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_palette() {
        let config = AsciiConfig {
            palette: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_contrast() {
        let mut config = AsciiConfig::default();
        config.contrast = -1.0;
        assert!(config.validate().is_err());

        config.contrast = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_watermark() {
        let mut config = WatermarkConfig::default();
        config.text.clear();
        assert!(config.validate().is_err());

        let config = WatermarkConfig {
            size: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: ProcessConfig = toml::from_str(
            r##"
            input_dir = "photos"
            steps = ["rotate:90", "square:64", "watermark"]

            [font]
            builtin = true

            [ascii]
            font_size = 8
            brightness = "luminance"
            palette = ["#", "+", " "]
            "##,
        )
        .unwrap();

        assert_eq!(config.input_dir, PathBuf::from("photos"));
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(
            config.steps,
            vec![Step::Rotate(90.0), Step::Square(64), Step::Watermark]
        );
        assert!(config.font.builtin);
        assert_eq!(config.ascii.font_size, 8);
        assert_eq!(config.ascii.brightness, BrightnessMode::Luminance);
        assert_eq!(config.ascii.palette, vec!['#', '+', ' ']);
        assert_eq!(config.ascii.contrast, 3.0);
        assert_eq!(config.watermark.text, "watermark");
    }

    #[test]
    fn test_parse_rejects_unknown_step() {
        let result: Result<ProcessConfig, _> = toml::from_str(r#"steps = ["sharpen"]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imgbatch.toml");
        std::fs::write(&path, "[ascii]\nfont_size = 0\n").unwrap();
        assert!(matches!(
            ProcessConfig::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(matches!(
            ProcessConfig::load_from(Path::new("no/such/imgbatch.toml")),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = ProcessConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: ProcessConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.steps, config.steps);
        assert_eq!(parsed.ascii.palette, config.ascii.palette);
    }
}
