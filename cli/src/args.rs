use clap::Parser;
use imgbatch::{BrightnessMode, ProcessConfig, Step};
use std::path::PathBuf;

/// Apply image transformations to every file in a directory
#[derive(Parser, Debug)]
#[command(name = "imgbatch")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML config file; flags below override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to read images from [default: inputs]
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory to write results to [default: outputs]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Transformation to apply, repeatable and applied in order
    /// (rotate:<deg>, thumbnail[:<w>x<h>], grayscale, contrast[:<f>],
    /// square[:<size>], watermark, ascii) [default: ascii]
    #[arg(short, long = "step", value_name = "STEP")]
    pub steps: Vec<Step>,

    /// TrueType font for text-drawing steps
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Use the built-in bitmap glyphs instead of a font file
    #[arg(long, conflicts_with = "font")]
    pub builtin_font: bool,

    /// ASCII cell and glyph size in pixels
    #[arg(long, value_name = "PX")]
    pub font_size: Option<u32>,

    /// Pixel value that selects ASCII characters (red or luminance)
    #[arg(long, value_name = "MODE")]
    pub brightness: Option<BrightnessMode>,

    /// Sample the image as decoded instead of the contrast-enhanced copy
    #[arg(long)]
    pub reload_before_sample: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Fold command-line overrides into a loaded configuration
    pub fn apply_to(&self, config: &mut ProcessConfig) {
        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if !self.steps.is_empty() {
            config.steps = self.steps.clone();
        }
        if let Some(font) = &self.font {
            config.font.path = font.clone();
            config.font.builtin = false;
        }
        if self.builtin_font {
            config.font.builtin = true;
        }
        if let Some(size) = self.font_size {
            config.ascii.font_size = size;
        }
        if let Some(mode) = self.brightness {
            config.ascii.brightness = mode;
        }
        if self.reload_before_sample {
            config.ascii.reload_before_sample = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_alone() {
        let args = Args::parse_from(["imgbatch"]);
        let mut config = ProcessConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.steps, vec![Step::Ascii]);
        assert_eq!(config.input_dir, PathBuf::from("inputs"));
        assert!(!config.font.builtin);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "imgbatch",
            "-i",
            "photos",
            "--step",
            "rotate:180",
            "-s",
            "thumbnail",
            "--builtin-font",
            "--font-size",
            "12",
            "--brightness",
            "luminance",
            "--reload-before-sample",
        ]);
        let mut config = ProcessConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.input_dir, PathBuf::from("photos"));
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
        assert_eq!(
            config.steps,
            vec![
                Step::Rotate(180.0),
                Step::Thumbnail {
                    width: 128,
                    height: 128
                }
            ]
        );
        assert!(config.font.builtin);
        assert_eq!(config.ascii.font_size, 12);
        assert_eq!(config.ascii.brightness, BrightnessMode::Luminance);
        assert!(config.ascii.reload_before_sample);
    }

    #[test]
    fn test_bad_step_rejected() {
        assert!(Args::try_parse_from(["imgbatch", "--step", "sharpen"]).is_err());
    }

    #[test]
    fn test_font_conflicts_with_builtin() {
        assert!(Args::try_parse_from(["imgbatch", "--font", "a.ttf", "--builtin-font"]).is_err());
    }
}
