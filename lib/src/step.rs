//! Named transformation steps
//!
//! A step is written `name[:arg]`, for example `rotate:180`,
//! `thumbnail:64x64` or `ascii`. The same syntax is used on the command line
//! and in the `steps` list of the config file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (128, 128);
pub const DEFAULT_CONTRAST: f32 = 1.5;
pub const DEFAULT_SQUARE_SIZE: u32 = 200;

/// One transformation with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Step {
    /// Counter-clockwise rotation in degrees
    Rotate(f32),
    /// Aspect-preserving downscale to fit the box
    Thumbnail { width: u32, height: u32 },
    Grayscale,
    /// Contrast factor; 1.0 leaves the image unchanged
    Contrast(f32),
    /// Centred square crop resized to this edge length
    Square(u32),
    Watermark,
    Ascii,
}

/// Error for a step string that does not parse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepParseError {
    #[error("unknown step `{0}` (expected rotate, thumbnail, grayscale, contrast, square, watermark or ascii)")]
    UnknownStep(String),

    #[error("step `{step}` needs an argument")]
    MissingArgument { step: &'static str },

    #[error("step `{step}` takes no argument, got `{arg}`")]
    UnexpectedArgument { step: &'static str, arg: String },

    #[error("invalid argument `{arg}` for step `{step}`: expected {expected}")]
    InvalidArgument {
        step: &'static str,
        arg: String,
        expected: &'static str,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Rotate(_) => "rotate",
            Step::Thumbnail { .. } => "thumbnail",
            Step::Grayscale => "grayscale",
            Step::Contrast(_) => "contrast",
            Step::Square(_) => "square",
            Step::Watermark => "watermark",
            Step::Ascii => "ascii",
        }
    }

    /// Whether this step draws text
    pub fn needs_font(&self) -> bool {
        matches!(self, Step::Watermark | Step::Ascii)
    }

    /// Range checks that the parser cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Step::Rotate(angle) if !angle.is_finite() => Err(ConfigError::Invalid(format!(
                "rotate angle must be finite, got {angle}"
            ))),
            Step::Thumbnail { width, height } if width == 0 || height == 0 => {
                Err(ConfigError::Invalid(format!(
                    "thumbnail size must be at least 1x1, got {width}x{height}"
                )))
            }
            Step::Contrast(amount) if !amount.is_finite() || amount < 0.0 => Err(
                ConfigError::Invalid(format!("contrast must be non-negative, got {amount}")),
            ),
            Step::Square(0) => Err(ConfigError::Invalid(
                "square size must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn parse_number<T: FromStr>(
    step: &'static str,
    arg: &str,
    expected: &'static str,
) -> Result<T, StepParseError> {
    arg.trim().parse().map_err(|_| StepParseError::InvalidArgument {
        step,
        arg: arg.to_string(),
        expected,
    })
}

fn parse_size(arg: &str) -> Result<(u32, u32), StepParseError> {
    let invalid = || StepParseError::InvalidArgument {
        step: "thumbnail",
        arg: arg.to_string(),
        expected: "<width>x<height>",
    };
    let (w, h) = arg.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = w.trim().parse().map_err(|_| invalid())?;
    let height = h.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

impl FromStr for Step {
    type Err = StepParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };

        let no_arg = |step: &'static str, value: Step| match arg {
            None => Ok(value),
            Some(arg) => Err(StepParseError::UnexpectedArgument {
                step,
                arg: arg.to_string(),
            }),
        };

        match name.to_ascii_lowercase().as_str() {
            "rotate" => {
                let arg = arg.ok_or(StepParseError::MissingArgument { step: "rotate" })?;
                Ok(Step::Rotate(parse_number("rotate", arg, "degrees")?))
            }
            "thumbnail" => {
                let (width, height) = match arg {
                    Some(arg) => parse_size(arg)?,
                    None => DEFAULT_THUMBNAIL_SIZE,
                };
                Ok(Step::Thumbnail { width, height })
            }
            "grayscale" | "greyscale" => no_arg("grayscale", Step::Grayscale),
            "contrast" => match arg {
                Some(arg) => Ok(Step::Contrast(parse_number("contrast", arg, "a factor")?)),
                None => Ok(Step::Contrast(DEFAULT_CONTRAST)),
            },
            "square" => match arg {
                Some(arg) => Ok(Step::Square(parse_number("square", arg, "a pixel size")?)),
                None => Ok(Step::Square(DEFAULT_SQUARE_SIZE)),
            },
            "watermark" => no_arg("watermark", Step::Watermark),
            "ascii" => no_arg("ascii", Step::Ascii),
            _ => Err(StepParseError::UnknownStep(s.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Rotate(angle) => write!(f, "rotate:{angle}"),
            Step::Thumbnail { width, height } => write!(f, "thumbnail:{width}x{height}"),
            Step::Contrast(amount) => write!(f, "contrast:{amount}"),
            Step::Square(size) => write!(f, "square:{size}"),
            other => f.write_str(other.name()),
        }
    }
}

impl TryFrom<String> for Step {
    type Error = StepParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Step> for String {
    fn from(step: Step) -> Self {
        step.to_string()
    }
}
