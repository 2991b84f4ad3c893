//! Error types for batch processing.
//!
//! Every failure carries the path it happened on so a batch run can report
//! exactly which file stopped it.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for processor, converter and batch operations.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The source image could not be read or decoded
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The result image could not be encoded or written
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The configured font file does not exist
    #[error("font not found: {0}")]
    FontNotFound(PathBuf),

    /// The font file exists but is not a usable font
    #[error("failed to load font {path}: {message}")]
    FontLoad { path: PathBuf, message: String },

    /// Parameters or image dimensions that an operation cannot work with
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The input directory holds no decodable images
    #[error("no input images found in {0}")]
    EmptyInputDirectory(PathBuf),

    /// Filesystem errors outside of image decode/encode
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Configuration values are out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ProcessError>;
