//! imgbatch - batch image transformations with glyph-rendered ASCII art
//!
//! Opens every image in an input directory, runs a chain of simple
//! transformations (rotate, thumbnail, grayscale, contrast, square crop,
//! watermark, ASCII art) and writes the results under the same names to an
//! output directory.
//!
//! # Example
//! ```no_run
//! use imgbatch::{AsciiConfig, BitmapFont, ImageProcessor};
//!
//! let mut processor = ImageProcessor::open("inputs/photo.jpg").unwrap();
//! processor.ascii(&AsciiConfig::default(), &BitmapFont).unwrap();
//! processor.save("outputs/photo.jpg").unwrap();
//! ```

pub mod ascii;
pub mod config;
pub mod error;
pub mod filters;
pub mod glyphs;
pub mod lut;
pub mod pipeline;
pub mod processor;
pub mod step;
pub mod transform;

// Re-export main types for convenience
pub use ascii::convert_to_ascii;
pub use config::{AsciiConfig, BrightnessMode, FontConfig, ProcessConfig, WatermarkConfig};
pub use error::{ConfigError, ProcessError, Result};
pub use glyphs::{BitmapFont, GlyphRenderer, TrueTypeFont, load_glyphs};
pub use pipeline::{BatchReport, ProcessedFile, discover_inputs, run_batch};
pub use processor::ImageProcessor;
pub use step::Step;
