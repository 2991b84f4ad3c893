//! Batch runner: discover inputs, apply the step chain, write outputs.

use crate::config::ProcessConfig;
use crate::error::{ProcessError, Result};
use crate::glyphs::{GlyphRenderer, load_glyphs};
use crate::processor::ImageProcessor;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One processed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFile {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Summary of a completed batch
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub files: Vec<ProcessedFile>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Whether the decoder can read the format named by the file extension
fn is_supported(path: &Path) -> bool {
    ImageFormat::from_path(path)
        .map(|format| format.reading_enabled())
        .unwrap_or(false)
}

/// Dot-files, including macOS `._name` resource forks
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Image files directly inside `dir`, sorted by file name
///
/// Subdirectories are not descended into. Hidden files (leading `.`) and
/// files whose extension is not a readable image format are skipped.
///
/// # Errors
/// `Io` when the directory cannot be read, `EmptyInputDirectory` when it
/// holds no images.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ProcessError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        if is_hidden(path) {
            log::debug!("Skipping {} (hidden file)", path.display());
        } else if is_supported(path) {
            files.push(path.to_path_buf());
        } else {
            log::debug!("Skipping {} (not a supported image)", path.display());
        }
    }

    if files.is_empty() {
        return Err(ProcessError::EmptyInputDirectory(dir.to_path_buf()));
    }
    Ok(files)
}

/// Output path for an input: the same relative name under `output_dir`
pub fn output_path_for(input: &Path, input_dir: &Path, output_dir: &Path) -> PathBuf {
    match input.strip_prefix(input_dir) {
        Ok(relative) => output_dir.join(relative),
        Err(_) => output_dir.join(input.file_name().unwrap_or(input.as_os_str())),
    }
}

/// Open one image, apply every step and save it
pub fn process_file(
    input: &Path,
    output: &Path,
    config: &ProcessConfig,
    glyphs: Option<&dyn GlyphRenderer>,
) -> Result<()> {
    let mut processor = ImageProcessor::open(input)?;
    for step in &config.steps {
        processor.apply(step, config, glyphs)?;
    }
    processor.save(output)
}

/// Process every image in the input directory
///
/// Images are handled one at a time in file-name order. The first failure
/// stops the run.
pub fn run_batch(config: &ProcessConfig) -> Result<BatchReport> {
    config.validate()?;

    let inputs = discover_inputs(&config.input_dir)?;
    log::info!(
        "Found {} image(s) in {}",
        inputs.len(),
        config.input_dir.display()
    );

    std::fs::create_dir_all(&config.output_dir).map_err(|e| ProcessError::Io {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let glyphs = if config.needs_font() {
        let glyphs = load_glyphs(&config.font)?;
        log::debug!("Using {}", glyphs.describe());
        Some(glyphs)
    } else {
        None
    };

    let mut report = BatchReport::default();
    for input in inputs {
        let output = output_path_for(&input, &config.input_dir, &config.output_dir);
        process_file(&input, &output, config, glyphs.as_deref())?;
        report.files.push(ProcessedFile { input, output });
    }

    Ok(report)
}
