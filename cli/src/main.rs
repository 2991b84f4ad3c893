mod args;

use anyhow::Context;
use args::Args;
use clap::Parser;
use imgbatch::{ProcessConfig, run_batch};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Configure logging; RUST_LOG still wins when set
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .init();

    let mut config = match &args.config {
        Some(path) => ProcessConfig::load_from(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ProcessConfig::default(),
    };
    args.apply_to(&mut config);

    let steps: Vec<String> = config.steps.iter().map(ToString::to_string).collect();
    log::debug!("Steps: {}", steps.join(", "));

    let report = run_batch(&config).with_context(|| {
        format!(
            "processing {} -> {}",
            config.input_dir.display(),
            config.output_dir.display()
        )
    })?;

    log::info!(
        "Processed {} image(s) into {}",
        report.len(),
        config.output_dir.display()
    );
    Ok(())
}
