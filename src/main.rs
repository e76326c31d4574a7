use std::path::PathBuf;

use anyhow::{Context, Result};
use peptide_samples::{GenerateConfig, GenerateSample};

fn main() -> Result<()> {
    env_logger::init();

    // Optional single argument: path to a TOML config file.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => GenerateConfig::load_from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GenerateConfig::default(),
    };

    let generator = GenerateSample::new(config).context("configuring sample generation")?;
    let report = generator.run().context("generating samples")?;

    log::info!(
        "done: {} positives, {} negatives, {} train / {} test",
        report.positives,
        report.negatives,
        report.train,
        report.test
    );
    Ok(())
}
