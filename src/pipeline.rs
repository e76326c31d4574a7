use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::config::{GenerateConfig, SplitMode};
use crate::data::aggregate::aggregate_potency;
use crate::data::assemble::{assemble, shuffle_rng};
use crate::data::filter::filter_contains;
use crate::data::loader::load_table;
use crate::data::model::Sample;
use crate::data::negative::label_negatives;
use crate::data::split::split_at_ratio;
use crate::data::writer::write_samples;
use crate::descriptor::{CommandBridge, DescriptorBridge, LabelTableBridge};
use crate::error::{PipelineError, Result};

/// A stage that produced no rows.  Logged and reported, never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyStage {
    Filter,
    Aggregate,
    Negatives,
}

impl fmt::Display for EmptyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyStage::Filter => write!(f, "organism filter matched no rows"),
            EmptyStage::Aggregate => write!(f, "no positive samples"),
            EmptyStage::Negatives => write!(f, "no negative samples"),
        }
    }
}

/// Row counts of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub filtered_rows: usize,
    pub positives: usize,
    pub negatives: usize,
    pub assembled: usize,
    pub train: usize,
    pub test: usize,
    /// Sequences present in both pools; kept as two rows.
    pub cross_pool_duplicates: usize,
    pub warnings: Vec<EmptyStage>,
}

/// Builds the classification and regression sample files from a potency
/// table and a negative table.
pub struct GenerateSample {
    config: GenerateConfig,
    bridge: Box<dyn DescriptorBridge>,
}

impl GenerateSample {
    /// Bridge chosen from `descriptor_command`, the label table otherwise.
    pub fn new(config: GenerateConfig) -> Result<Self> {
        config.validate()?;
        let bridge: Box<dyn DescriptorBridge> = match &config.descriptor_command {
            Some(argv) => Box::new(CommandBridge::from_argv(argv)?),
            None => Box::new(LabelTableBridge),
        };
        Ok(Self { config, bridge })
    }

    pub fn with_bridge(config: GenerateConfig, bridge: Box<dyn DescriptorBridge>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, bridge })
    }

    pub fn run(&self) -> Result<PipelineReport> {
        let cfg = &self.config;
        let mut report = PipelineReport::default();

        info!("checking paths...");
        check_input(&cfg.grampa_path)?;
        check_input(&cfg.negative_file_path)?;
        ensure_dir(&cfg.generate_example_path)?;

        let grampa = load_table(&cfg.grampa_path)?;
        info!("grampa data loaded, shape: {:?}", grampa.shape());
        grampa.column_index(&cfg.sequence_column)?;
        grampa.column_index(&cfg.value_column)?;

        let filtered = filter_contains(&grampa, &cfg.organism_column, &cfg.organism_substring)?;
        info!(
            "filtered on {} containing '{}', shape: {:?}",
            cfg.organism_column,
            cfg.organism_substring,
            filtered.shape()
        );
        report.filtered_rows = filtered.len();
        if filtered.is_empty() {
            report.warn(EmptyStage::Filter);
        }

        let positives = aggregate_potency(&filtered, &cfg.sequence_column, &cfg.value_column)?;
        info!("generated {} positive samples", positives.len());
        report.positives = positives.len();
        if positives.is_empty() {
            report.warn(EmptyStage::Aggregate);
        }

        let negative_table = load_table(&cfg.negative_file_path)?;
        info!("negative data loaded, shape: {:?}", negative_table.shape());
        let negatives = label_negatives(&negative_table, &cfg.negative_sequence_column)?;
        info!("generated {} negative samples", negatives.len());
        report.negatives = negatives.len();
        if negatives.is_empty() {
            report.warn(EmptyStage::Negatives);
        }

        report.cross_pool_duplicates = count_shared(&positives, &negatives);
        if report.cross_pool_duplicates > 0 {
            warn!(
                "{} sequences appear in both the positive and negative pools; both rows kept",
                report.cross_pool_duplicates
            );
        }

        let mut rng = shuffle_rng(cfg.shuffle_seed);
        let all_samples = assemble(&positives, &negatives, &mut rng);
        report.assembled = all_samples.len();
        info!("concatenated samples: {}", all_samples.len());

        let classify_path = cfg.classify_path();
        info!("generating classify sample at {}", classify_path.display());
        let start = Instant::now();
        let peptides: Vec<String> = all_samples.iter().map(|s| s.sequence.clone()).collect();
        self.bridge
            .write_features(&peptides, &all_samples, &classify_path)?;
        if !all_samples.is_empty() {
            info!(
                "generated classify feature data, cost time per sample: {:?}",
                start.elapsed().div_f64(all_samples.len() as f64)
            );
        }

        info!("generating regression sample...");
        let regression_pool = match cfg.split_mode() {
            SplitMode::All => &all_samples,
            SplitMode::PositiveOnly => &positives,
        };
        let (train, test) = split_at_ratio(regression_pool, cfg.train_ratio);
        write_samples(&cfg.train_path(), &train)?;
        write_samples(&cfg.test_path(), &test)?;
        report.train = train.len();
        report.test = test.len();
        info!("regression sample generation completed");

        Ok(report)
    }
}

impl PipelineReport {
    fn warn(&mut self, stage: EmptyStage) {
        warn!("{stage}");
        self.warnings.push(stage);
    }
}

fn check_input(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).map_err(|source| PipelineError::Path {
        path: path.to_path_buf(),
        source,
    })?;
    info!("{}: exists, {} bytes", path.display(), meta.len());
    Ok(())
}

/// Create the output directory when absent; no-op when present.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
        info!("created output directory: {}", path.display());
    }
    Ok(())
}

fn count_shared(positives: &[Sample], negatives: &[Sample]) -> usize {
    let pos: HashSet<&str> = positives.iter().map(|s| s.sequence.as_str()).collect();
    negatives
        .iter()
        .map(|s| s.sequence.as_str())
        .collect::<HashSet<_>>()
        .intersection(&pos)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("a/b");
        ensure_dir(&out).unwrap();
        ensure_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn shared_sequences_are_counted_once() {
        let pos = vec![Sample::active("AAC", 1.0), Sample::active("KK", 2.0)];
        let neg = vec![Sample::inactive("AAC"), Sample::inactive("AAC"), Sample::inactive("GG")];
        assert_eq!(count_shared(&pos, &neg), 1);
    }

    #[test]
    fn missing_input_fails_before_output_dir_is_created() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        let config = GenerateConfig {
            grampa_path: dir.path().join("missing.csv"),
            negative_file_path: dir.path().join("missing_neg.csv"),
            generate_example_path: out.clone(),
            ..GenerateConfig::default()
        };
        let err = GenerateSample::new(config).unwrap().run().unwrap_err();
        assert!(matches!(err, PipelineError::Path { .. }));
        assert!(!out.exists());
    }
}
