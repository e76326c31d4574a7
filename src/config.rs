//! Run configuration loaded from a TOML file.
//!
//! Every key is optional; defaults reproduce the stock GRAMPA / negative
//! layout under `data/`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::split::DEFAULT_TRAIN_RATIO;
use crate::error::{PipelineError, Result};

/// Which pool the regression split is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Positives and negatives (the shuffled assembled table).
    All,
    /// Aggregated positives only, in first-seen order.
    PositiveOnly,
}

/// Sample generation settings.
///
/// # Examples
///
/// ```
/// use peptide_samples::GenerateConfig;
///
/// let config = GenerateConfig::from_toml_str("mode = \"positive\"\nshuffle_seed = 3").unwrap();
/// assert_eq!(config.shuffle_seed, Some(3));
/// assert_eq!(config.organism_substring, "aureus");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    /// Potency table (GRAMPA export).
    pub grampa_path: PathBuf,
    /// Table of sequences known to be inactive.
    pub negative_file_path: PathBuf,
    /// Output directory, created if absent.
    pub generate_example_path: PathBuf,
    /// `"all"` splits positives + negatives; anything else splits positives.
    pub mode: String,
    pub organism_column: String,
    pub organism_substring: String,
    pub sequence_column: String,
    pub value_column: String,
    pub negative_sequence_column: String,
    pub train_ratio: f64,
    /// Fixed shuffle seed; unset means a fresh random order every run.
    pub shuffle_seed: Option<u64>,
    /// External descriptor program and its leading arguments.
    pub descriptor_command: Option<Vec<String>>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            grampa_path: PathBuf::from("data/origin_data/grampa.csv"),
            negative_file_path: PathBuf::from("data/origin_data/origin_negative.csv"),
            generate_example_path: PathBuf::from("data/filtered_data/"),
            mode: "all".to_string(),
            organism_column: "bacterium".to_string(),
            organism_substring: "aureus".to_string(),
            sequence_column: "sequence".to_string(),
            value_column: "value".to_string(),
            negative_sequence_column: "Sequence".to_string(),
            train_ratio: DEFAULT_TRAIN_RATIO,
            shuffle_seed: None,
            descriptor_command: None,
        }
    }
}

impl GenerateConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| PipelineError::Path {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(PipelineError::Config(format!(
                "train_ratio must be within [0, 1], got {}",
                self.train_ratio
            )));
        }
        if matches!(&self.descriptor_command, Some(argv) if argv.is_empty()) {
            return Err(PipelineError::Config("descriptor_command is empty".into()));
        }
        Ok(())
    }

    pub fn split_mode(&self) -> SplitMode {
        if self.mode == "all" {
            SplitMode::All
        } else {
            SplitMode::PositiveOnly
        }
    }

    pub fn classify_path(&self) -> PathBuf {
        self.generate_example_path.join("classify_sample.csv")
    }

    pub fn train_path(&self) -> PathBuf {
        self.generate_example_path.join("regression_train_sample.csv")
    }

    pub fn test_path(&self) -> PathBuf {
        self.generate_example_path.join("regression_test_sample.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = GenerateConfig::from_toml_str("").unwrap();
        assert_eq!(config, GenerateConfig::default());
        assert_eq!(config.split_mode(), SplitMode::All);
        assert_eq!(config.train_ratio, 0.8);
        assert_eq!(config.organism_column, "bacterium");
        assert_eq!(config.negative_sequence_column, "Sequence");
    }

    #[test]
    fn any_other_mode_splits_positives() {
        let config = GenerateConfig::from_toml_str("mode = \"regression\"").unwrap();
        assert_eq!(config.split_mode(), SplitMode::PositiveOnly);
    }

    #[test]
    fn output_files_live_in_the_output_dir() {
        let config = GenerateConfig::from_toml_str("generate_example_path = \"out\"").unwrap();
        assert_eq!(config.classify_path(), Path::new("out/classify_sample.csv"));
        assert_eq!(config.train_path(), Path::new("out/regression_train_sample.csv"));
        assert_eq!(config.test_path(), Path::new("out/regression_test_sample.csv"));
    }

    #[test]
    fn bad_ratio_is_rejected() {
        assert!(matches!(
            GenerateConfig::from_toml_str("train_ratio = 1.5"),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(GenerateConfig::from_toml_str("grampa = \"x.csv\"").is_err());
    }

    #[test]
    fn descriptor_command_parses_as_argv() {
        let config =
            GenerateConfig::from_toml_str("descriptor_command = [\"python\", \"cal_pep.py\"]")
                .unwrap();
        assert_eq!(
            config.descriptor_command,
            Some(vec!["python".to_string(), "cal_pep.py".to_string()])
        );
    }
}
