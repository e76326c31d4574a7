//! Labeled antimicrobial peptide datasets from a potency table and a table
//! of inactive sequences.

pub mod config;
pub mod data;
pub mod descriptor;
pub mod error;
pub mod pipeline;

pub use config::{GenerateConfig, SplitMode};
pub use data::model::{Sample, SampleType, Table, NEGATIVE_LABEL};
pub use descriptor::{CommandBridge, DescriptorBridge, LabelTableBridge};
pub use error::{PipelineError, Result};
pub use pipeline::{EmptyStage, GenerateSample, PipelineReport};
