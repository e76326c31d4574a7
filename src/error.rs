use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures of a sample-generation run.
///
/// Empty intermediate tables are not errors; see
/// [`EmptyStage`](crate::pipeline::EmptyStage).
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input path {} does not exist or is unreadable", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {message}")]
    Parse { context: String, message: String },

    #[error("{table} is missing required column '{column}'")]
    Schema { table: String, column: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("writing {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("descriptor bridge failed: {0}")]
    Descriptor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn parse(context: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::Parse {
            context: context.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
