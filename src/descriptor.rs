//! Bridge to the descriptor computation that produces the classification
//! feature file.
//!
//! The descriptor routine itself lives outside this crate.  The pipeline
//! only hands it the assembled samples and a destination path.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use log::info;

use crate::data::model::Sample;
use crate::data::writer::{write_samples, write_samples_to};
use crate::error::{PipelineError, Result};

/// Computes and persists a descriptor-augmented classification table.
pub trait DescriptorBridge {
    /// `peptides` is the raw sequence list, in the same order as `samples`.
    fn write_features(&self, peptides: &[String], samples: &[Sample], output: &Path) -> Result<()>;
}

/// Writes the labeled samples without descriptors.
#[derive(Debug, Default, Clone, Copy)]
pub struct LabelTableBridge;

impl DescriptorBridge for LabelTableBridge {
    fn write_features(&self, _peptides: &[String], samples: &[Sample], output: &Path) -> Result<()> {
        write_samples(output, samples)
    }
}

/// Runs an external descriptor program.
///
/// The samples are streamed as `sequence,MIC,type` CSV on the child's stdin
/// and the destination path is appended as the last argument.
#[derive(Debug, Clone)]
pub struct CommandBridge {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandBridge {
    /// `argv[0]` is the program, the rest are leading arguments.
    pub fn from_argv(argv: &[String]) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| PipelineError::Config("descriptor_command is empty".into()))?;
        Ok(CommandBridge {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl DescriptorBridge for CommandBridge {
    fn write_features(&self, _peptides: &[String], samples: &[Sample], output: &Path) -> Result<()> {
        info!("running descriptor command {} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(output)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| PipelineError::Descriptor(format!("spawning {}: {e}", self.program)))?;

        if let Some(stdin) = child.stdin.take() {
            let mut stdin = std::io::BufWriter::new(stdin);
            let streamed = write_samples_to(&mut stdin, samples)
                .map_err(|e| e.to_string())
                .and_then(|_| stdin.flush().map_err(|e| e.to_string()));
            drop(stdin);
            if let Err(e) = streamed {
                let _ = child.wait();
                return Err(PipelineError::Descriptor(format!("streaming samples: {e}")));
            }
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(PipelineError::Descriptor(format!(
                "{} exited with {status}",
                self.program
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn label_table_bridge_writes_samples() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("classify_sample.csv");
        let samples = vec![Sample::active("KK", 100.0)];
        LabelTableBridge
            .write_features(&["KK".to_string()], &samples, &out)
            .unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(text, "sequence,MIC,type\nKK,100.0,1\n");
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            CommandBridge::from_argv(&[]),
            Err(PipelineError::Config(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn command_receives_samples_on_stdin() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("classify_sample.csv");
        // sh -c 'cat > "$0"' <output>
        let bridge = CommandBridge::from_argv(&[
            "sh".to_string(),
            "-c".to_string(),
            "cat > \"$0\"".to_string(),
        ])
        .unwrap();
        bridge
            .write_features(&["AAC".to_string()], &[Sample::inactive("AAC")], &out)
            .unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(text, "sequence,MIC,type\nAAC,8196,0\n");
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_an_error() {
        let dir = tempdir().unwrap();
        let bridge = CommandBridge::from_argv(&["false".to_string()]).unwrap();
        let err = bridge
            .write_features(&[], &[], &dir.path().join("x.csv"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Descriptor(_)));
    }
}
