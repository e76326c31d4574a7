use std::io::Write;
use std::path::Path;

use log::info;

use super::model::Sample;
use crate::error::{PipelineError, Result};

pub const SAMPLE_HEADER: [&str; 3] = ["sequence", "MIC", "type"];

/// Serialize samples as CSV to any writer.  The header is always written,
/// also for an empty slice.
pub fn write_samples_to<W: Write>(out: W, samples: &[Sample]) -> std::result::Result<(), csv::Error> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(SAMPLE_HEADER)?;
    for sample in samples {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}

/// Persist samples to `path` (UTF-8, header row, no index column).
pub fn write_samples(path: &Path, samples: &[Sample]) -> Result<()> {
    info!("saving {} samples to {}", samples.len(), path.display());
    let wrap = |source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::create(path).map_err(|e| wrap(csv::Error::from(e)))?;
    write_samples_to(file, samples).map_err(wrap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_use_mic_and_integer_type() {
        let mut buf = Vec::new();
        write_samples_to(
            &mut buf,
            &[Sample::active("KK", 100.0), Sample::inactive("AAC")],
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "sequence,MIC,type\nKK,100.0,1\nAAC,8196,0\n");
    }

    #[test]
    fn whole_positive_labels_keep_their_decimal_point() {
        let mut buf = Vec::new();
        write_samples_to(&mut buf, &[Sample::active("GLF", 8196.0)]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "sequence,MIC,type\nGLF,8196.0,1\n");
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buf = Vec::new();
        write_samples_to(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "sequence,MIC,type\n");
    }
}
