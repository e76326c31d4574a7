use log::warn;

use super::model::{CellValue, Sample, Table};
use crate::error::Result;

/// Ambiguous or non-standard one-letter residue codes.
pub const DISALLOWED_RESIDUES: [char; 5] = ['B', 'X', 'Z', 'O', 'U'];

pub fn has_disallowed_residue(sequence: &str) -> bool {
    sequence.chars().any(|c| DISALLOWED_RESIDUES.contains(&c))
}

/// Turn the negative table into inactive samples.
///
/// Rows whose sequence contains any disallowed residue (case-sensitive) are
/// dropped, as are rows with no sequence at all.  Survivors keep their
/// relative order and are labeled with
/// [`NEGATIVE_LABEL`](super::model::NEGATIVE_LABEL).
pub fn label_negatives(table: &Table, sequence_col: &str) -> Result<Vec<Sample>> {
    let idx = table.column_index(sequence_col)?;

    let mut missing = 0usize;
    let mut samples = Vec::new();
    for row in &table.rows {
        match &row[idx] {
            CellValue::Text(seq) if !seq.is_empty() => {
                if !has_disallowed_residue(seq) {
                    samples.push(Sample::inactive(seq.clone()));
                }
            }
            _ => missing += 1,
        }
    }

    if missing > 0 {
        warn!(
            "{}: dropped {missing} negative rows without a '{sequence_col}' value",
            table.name
        );
    }
    if samples.is_empty() {
        warn!(
            "{}: no valid negative sequences; the classifier gets no negative examples",
            table.name
        );
    }
    Ok(samples)
}
