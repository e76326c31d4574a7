use std::collections::HashMap;

use super::model::{CellValue, Sample, Table};
use crate::error::{PipelineError, Result};

/// Collapse repeated potency measurements into one positive sample per
/// sequence.
///
/// For measurements `v_1..v_n` (log10 scale) the label is
/// `(10^v_1 + ... + 10^v_n) / n`: each reading is exponentiated first, in
/// row order, and the linear values are averaged.  This is neither the
/// geometric mean nor a mean in log space.
///
/// Sequences are emitted in order of first occurrence.
pub fn aggregate_potency(table: &Table, sequence_col: &str, value_col: &str) -> Result<Vec<Sample>> {
    let seq_idx = table.column_index(sequence_col)?;
    let val_idx = table.column_index(value_col)?;

    // (sequence, linear sum, count) in first-seen order
    let mut groups: Vec<(String, f64, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row_no, row) in table.rows.iter().enumerate() {
        let sequence = match &row[seq_idx] {
            CellValue::Text(s) => s.as_str(),
            other => {
                return Err(PipelineError::parse(
                    &table.name,
                    format!("row {row_no}: '{sequence_col}' is not a sequence ({other})"),
                ))
            }
        };
        let value = row[val_idx].as_f64().ok_or_else(|| {
            PipelineError::parse(
                &table.name,
                format!("row {row_no}: '{value_col}' is not numeric ({})", row[val_idx]),
            )
        })?;

        let slot = *index.entry(sequence.to_string()).or_insert_with(|| {
            groups.push((sequence.to_string(), 0.0, 0));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.1 += 10f64.powf(value);
        group.2 += 1;
    }

    groups
        .into_iter()
        .map(|(sequence, sum, count)| {
            let label = sum / count as f64;
            if !label.is_finite() {
                return Err(PipelineError::parse(
                    &table.name,
                    format!("potency of '{sequence}' does not fit in an f64"),
                ));
            }
            Ok(Sample::active(sequence, label))
        })
        .collect()
}
