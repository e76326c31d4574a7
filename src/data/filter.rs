use super::model::Table;
use crate::error::Result;

/// Return indices of rows whose `column` text contains `needle`.
///
/// A row passes when:
/// * The cell holds text and contains `needle` (case-sensitive) → passes
/// * The cell is `Null` or a non-text value → fails
pub fn matching_indices(table: &Table, column: &str, needle: &str) -> Result<Vec<usize>> {
    let idx = table.column_index(column)?;
    Ok(table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row[idx].as_text().is_some_and(|s| s.contains(needle)))
        .map(|(i, _)| i)
        .collect())
}

/// Copy of `table` restricted to rows whose `column` contains `needle`.
/// An empty result is not an error.
pub fn filter_contains(table: &Table, column: &str, needle: &str) -> Result<Table> {
    let rows = matching_indices(table, column, needle)?
        .into_iter()
        .map(|i| table.rows[i].clone())
        .collect();
    Ok(table.with_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;
    use crate::error::PipelineError;

    fn organisms(values: &[Option<&str>]) -> Table {
        let mut t = Table::new("grampa", vec!["bacterium".into()]).unwrap();
        for v in values {
            let cell = match v {
                Some(s) => CellValue::Text(s.to_string()),
                None => CellValue::Null,
            };
            t.push_row(vec![cell]).unwrap();
        }
        t
    }

    #[test]
    fn keeps_substring_matches_only() {
        let t = organisms(&[
            Some("Staphylococcus aureus"),
            Some("E. coli"),
            Some("S. aureus ATCC 25923"),
            None,
        ]);
        let out = filter_contains(&t, "bacterium", "aureus").unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(matching_indices(&t, "bacterium", "aureus").unwrap(), vec![0, 2]);
        // input untouched
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn match_is_case_sensitive() {
        let t = organisms(&[Some("S. AUREUS")]);
        assert!(filter_contains(&t, "bacterium", "aureus").unwrap().is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let t = organisms(&[Some("S. aureus")]);
        assert!(matches!(
            filter_contains(&t, "organism", "aureus"),
            Err(PipelineError::Schema { .. })
        ));
    }
}
