use std::collections::HashSet;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a loaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
///
/// CSV and TSV fields are always loaded as [`CellValue::Text`] (or `Null`
/// when empty); typed variants come from JSON and Parquet sources.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// The cell as text, only when it actually holds a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric interpretation: numbers directly, text parsed as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Table – a loaded delimited / JSON / Parquet source
// ---------------------------------------------------------------------------

/// Column-named, row-ordered in-memory table.  Every row has exactly
/// `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Human-readable origin, used in error messages and logs.
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Empty table with the given header.  Duplicate or blank column names
    /// are rejected.
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        if columns.is_empty() {
            return Err(PipelineError::parse(&name, "missing header row"));
        }
        let mut seen = HashSet::new();
        for (i, col) in columns.iter().enumerate() {
            if col.trim().is_empty() {
                return Err(PipelineError::parse(
                    &name,
                    format!("header column {i} has an empty name"),
                ));
            }
            if !seen.insert(col.as_str()) {
                return Err(PipelineError::parse(
                    &name,
                    format!("duplicate header column '{col}'"),
                ));
            }
        }
        Ok(Table {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row, checking its width against the header.
    pub fn push_row(&mut self, row: Vec<CellValue>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::parse(
                &self.name,
                format!(
                    "row {} has {} fields but the header has {}",
                    self.rows.len(),
                    row.len(),
                    self.columns.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of `column`, or a schema error naming this table.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| PipelineError::Schema {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// Same header, chosen rows.
    pub fn with_rows(&self, rows: Vec<Vec<CellValue>>) -> Self {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(rows, columns)`, as Pandas reports it.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }
}

// ---------------------------------------------------------------------------
// Sample – one labeled row of the generated dataset
// ---------------------------------------------------------------------------

/// Label assigned to every negative sample: marks "known inactive" rather
/// than a measured concentration.
pub const NEGATIVE_LABEL: f64 = 8196.0;

/// Activity class, persisted as `1` / `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    Inactive = 0,
    Active = 1,
}

impl Serialize for SampleType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A unified output row: `sequence, MIC, type`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub sequence: String,
    /// Aggregated potency (positives) or [`NEGATIVE_LABEL`].
    pub label: f64,
    pub kind: SampleType,
}

/// Positive labels are written as floats (`100.0`); the negative sentinel
/// is written as the integer `8196`.
impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("Sample", 3)?;
        row.serialize_field("sequence", &self.sequence)?;
        match self.kind {
            SampleType::Inactive if self.label.fract() == 0.0 => {
                row.serialize_field("MIC", &(self.label as i64))?
            }
            _ => row.serialize_field("MIC", &self.label)?,
        }
        row.serialize_field("type", &self.kind)?;
        row.end()
    }
}

impl Sample {
    pub fn active(sequence: impl Into<String>, label: f64) -> Self {
        Sample {
            sequence: sequence.into(),
            label,
            kind: SampleType::Active,
        }
    }

    pub fn inactive(sequence: impl Into<String>) -> Self {
        Sample {
            sequence: sequence.into(),
            label: NEGATIVE_LABEL,
            kind: SampleType::Inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_header_is_a_parse_error() {
        let err = Table::new("t", vec!["a".into(), "a".into()]).unwrap_err();
        assert!(matches!(err, PipelineError::Parse { .. }));
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut t = Table::new("t", vec!["a".into(), "b".into()]).unwrap();
        assert!(t.push_row(vec![CellValue::Null]).is_err());
        t.push_row(vec![CellValue::Null, CellValue::Integer(1)]).unwrap();
        assert_eq!(t.shape(), (1, 2));
    }

    #[test]
    fn missing_column_is_a_schema_error() {
        let t = Table::new("grampa", vec!["sequence".into()]).unwrap();
        match t.column_index("value") {
            Err(PipelineError::Schema { table, column }) => {
                assert_eq!(table, "grampa");
                assert_eq!(column, "value");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn text_cells_parse_as_numbers() {
        assert_eq!(CellValue::Text(" 2.5".into()).as_f64(), Some(2.5));
        assert_eq!(CellValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(CellValue::Text("KK".into()).as_f64(), None);
        assert_eq!(CellValue::Integer(3).as_text(), None);
    }
}
