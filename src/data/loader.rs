use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Table};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`           – comma-delimited with a header row
/// * `.tsv` / `.tab`  – tab-delimited with a header row
/// * `.json`          – `[{ "sequence": "...", "value": 1.2, ... }, ...]`
/// * `.parquet`       – flat columns of strings, ints, floats or bools
///
/// Any other extension, or none, is read as comma-delimited text.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = open(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "tsv" | "tab" => load_delimited(file, path, b'\t')?,
        "json" => load_json(file, path)?,
        "parquet" | "pq" => load_parquet(file, path)?,
        _ => load_delimited(file, path, b',')?,
    };
    debug!("loaded {} with shape {:?}", path.display(), table.shape());
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| PipelineError::Path {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Header row required.  Every field is kept as text; empty fields become
/// [`CellValue::Null`] the way Pandas reads them as `NaN`.
fn load_delimited(file: File, path: &Path, delimiter: u8) -> Result<Table> {
    let name = path.display().to_string();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::parse(&name, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    // Blank names (e.g. a written-out index column) get Pandas' placeholder.
    let headers = if headers.iter().all(|h| h.is_empty()) {
        Vec::new()
    } else {
        headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| if h.is_empty() { format!("Unnamed: {i}") } else { h })
            .collect()
    };
    let mut table = Table::new(name, headers)?;

    for (row_no, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| PipelineError::parse(&table.name, format!("row {row_no}: {e}")))?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Null
                } else {
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        table.push_row(row)?;
    }

    Ok(table)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns are the union of keys in first-seen order; absent keys are `Null`.
fn load_json(file: File, path: &Path) -> Result<Table> {
    let name = path.display().to_string();
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| PipelineError::parse(&name, format!("parsing JSON: {e}")))?;

    let records = root
        .as_array()
        .ok_or_else(|| PipelineError::parse(&name, "expected top-level JSON array"))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| PipelineError::parse(&name, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(name, columns)?;
    for rec in records {
        let row = table
            .columns
            .iter()
            .map(|col| rec.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
            .collect();
        table.push_row(row)?;
    }
    Ok(table)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).  Nested columns are rendered as their
/// Arrow type name.
fn load_parquet(file: File, path: &Path) -> Result<Table> {
    let name = path.display().to_string();
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| PipelineError::parse(&name, format!("reading parquet metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| PipelineError::parse(&name, format!("building parquet reader: {e}")))?;

    let mut table = Table::new(name, columns)?;

    for batch_result in reader {
        let batch = batch_result.map_err(|e| {
            PipelineError::parse(&table.name, format!("reading parquet record batch: {e}"))
        })?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect();
            table.push_row(cells)?;
        }
    }

    Ok(table)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => CellValue::Text(format!("{other:?}")),
    }
}
