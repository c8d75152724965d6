use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type,
    Int64Type, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Column, DType, Dataset, Value};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{} is not a valid table: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – header row, comma separated (primary format)
/// * `.json`         – `[{ "col": value, ... }, ...]`
/// * `.parquet`      – flat scalar columns
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parse: fn(File) -> Result<Dataset> = match ext.as_str() {
        "csv" | "txt" => parse_csv,
        "json" => parse_json,
        "parquet" | "pq" => parse_parquet,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = parse(file).map_err(|e| LoadError::Malformed {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })?;

    log::info!(
        "Loaded {} rows x {} columns from {}",
        dataset.len(),
        dataset.width(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Short records are padded with missing cells; a record with more fields
/// than the header is rejected.
fn parse_csv(file: File) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("no columns to parse");
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            bail!(
                "line {line}: expected {} fields, saw {}",
                headers.len(),
                record.len()
            );
        }
        records.push(record);
    }

    let columns = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let raw: Vec<Option<&str>> = records.iter().map(|r| r.get(idx)).collect();
            Column::from_raw(name.as_str(), &raw)
        })
        .collect();

    Dataset::from_columns(columns).map_err(anyhow::Error::msg)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "PM2.5": 12.5, "NO2": 40, "Qualite_air": "moyen" },
///   ...
/// ]
/// ```
///
/// Keys absent from a record are missing cells.
fn parse_json(file: File) -> Result<Dataset> {
    let root: JsonValue =
        serde_json::from_reader(std::io::BufReader::new(file)).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }

        let mut cells = Vec::with_capacity(obj.len());
        for (key, val) in obj {
            let text = json_to_text(val).with_context(|| format!("Row {i}, '{key}'"))?;
            cells.push((key.clone(), text));
        }
        rows.push(cells);
    }

    let columns = names
        .iter()
        .map(|name| {
            let raw: Vec<Option<&str>> = rows
                .iter()
                .map(|cells| {
                    cells
                        .iter()
                        .find(|(k, _)| k == name)
                        .and_then(|(_, v)| v.as_deref())
                })
                .collect();
            Column::from_raw(name.as_str(), &raw)
        })
        .collect();

    Dataset::from_columns(columns).map_err(anyhow::Error::msg)
}

fn json_to_text(val: &JsonValue) -> Result<Option<String>> {
    match val {
        JsonValue::String(s) => Ok(Some(s.clone())),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        JsonValue::Null => Ok(None),
        other => bail!("nested value {other} is not a table cell"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns (integers, floats, booleans,
/// strings). Works with files written by both Pandas and Polars.
fn parse_parquet(file: File) -> Result<Dataset> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| -> Result<Column> {
            Ok(Column::new(f.name().clone(), arrow_dtype(f.data_type())?, vec![]))
        })
        .collect::<Result<_>>()?;

    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (idx, column) in columns.iter_mut().enumerate() {
            let values = extract_values(batch.column(idx))
                .with_context(|| format!("column '{}'", column.name))?;
            column.values.extend(values);
        }
    }

    if columns.is_empty() {
        bail!("no columns to parse");
    }
    Dataset::from_columns(columns).map_err(anyhow::Error::msg)
}

// -- Parquet / Arrow helpers --

fn arrow_dtype(data_type: &DataType) -> Result<DType> {
    Ok(match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DType::Integer,
        DataType::Float32 | DataType::Float64 => DType::Float,
        DataType::Boolean => DType::Boolean,
        DataType::Utf8 | DataType::LargeUtf8 => DType::Text,
        other => bail!("unsupported column type {other:?}"),
    })
}

/// Convert a whole Arrow column into cells.
fn extract_values(col: &ArrayRef) -> Result<Vec<Value>> {
    let values = match col.data_type() {
        DataType::Int8 => primitive::<Int8Type>(col, |v| Value::Integer(v as i64)),
        DataType::Int16 => primitive::<Int16Type>(col, |v| Value::Integer(v as i64)),
        DataType::Int32 => primitive::<Int32Type>(col, |v| Value::Integer(v as i64)),
        DataType::Int64 => primitive::<Int64Type>(col, Value::Integer),
        DataType::UInt8 => primitive::<UInt8Type>(col, |v| Value::Integer(v as i64)),
        DataType::UInt16 => primitive::<UInt16Type>(col, |v| Value::Integer(v as i64)),
        DataType::UInt32 => primitive::<UInt32Type>(col, |v| Value::Integer(v as i64)),
        DataType::UInt64 => primitive::<UInt64Type>(col, |v| {
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }),
        DataType::Float32 => primitive::<Float32Type>(col, |v| Value::Float(v as f64)),
        DataType::Float64 => primitive::<Float64Type>(col, Value::Float),
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Value::Null, Value::Bool))
            .collect(),
        DataType::Utf8 => col
            .as_string::<i32>()
            .iter()
            .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string())))
            .collect(),
        DataType::LargeUtf8 => col
            .as_string::<i64>()
            .iter()
            .map(|v| v.map_or(Value::Null, |s| Value::Text(s.to_string())))
            .collect(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(values)
}

fn primitive<T: ArrowPrimitiveType>(col: &ArrayRef, f: impl Fn(T::Native) -> Value) -> Vec<Value> {
    let arr = col.as_primitive::<T>();
    (0..arr.len())
        .map(|i| if arr.is_null(i) { Value::Null } else { f(arr.value(i)) })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray, UInt64Array};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_types_and_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "pollution.csv",
            "PM10,NO2,CO,Qualite_air\n12,40.5,3µg,bon\n,38.0,n/a,moyen\n30,NA,7µg,\n",
        );

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.width(), 4);
        assert_eq!(ds.column("PM10").unwrap().dtype, DType::Integer);
        assert_eq!(ds.column("NO2").unwrap().dtype, DType::Float);
        assert_eq!(ds.column("CO").unwrap().dtype, DType::Text);
        assert_eq!(ds.column("PM10").unwrap().null_count(), 1);
        assert_eq!(ds.column("CO").unwrap().null_count(), 1);
        assert_eq!(ds.column("Qualite_air").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("pollution.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn short_csv_rows_are_padded_with_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "short.csv", "PM10,NO2,Qualite_air\n12,40,bon\n30,35\n");

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("NO2").unwrap().values[1], Value::Integer(35));
        assert_eq!(ds.column("Qualite_air").unwrap().values[1], Value::Null);
    }

    #[test]
    fn long_csv_rows_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "long.csv", "a,b\n1,2\n3,4,5\n");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { .. }), "{err}");
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn large_unsigned_values_do_not_wrap() {
        let col: ArrayRef = Arc::new(UInt64Array::from(vec![7, u64::MAX]));
        let values = extract_values(&col).unwrap();
        assert_eq!(values[0], Value::Integer(7));
        assert_eq!(values[1], Value::Float(u64::MAX as f64));
    }

    #[test]
    fn empty_csv_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.csv", "");
        assert!(matches!(load_file(&path), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.xlsx", "whatever");
        assert!(matches!(
            load_file(&path),
            Err(LoadError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "data.json",
            r#"[{"PM10": 10, "Qualite_air": "bon"}, {"PM10": 12.5}, {"PM10": null, "Qualite_air": "moyen"}]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("PM10").unwrap().dtype, DType::Float);
        assert_eq!(ds.column("PM10").unwrap().null_count(), 1);
        assert_eq!(ds.column("Qualite_air").unwrap().values[1], Value::Null);
    }

    #[test]
    fn nested_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", r#"[{"a": [1, 2]}]"#);
        assert!(matches!(load_file(&path), Err(LoadError::Malformed { .. })));
    }

    #[test]
    fn loads_parquet_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("PM10", DataType::Float64, true),
            Field::new("Qualite_air", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(Float64Array::from(vec![Some(1.5), None, Some(3.0)])),
                Arc::new(StringArray::from(vec![Some("bon"), Some("mauvais"), None])),
            ],
        )
        .unwrap();
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.column("id").unwrap().dtype, DType::Integer);
        assert_eq!(ds.column("PM10").unwrap().values[1], Value::Null);
        assert_eq!(
            ds.column("Qualite_air").unwrap().values[1],
            Value::Text("mauvais".into())
        );
    }
}
