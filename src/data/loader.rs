use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{AttributeKind, AttributeValue, Dataset};
use crate::config::SearchConfig;
use crate::error::DiscoveryError;

/// A loaded table, plus the run parameters when the input carried them.
#[derive(Debug, Clone)]
pub struct LoadedInput {
    pub dataset: Dataset,
    pub config: Option<SearchConfig>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – a bundle `{"rows": [...], "width": .., ...}` or a bare `[{...}, ...]`
/// * `.csv`     – header row, one record per line
/// * `.parquet` – flat columns of booleans, strings or numbers
pub fn load_file(path: &Path) -> Result<LoadedInput> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let input = match ext.as_str() {
        "json" => {
            let file = std::fs::File::open(path).context("opening JSON file")?;
            load_json(std::io::BufReader::new(file))
        }
        "csv" => {
            let reader = csv::Reader::from_path(path).context("opening CSV")?;
            load_csv(reader)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "loaded {} records with {} attributes from {}",
        input.dataset.len(),
        input.dataset.schema.len(),
        path.display()
    );
    Ok(input)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Read JSON from any reader (a file or stdin).
///
/// Bundle form, as produced by the export scripts:
///
/// ```json
/// {
///   "rows": [{"geo_region": "NH", "browser_cookies": true, "clicked": false}, ...],
///   "width": 10, "depth": 3, "results": 10, "bins": 5,
///   "targets": {"condition_1": true, "clicked": true}
/// }
/// ```
///
/// A bare array of row objects is also accepted and carries no config.
pub fn load_json<R: Read>(reader: R) -> Result<LoadedInput> {
    let root: JsonValue = serde_json::from_reader(reader).context("parsing JSON")?;

    match root {
        JsonValue::Array(records) => Ok(LoadedInput {
            dataset: dataset_from_json(&records)?,
            config: None,
        }),
        JsonValue::Object(mut obj) => {
            let rows = obj.remove("rows").context("JSON object has no 'rows' field")?;
            let records = rows.as_array().context("'rows' is not an array")?;
            let dataset = dataset_from_json(records)?;
            let config: SearchConfig = serde_json::from_value(JsonValue::Object(obj))
                .context("parsing search parameters")?;
            Ok(LoadedInput {
                dataset,
                config: Some(config),
            })
        }
        _ => bail!("Expected a JSON array or object at the top level"),
    }
}

fn dataset_from_json(records: &[JsonValue]) -> Result<Dataset> {
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = BTreeMap::new();
        for (key, val) in obj {
            let value = json_to_value(key, val).with_context(|| format!("Row {i}"))?;
            row.insert(key.clone(), value);
        }
        rows.push(row);
    }

    Ok(Dataset::from_maps(rows)?)
}

fn json_to_value(column: &str, val: &JsonValue) -> Result<Option<AttributeValue>> {
    let value = match val {
        JsonValue::Null => return Ok(None),
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::String(s) => AttributeValue::Categorical(s.clone()),
        JsonValue::Number(n) => AttributeValue::Numeric(
            n.as_f64()
                .with_context(|| format!("{column}: {n} is not representable as f64"))?,
        ),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            return Err(DiscoveryError::UnsupportedType {
                attribute: column.to_string(),
                found: if val.is_array() { "array" } else { "object" }.to_string(),
            }
            .into())
        }
    };
    Ok(Some(value))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, one record per line.
/// Empty cells are nulls. Each column's kind is decided from all of its
/// non-empty cells: boolean if all are `true`/`false`, numeric if all parse
/// as numbers, categorical otherwise.
pub fn load_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<LoadedInput> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<csv::StringRecord> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        cells.push(result.with_context(|| format!("CSV row {row_no}"))?);
    }

    let kinds: Vec<AttributeKind> = (0..headers.len())
        .map(|col| infer_csv_kind(cells.iter().filter_map(|r| r.get(col))))
        .collect();

    let rows: Vec<Vec<Option<AttributeValue>>> = cells
        .iter()
        .map(|record| {
            kinds
                .iter()
                .enumerate()
                .map(|(col, kind)| csv_value(record.get(col).unwrap_or(""), *kind))
                .collect()
        })
        .collect();

    Ok(LoadedInput {
        dataset: Dataset::from_columns(headers, rows)?,
        config: None,
    })
}

fn infer_csv_kind<'a>(cells: impl Iterator<Item = &'a str> + Clone) -> AttributeKind {
    let mut present = cells.filter(|s| !s.is_empty()).peekable();
    if present.peek().is_none() {
        return AttributeKind::Categorical;
    }
    if present.clone().all(|s| s == "true" || s == "false") {
        AttributeKind::Boolean
    } else if present.all(|s| s.parse::<f64>().is_ok()) {
        AttributeKind::Numeric
    } else {
        AttributeKind::Categorical
    }
}

fn csv_value(s: &str, kind: AttributeKind) -> Option<AttributeValue> {
    if s.is_empty() {
        return None;
    }
    match kind {
        AttributeKind::Boolean => Some(AttributeValue::Bool(s == "true")),
        AttributeKind::Numeric => s.parse().ok().map(AttributeValue::Numeric),
        AttributeKind::Categorical => Some(AttributeValue::Categorical(s.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns.
///
/// Boolean columns become boolean attributes, UTF-8 columns categorical and
/// 32/64-bit integer or float columns numeric. Any other column type is
/// rejected.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LoadedInput> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let values = names
                .iter()
                .zip(batch.columns())
                .map(|(name, col)| arrow_value(name, col, row))
                .collect::<std::result::Result<Vec<_>, _>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(values);
        }
    }

    Ok(LoadedInput {
        dataset: Dataset::from_columns(names, rows)?,
        config: None,
    })
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn arrow_value(
    name: &str,
    col: &ArrayRef,
    row: usize,
) -> std::result::Result<Option<AttributeValue>, DiscoveryError> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Boolean => AttributeValue::Bool(col.as_boolean().value(row)),
        DataType::Utf8 => AttributeValue::Categorical(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => {
            AttributeValue::Categorical(col.as_string::<i64>().value(row).to_string())
        }
        DataType::Int32 => AttributeValue::Numeric(f64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => AttributeValue::Numeric(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => {
            AttributeValue::Numeric(f64::from(col.as_primitive::<Float32Type>().value(row)))
        }
        DataType::Float64 => AttributeValue::Numeric(col.as_primitive::<Float64Type>().value(row)),
        other => {
            return Err(DiscoveryError::UnsupportedType {
                attribute: name.to_string(),
                found: format!("{other:?}"),
            })
        }
    };
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_carries_config() {
        let json = r#"{
            "rows": [
                {"geo_region": "NH", "browser_cookies": true, "browser_viewheight": 720, "condition_1": true, "clicked": false},
                {"geo_region": null, "browser_cookies": false, "browser_viewheight": 1080.5, "condition_1": false, "clicked": true}
            ],
            "width": 4, "depth": 2, "results": 7, "bins": 3,
            "targets": {"condition_1": true, "clicked": true}
        }"#;
        let input = load_json(json.as_bytes()).unwrap();
        let cfg = input.config.unwrap();
        assert_eq!((cfg.width, cfg.depth, cfg.results, cfg.bins), (4, 2, 7, 3));

        let ds = input.dataset;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.schema.kind_of("geo_region"), Some(AttributeKind::Categorical));
        assert_eq!(ds.schema.kind_of("browser_viewheight"), Some(AttributeKind::Numeric));
        let region = ds.schema.column("geo_region").unwrap();
        assert!(ds.records[1].get(region).is_none());
    }

    #[test]
    fn bare_array_has_no_config() {
        let input = load_json(r#"[{"a": true}, {"a": false}]"#.as_bytes()).unwrap();
        assert!(input.config.is_none());
        assert_eq!(input.dataset.schema.kind_of("a"), Some(AttributeKind::Boolean));
    }

    #[test]
    fn nested_values_are_unsupported() {
        let err = load_json(r#"[{"a": [1, 2]}]"#.as_bytes()).unwrap_err();
        let root = err.root_cause().downcast_ref::<DiscoveryError>();
        assert!(matches!(root, Some(DiscoveryError::UnsupportedType { .. })));
    }

    #[test]
    fn csv_columns_are_typed_as_a_whole() {
        let data = "os,cookies,height,zip\nLinux,true,720,0815\nMac,,1080.5,A1\n,false,,\n";
        let input = load_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        let ds = input.dataset;

        assert_eq!(ds.schema.kind_of("os"), Some(AttributeKind::Categorical));
        assert_eq!(ds.schema.kind_of("cookies"), Some(AttributeKind::Boolean));
        assert_eq!(ds.schema.kind_of("height"), Some(AttributeKind::Numeric));
        assert_eq!(ds.schema.kind_of("zip"), Some(AttributeKind::Categorical));
        assert_eq!(ds.records[0].get(3), Some(&AttributeValue::Categorical("0815".into())));
        assert!(ds.records[1].get(1).is_none());
        assert!(ds.records[2].get(0).is_none());
    }
}
