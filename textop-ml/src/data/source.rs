//! Data source abstraction for loading sample tables from files.

use crate::data::array::{ArrayLike, Table};
use crate::error::TextOpError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// The type of data source to load from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceType {
    Csv {
        path: PathBuf,
        #[serde(default = "default_delimiter")]
        delimiter: char,
    },
    Json {
        path: PathBuf,
    },
    Jsonl {
        path: PathBuf,
    },
}

fn default_delimiter() -> char {
    ','
}

impl DataSourceType {
    /// Pick a source type from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, TextOpError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv {
                path: path.to_path_buf(),
                delimiter: ',',
            }),
            "tsv" => Ok(Self::Csv {
                path: path.to_path_buf(),
                delimiter: '\t',
            }),
            "json" => Ok(Self::Json {
                path: path.to_path_buf(),
            }),
            "jsonl" | "ndjson" => Ok(Self::Jsonl {
                path: path.to_path_buf(),
            }),
            other => Err(TextOpError::dataset(format!(
                "Unsupported data file extension '{other}' for {}",
                path.display()
            ))),
        }
    }

    pub fn build(&self) -> Box<dyn DataSource> {
        match self {
            Self::Csv { path, delimiter } => Box::new(CsvSource {
                path: path.clone(),
                delimiter: *delimiter,
            }),
            Self::Json { path } => Box::new(JsonSource { path: path.clone() }),
            Self::Jsonl { path } => Box::new(JsonlSource { path: path.clone() }),
        }
    }
}

/// Information about a data source for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceInfo {
    pub source_type: String,
    pub location: String,
}

/// Trait for loading data from a source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load every row of this source.
    async fn load(&self) -> Result<Table, TextOpError>;

    /// Return metadata about this source.
    fn source_info(&self) -> DataSourceInfo;
}

/// Load a table from a path, choosing the source by extension.
pub async fn load_table(path: &Path) -> Result<Table, TextOpError> {
    let source = DataSourceType::from_path(path)?.build();
    let info = source.source_info();
    let table = source.load().await?;
    tracing::debug!(
        source = %info.source_type,
        location = %info.location,
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded table"
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

/// CSV file data source.
pub struct CsvSource {
    pub path: PathBuf,
    pub delimiter: char,
}

#[async_trait]
impl DataSource for CsvSource {
    async fn load(&self) -> Result<Table, TextOpError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_csv(&content, self.delimiter)
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "csv".to_string(),
            location: self.path.display().to_string(),
        }
    }
}

/// Parse CSV text with a header row. Quoted fields may span lines.
pub fn parse_csv(content: &str, delimiter: char) -> Result<Table, TextOpError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            TextOpError::dataset(format!("CSV delimiter {delimiter:?} is not a single ASCII byte"))
        })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    if columns.is_empty() {
        return Err(TextOpError::dataset("Empty CSV file"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(Table { columns, rows })
}

fn csv_error(e: csv::Error) -> TextOpError {
    TextOpError::dataset(format!("CSV parse error: {e}"))
}

fn parse_cell(s: &str) -> Value {
    if s.is_empty() {
        Value::Null
    } else if let Ok(i) = s.parse::<i64>() {
        Value::Number(i.into())
    } else if let Ok(f) = s.parse::<f64>() {
        serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(s.to_string()))
    } else if s == "true" || s == "false" {
        Value::Bool(s == "true")
    } else {
        Value::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JsonSource
// ---------------------------------------------------------------------------

/// JSON file data source.
///
/// Accepts `{"columns": [...], "rows": [[...]]}`, a bare 1-D/2-D array, or an
/// array of objects.
pub struct JsonSource {
    pub path: PathBuf,
}

#[async_trait]
impl DataSource for JsonSource {
    async fn load(&self) -> Result<Table, TextOpError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let value: Value = serde_json::from_str(&content)?;
        table_from_json(value)
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "json".to_string(),
            location: self.path.display().to_string(),
        }
    }
}

/// Interpret a JSON document as a table.
pub fn table_from_json(value: Value) -> Result<Table, TextOpError> {
    let has_rows = value.get("rows").is_some();
    match value {
        Value::Object(_) if has_rows => {
            let table: Table = serde_json::from_value(value)?;
            if let Some(i) = table.rows.iter().position(|r| r.len() != table.columns.len()) {
                return Err(TextOpError::invalid_shape(format!(
                    "row {i} does not match the {} declared columns",
                    table.columns.len()
                )));
            }
            Ok(table)
        }
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            Ok(table_from_objects(&items))
        }
        Value::Array(items) => Table::from_array(&ArrayLike::from_value(Value::Array(items))?),
        _ => Err(TextOpError::dataset(
            "JSON must be an array or an object with \"rows\"",
        )),
    }
}

fn table_from_objects(items: &[Value]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    let rows = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|col| item.get(col).cloned().unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    Table { columns, rows }
}

// ---------------------------------------------------------------------------
// JsonlSource
// ---------------------------------------------------------------------------

/// JSON Lines (JSONL) file data source: one JSON object per line.
pub struct JsonlSource {
    pub path: PathBuf,
}

#[async_trait]
impl DataSource for JsonlSource {
    async fn load(&self) -> Result<Table, TextOpError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let mut items = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(line)?;
            if !value.is_object() {
                return Err(TextOpError::dataset("JSONL lines must be objects"));
            }
            items.push(value);
        }

        Ok(table_from_objects(&items))
    }

    fn source_info(&self) -> DataSourceInfo {
        DataSourceInfo {
            source_type: "jsonl".to_string(),
            location: self.path.display().to_string(),
        }
    }
}
