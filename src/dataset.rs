use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::classify::{self, RecordError};
use crate::models::{ClassifiedThread, RawThread};
use crate::timezone::ReferenceZone;

const QUESTION_TYPE: &str = "question";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("File '{}' not found.", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON format - {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("expected a JSON array of threads, found {0}")]
    NotAnArray(&'static str),
}

#[derive(Debug, Default)]
pub struct Dataset {
    pub threads: Vec<ClassifiedThread>,
    /// Question records dropped because they could not be classified.
    pub skipped: usize,
}

pub fn load(path: &Path, zone: &ReferenceZone) -> Result<Dataset, DatasetError> {
    let contents = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound(path.to_path_buf())
        } else {
            DatasetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let dataset = parse(&contents, zone)?;
    debug!(
        path = %path.display(),
        threads = dataset.threads.len(),
        skipped = dataset.skipped,
        "loaded dataset"
    );
    Ok(dataset)
}

/// Classifies every question record; other record types are ignored.
pub fn parse(contents: &str, zone: &ReferenceZone) -> Result<Dataset, DatasetError> {
    let records = match serde_json::from_str::<Value>(contents)? {
        Value::Array(records) => records,
        other => return Err(DatasetError::NotAnArray(json_kind(&other))),
    };

    let mut dataset = Dataset::default();
    for (position, record) in records.into_iter().enumerate() {
        if record.get("type").and_then(Value::as_str) != Some(QUESTION_TYPE) {
            continue;
        }

        match classify_value(record, zone) {
            Ok(thread) => dataset.threads.push(thread),
            Err(err) => {
                warn!(position, "Skipping malformed thread - {err}");
                dataset.skipped += 1;
            }
        }
    }

    Ok(dataset)
}

fn classify_value(record: Value, zone: &ReferenceZone) -> Result<ClassifiedThread, RecordError> {
    let raw: RawThread = serde_json::from_value(record)?;
    classify::classify_record(zone, raw)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
