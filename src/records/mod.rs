//! Offline transforms over previously written record sets
//!
//! These operate on loosely typed JSON values rather than [`crate::types`]
//! structs because a record file may mix crawled page records with records
//! produced elsewhere (e.g. `"Document"` entries carrying a
//! `properties.file_path`). Each transform preserves every field it does not
//! explicitly touch.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::types::PAGE_RECORD_CLASS;

/// Errors while loading, transforming, or saving record files
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a top-level JSON array in {0}")]
    NotAnArray(String),
}

/// Load a record file (a top-level JSON array).
pub fn load_records(path: &Path) -> Result<Vec<Value>, RecordsError> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    match value {
        Value::Array(records) => Ok(records),
        _ => Err(RecordsError::NotAnArray(path.display().to_string())),
    }
}

/// Save records as a pretty-printed JSON array.
pub fn save_records(path: &Path, records: &[Value]) -> Result<(), RecordsError> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Lift the first prop's `title`/`content`/`keywords` onto the top level of
/// every crawled page record and drop its `props` array. Records of other
/// classes and records without props are left untouched. Returns the number
/// of records flattened.
pub fn flatten_page_records(records: &mut [Value]) -> usize {
    let mut flattened = 0;

    for record in records.iter_mut() {
        if record.get("class").and_then(Value::as_str) != Some(PAGE_RECORD_CLASS) {
            continue;
        }
        let Some(first) = record
            .get("props")
            .and_then(Value::as_array)
            .and_then(|props| props.first())
            .cloned()
        else {
            continue;
        };

        let Some(entry) = record.as_object_mut() else {
            continue;
        };
        entry.insert(
            "title".to_string(),
            first.get("title").cloned().unwrap_or(Value::String(String::new())),
        );
        entry.insert(
            "content".to_string(),
            first
                .get("content")
                .cloned()
                .unwrap_or(Value::String(String::new())),
        );
        entry.insert(
            "keywords".to_string(),
            first.get("keywords").cloned().unwrap_or(Value::Array(Vec::new())),
        );
        entry.remove("props");
        flattened += 1;
    }

    flattened
}

/// Reduce each record's `props` to the single prop with the longest
/// `content` (first wins ties). Records without props are dropped.
pub fn keep_longest_prop(records: Vec<Value>) -> Vec<Value> {
    records
        .into_iter()
        .filter_map(|mut record| {
            let longest = {
                let props = record.get("props").and_then(Value::as_array)?;
                // First prop wins ties, so a strictly-greater scan rather
                // than max_by_key (which keeps the last maximum).
                let mut best: Option<&Value> = None;
                let mut best_len = 0usize;
                for prop in props {
                    let len = prop
                        .get("content")
                        .and_then(Value::as_str)
                        .map(str::len)
                        .unwrap_or(0);
                    if best.is_none() || len > best_len {
                        best = Some(prop);
                        best_len = len;
                    }
                }
                best?.clone()
            };

            record
                .as_object_mut()?
                .insert("props".to_string(), Value::Array(vec![longest]));
            Some(record)
        })
        .collect()
}

/// Retain only records whose `class` equals `class_name`.
pub fn select_class(records: Vec<Value>, class_name: &str) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| record.get("class").and_then(Value::as_str) == Some(class_name))
        .collect()
}

/// Drop `Document` records whose recorded `properties.file_path` no longer
/// exists on disk. Records without a recorded path and records of every
/// other class pass through. Returns the surviving records and the number
/// removed.
pub fn prune_missing_documents(records: Vec<Value>) -> (Vec<Value>, usize) {
    let mut removed = 0;
    let kept = records
        .into_iter()
        .filter(|record| {
            if record.get("class").and_then(Value::as_str) != Some("Document") {
                return true;
            }
            let file_path = record
                .get("properties")
                .and_then(|props| props.get("file_path"))
                .and_then(Value::as_str);
            match file_path {
                Some(path) if Path::new(path).exists() => true,
                // No path recorded at all: keep, nothing to verify
                None => true,
                Some(_) => {
                    removed += 1;
                    false
                }
            }
        })
        .collect();

    (kept, removed)
}
