//! Raw record normalization.
//!
//! Turns JSON records, as exported or served by a blog-list backend, into
//! [`BlogPost`] values. The rules:
//!
//! - `likes` missing or `null` becomes 0.
//! - `likes` that is not an integer between 0 and `u32::MAX` is rejected.
//! - `title`, `author` and `url` must be non-blank strings.
//! - `id` (or Mongo's `_id`) is kept when present; other fields are ignored.

use crate::error::{Result, StatsError};
use crate::models::BlogPost;
use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Posts that survived normalization, plus how many records were dropped.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub posts: Vec<BlogPost>,
    pub skipped: usize,
}

/// Split a JSON document into its records.
///
/// Accepts either a top-level array or an object with a `blogs` array.
pub fn parse_document(content: &str) -> anyhow::Result<Vec<Value>> {
    let value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    records_from_value(value)
}

/// Extract the records from an already parsed document.
pub fn records_from_value(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("blogs") {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(anyhow::anyhow!("\"blogs\" must be an array")),
            None => Err(anyhow::anyhow!(
                "Expected an array of blogs or an object with a \"blogs\" array"
            )),
        },
        _ => Err(anyhow::anyhow!(
            "Expected an array of blogs or an object with a \"blogs\" array"
        )),
    }
}

/// Normalize every record.
///
/// With `skip_invalid` unset the first bad record fails the whole batch.
/// Otherwise bad records are logged and dropped.
pub fn normalize_all(records: &[Value], skip_invalid: bool) -> Result<Normalized> {
    let mut normalized = Normalized::default();

    for (index, record) in records.iter().enumerate() {
        match normalize_record(index, record) {
            Ok(post) => normalized.posts.push(post),
            Err(e) if skip_invalid => {
                warn!("Skipping record: {}", e);
                normalized.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        "Normalized {} records ({} skipped)",
        normalized.posts.len(),
        normalized.skipped
    );

    Ok(normalized)
}

/// Normalize one record. `index` is only used for error messages.
pub fn normalize_record(index: usize, record: &Value) -> Result<BlogPost> {
    let fields = record
        .as_object()
        .ok_or_else(|| StatsError::malformed(index, "record is not an object"))?;

    Ok(BlogPost {
        id: record_id(fields),
        title: required_text(index, fields, "title")?,
        author: required_text(index, fields, "author")?,
        url: required_text(index, fields, "url")?,
        likes: likes(index, fields)?,
    })
}

fn required_text(index: usize, fields: &Map<String, Value>, name: &str) -> Result<String> {
    match fields.get(name) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Value::String(_)) => Err(StatsError::malformed(index, format!("{} is blank", name))),
        None | Some(Value::Null) => {
            Err(StatsError::malformed(index, format!("{} is missing", name)))
        }
        Some(_) => Err(StatsError::malformed(
            index,
            format!("{} must be a string", name),
        )),
    }
}

fn likes(index: usize, fields: &Map<String, Value>) -> Result<u32> {
    match fields.get("likes") {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => {
            let count = n.as_u64().ok_or_else(|| {
                StatsError::malformed(
                    index,
                    format!("likes must be a non-negative integer, got {}", n),
                )
            })?;
            u32::try_from(count).map_err(|_| {
                StatsError::malformed(
                    index,
                    format!("likes must be at most {}, got {}", u32::MAX, count),
                )
            })
        }
        Some(other) => Err(StatsError::malformed(
            index,
            format!("likes must be a non-negative integer, got {}", other),
        )),
    }
}

fn record_id(fields: &Map<String, Value>) -> Option<String> {
    fields
        .get("id")
        .or_else(|| fields.get("_id"))
        .and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
