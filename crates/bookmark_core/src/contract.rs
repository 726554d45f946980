use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::identifiers::generate_bookmark_id;

pub const ADD_BOOKMARK: &str = "addBookmark";
pub const DELETE_BOOKMARK: &str = "deleteBookmark";
pub const MUTATION_DETAIL_TYPES: [&str; 2] = [ADD_BOOKMARK, DELETE_BOOKMARK];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookmarkRecord {
    pub id: String,
    pub title: String,
    pub bookmark: String,
}

impl BookmarkRecord {
    pub fn with_generated_id(title: impl Into<String>, bookmark: impl Into<String>) -> Self {
        Self {
            id: generate_bookmark_id(),
            title: title.into(),
            bookmark: bookmark.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("malformed {detail_type} payload: {reason}")]
    MalformedPayload { detail_type: String, reason: String },
    #[error("malformed event envelope: {0}")]
    MalformedEnvelope(String),
}

/// A decoded mutation, one variant per recognized `detail-type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkMutation {
    Add { title: String, bookmark: String },
    Delete { id: String },
}

impl BookmarkMutation {
    /// Decodes `detail` according to `detail_type`.
    ///
    /// Unrecognized tags yield `Ok(None)`; a recognized tag with a missing or
    /// non-string field yields `MalformedPayload`.
    pub fn decode(detail_type: &str, detail: &Value) -> Result<Option<Self>, ContractError> {
        match detail_type {
            ADD_BOOKMARK => Ok(Some(Self::Add {
                title: required_string(detail_type, detail, "title")?,
                bookmark: required_string(detail_type, detail, "bookmark")?,
            })),
            DELETE_BOOKMARK => Ok(Some(Self::Delete {
                id: required_string(detail_type, detail, "id")?,
            })),
            _ => Ok(None),
        }
    }

    pub fn detail_type(&self) -> &'static str {
        match self {
            Self::Add { .. } => ADD_BOOKMARK,
            Self::Delete { .. } => DELETE_BOOKMARK,
        }
    }

    pub fn to_detail(&self) -> Value {
        match self {
            Self::Add { title, bookmark } => json!({
                "title": title,
                "bookmark": bookmark,
            }),
            Self::Delete { id } => json!({ "id": id }),
        }
    }
}

fn required_string(
    detail_type: &str,
    detail: &Value,
    field: &str,
) -> Result<String, ContractError> {
    let malformed = |reason: String| ContractError::MalformedPayload {
        detail_type: detail_type.to_string(),
        reason,
    };

    let Some(object) = detail.as_object() else {
        return Err(malformed("detail must be a JSON object".to_string()));
    };

    match object.get(field) {
        None | Some(Value::Null) => Err(malformed(format!("missing required field `{field}`"))),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(malformed(format!("field `{field}` must be a string"))),
    }
}

/// Event-bus wrapper around a mutation payload.
///
/// Only `detail-type` is required. The bus metadata (`id`, `source`, `time`)
/// feeds logging and rule matching, so a value of the wrong shape is dropped
/// and its name kept in `discarded_metadata` instead of failing the event.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MutationEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(rename = "detail-type")]
    pub detail_type: String,
    pub detail: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub discarded_metadata: Vec<&'static str>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "detail-type")]
    detail_type: String,
    #[serde(default = "empty_detail")]
    detail: Value,
    #[serde(default)]
    id: Value,
    #[serde(default)]
    source: Value,
    #[serde(default)]
    time: Value,
}

fn empty_detail() -> Value {
    json!({})
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn optional_string(
    value: Value,
    name: &'static str,
    discarded: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        _ => {
            discarded.push(name);
            None
        }
    }
}

impl MutationEnvelope {
    pub fn from_value(event: Value) -> Result<Self, ContractError> {
        if !event.is_object() {
            return Err(ContractError::MalformedEnvelope(format!(
                "expected a JSON object, got {}",
                json_kind(&event)
            )));
        }

        let raw: RawEnvelope = serde_json::from_value(event)
            .map_err(|error| ContractError::MalformedEnvelope(error.to_string()))?;

        let mut discarded_metadata = Vec::new();
        let id = optional_string(raw.id, "id", &mut discarded_metadata);
        let source = optional_string(raw.source, "source", &mut discarded_metadata);
        let time = match optional_string(raw.time, "time", &mut discarded_metadata) {
            Some(text) => text.parse::<DateTime<Utc>>().ok().or_else(|| {
                discarded_metadata.push("time");
                None
            }),
            None => None,
        };

        Ok(Self {
            id,
            source,
            detail_type: raw.detail_type,
            detail: raw.detail,
            time,
            discarded_metadata,
        })
    }

    pub fn mutation(&self) -> Result<Option<BookmarkMutation>, ContractError> {
        BookmarkMutation::decode(&self.detail_type, &self.detail)
    }

    /// Milliseconds between the bus timestamp and `now`, when the bus stamped one.
    pub fn delivery_lag_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.time.map(|time| (now - time).num_milliseconds())
    }
}
