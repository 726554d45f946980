//! GraphQL field resolution for the bookmark API.
//!
//! Mutations are never applied here: they become tagged bus events whose
//! detail carries the mutation arguments. Only `getBookmarks` reads the store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::contract::{json_kind, BookmarkMutation, ContractError, ADD_BOOKMARK, DELETE_BOOKMARK};

pub const GET_BOOKMARKS: &str = "getBookmarks";
pub const MUTATION_TYPE: &str = "Mutation";
pub const QUERY_TYPE: &str = "Query";
pub const SUBMITTED_STATUS: &str = "submitted";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverRequest {
    pub info: ResolverInfo,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResolverInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type_name: Option<String>,
    pub field_name: String,
}

impl ResolverRequest {
    pub fn from_value(event: Value) -> Result<Self, ApiError> {
        if !event.is_object() {
            return Err(ApiError::MalformedRequest(format!(
                "expected a JSON object, got {}",
                json_kind(&event)
            )));
        }

        serde_json::from_value(event).map_err(|error| ApiError::MalformedRequest(error.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("malformed resolver request: {0}")]
    MalformedRequest(String),
    #[error("unknown field {type_name}.{field_name}")]
    UnknownField {
        type_name: String,
        field_name: String,
    },
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] ContractError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiOperation {
    Mutate(BookmarkMutation),
    GetBookmarks,
}

impl ApiOperation {
    pub fn from_request(request: &ResolverRequest) -> Result<Self, ApiError> {
        let field_name = request.info.field_name.as_str();
        let expected_type = match field_name {
            ADD_BOOKMARK | DELETE_BOOKMARK => MUTATION_TYPE,
            GET_BOOKMARKS => QUERY_TYPE,
            _ => {
                return Err(unknown_field(request));
            }
        };

        if let Some(type_name) = request.info.parent_type_name.as_deref() {
            if type_name != expected_type {
                return Err(unknown_field(request));
            }
        }

        if field_name == GET_BOOKMARKS {
            return Ok(Self::GetBookmarks);
        }

        let arguments = Value::Object(request.arguments.clone());
        match BookmarkMutation::decode(field_name, &arguments)? {
            Some(mutation) => Ok(Self::Mutate(mutation)),
            None => Err(unknown_field(request)),
        }
    }
}

fn unknown_field(request: &ResolverRequest) -> ApiError {
    ApiError::UnknownField {
        type_name: request
            .info
            .parent_type_name
            .clone()
            .unwrap_or_else(|| "?".to_string()),
        field_name: request.info.field_name.clone(),
    }
}

/// Returned to the caller once the mutation event is on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutationAck {
    pub status: String,
    pub detail_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

impl MutationAck {
    pub fn submitted(detail_type: impl Into<String>, event_id: Option<String>) -> Self {
        Self {
            status: SUBMITTED_STATUS.to_string(),
            detail_type: detail_type.into(),
            event_id,
        }
    }
}
