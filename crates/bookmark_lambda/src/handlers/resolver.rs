use bookmark_core::api::{ApiError, ApiOperation, MutationAck, ResolverRequest};
use bookmark_core::contract::BookmarkMutation;
use bookmark_core::routing::{EventRule, OutboundEvent};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::adapters::event_publisher::{EventPublisher, PublishError};
use crate::adapters::record_store::{RecordStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to serialize resolver response: {0}")]
    Serialization(String),
}

pub struct ResolverContext<'a> {
    pub rule: &'a EventRule,
    pub event_bus_name: &'a str,
    pub publisher: &'a dyn EventPublisher,
    pub store: &'a dyn RecordStore,
}

/// Resolves one API field.
///
/// Mutations only publish an event; the acknowledgment says nothing about
/// whether the store mutation later succeeds.
pub fn handle_resolver_event(
    event: Value,
    context: &ResolverContext<'_>,
) -> Result<Value, ResolverError> {
    let request = ResolverRequest::from_value(event)?;

    match ApiOperation::from_request(&request)? {
        ApiOperation::Mutate(mutation) => {
            let ack = submit_mutation(&mutation, context)?;
            to_response(&ack)
        }
        ApiOperation::GetBookmarks => {
            let records = context.store.scan_records()?;
            info!(
                event = "bookmarks_scanned",
                count = records.len(),
                "scanned bookmark table"
            );
            to_response(&records)
        }
    }
}

pub fn submit_mutation(
    mutation: &BookmarkMutation,
    context: &ResolverContext<'_>,
) -> Result<MutationAck, ResolverError> {
    let event = OutboundEvent::for_mutation(mutation, context.rule, context.event_bus_name);
    let event_id = context.publisher.publish(&event)?;

    info!(
        event = "event_published",
        detail_type = %event.detail_type,
        event_bus = %event.event_bus_name,
        event_id = ?event_id,
        "published bookmark mutation"
    );

    Ok(MutationAck::submitted(event.detail_type, event_id))
}

fn to_response(payload: &impl Serialize) -> Result<Value, ResolverError> {
    serde_json::to_value(payload).map_err(|error| ResolverError::Serialization(error.to_string()))
}
