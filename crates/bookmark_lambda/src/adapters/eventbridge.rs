use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::operation::put_events::PutEventsOutput;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use bookmark_core::routing::OutboundEvent;

use crate::adapters::event_publisher::{EventPublisher, PublishError};

#[derive(Debug, Clone)]
pub struct EventBridgePublisher {
    client: aws_sdk_eventbridge::Client,
}

impl EventBridgePublisher {
    pub fn new(client: aws_sdk_eventbridge::Client) -> Self {
        Self { client }
    }
}

impl EventPublisher for EventBridgePublisher {
    fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, PublishError> {
        let entry = PutEventsRequestEntry::builder()
            .event_bus_name(event.event_bus_name.clone())
            .source(event.source.clone())
            .detail_type(event.detail_type.clone())
            .detail(event.detail.clone())
            .build();
        let client = self.client.clone();

        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client.put_events().entries(entry).send().await
            })
        })
        .map_err(|error| PublishError::new(event, DisplayErrorContext(&error).to_string()))?;

        entry_result(&output).map_err(|message| PublishError::new(event, message))
    }
}

/// Reads the outcome of a single-entry `PutEvents` call. The request can
/// succeed while the entry itself is rejected, which `failed_entry_count`
/// reports.
pub fn entry_result(output: &PutEventsOutput) -> Result<Option<String>, String> {
    let entry = output.entries().first();
    if output.failed_entry_count > 0 {
        return Err(entry
            .map(|entry| {
                format!(
                    "{}: {}",
                    entry.error_code().unwrap_or("unknown"),
                    entry.error_message().unwrap_or("entry rejected")
                )
            })
            .unwrap_or_else(|| "entry rejected".to_string()));
    }

    Ok(entry.and_then(|entry| entry.event_id().map(str::to_string)))
}
