use bookmark_core::routing::OutboundEvent;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to publish {detail_type} event: {message}")]
pub struct PublishError {
    pub detail_type: String,
    pub message: String,
}

impl PublishError {
    pub fn new(event: &OutboundEvent, message: impl Into<String>) -> Self {
        Self {
            detail_type: event.detail_type.clone(),
            message: message.into(),
        }
    }
}

pub trait EventPublisher {
    /// Puts one event on the bus and returns the id the bus assigned, if any.
    fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, PublishError>;
}
