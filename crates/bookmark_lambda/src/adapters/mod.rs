pub mod dynamodb;
pub mod event_publisher;
pub mod eventbridge;
pub mod record_store;
