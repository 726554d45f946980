//! AWS-oriented adapters and handlers for the bookmark backend.
//!
//! This crate owns runtime integration details (Lambda handlers, DynamoDB and
//! EventBridge adapters, configuration, logging) on top of the AWS-free
//! contracts in `bookmark_core`.

pub mod adapters;
pub mod clients;
pub mod config;
pub mod handlers;
pub mod logging;
