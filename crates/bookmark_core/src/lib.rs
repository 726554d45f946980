//! Shared bookmark domain primitives.
//!
//! This crate owns the record shape, tagged mutation decoding, identifier
//! generation, event-bus rule matching, and the mapping from API operations
//! to outbound bus events. It intentionally excludes AWS SDK and Lambda
//! runtime concerns; those live in `bookmark_lambda`.

pub mod api;
pub mod contract;
pub mod identifiers;
pub mod routing;
