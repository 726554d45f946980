use std::fmt;

use bookmark_core::contract::BookmarkRecord;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Put,
    Delete,
    Scan,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Put => "put",
            Self::Delete => "delete",
            Self::Scan => "scan",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to {operation} bookmark record: {message}")]
    Request {
        operation: StoreOperation,
        message: String,
    },
    #[error("failed to decode bookmark record: {message}")]
    Decode { message: String },
}

impl StoreError {
    pub fn request(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::Request {
            operation,
            message: message.into(),
        }
    }
}

/// Key-value persistence for bookmark records, keyed by `id`.
///
/// `put_record` and `delete_record` are unconditional: no existence checks,
/// and deleting a missing id succeeds.
pub trait RecordStore {
    fn put_record(&self, record: &BookmarkRecord) -> Result<(), StoreError>;

    fn delete_record(&self, id: &str) -> Result<(), StoreError>;

    /// Returns every record. No page size or upper bound is applied.
    fn scan_records(&self) -> Result<Vec<BookmarkRecord>, StoreError>;
}
