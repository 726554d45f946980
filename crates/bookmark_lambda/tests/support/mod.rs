#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io;
use std::sync::{Arc, Mutex};

use bookmark_core::contract::BookmarkRecord;
use bookmark_core::routing::OutboundEvent;
use bookmark_lambda::adapters::event_publisher::{EventPublisher, PublishError};
use bookmark_lambda::adapters::record_store::{RecordStore, StoreError, StoreOperation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put(BookmarkRecord),
    Delete(String),
    Scan,
}

/// In-memory store that records every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    records: Mutex<BTreeMap<String, BookmarkRecord>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(records: Vec<BookmarkRecord>) -> Self {
        let store = Self::new();
        store.records.lock().expect("poisoned mutex").extend(
            records
                .into_iter()
                .map(|record| (record.id.clone(), record)),
        );
        store
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().expect("poisoned mutex").clone()
    }

    pub fn records(&self) -> Vec<BookmarkRecord> {
        self.records
            .lock()
            .expect("poisoned mutex")
            .values()
            .cloned()
            .collect()
    }

    fn log(&self, call: StoreCall) {
        self.calls.lock().expect("poisoned mutex").push(call);
    }
}

impl RecordStore for RecordingStore {
    fn put_record(&self, record: &BookmarkRecord) -> Result<(), StoreError> {
        self.log(StoreCall::Put(record.clone()));
        self.records
            .lock()
            .expect("poisoned mutex")
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn delete_record(&self, id: &str) -> Result<(), StoreError> {
        self.log(StoreCall::Delete(id.to_string()));
        self.records.lock().expect("poisoned mutex").remove(id);
        Ok(())
    }

    fn scan_records(&self) -> Result<Vec<BookmarkRecord>, StoreError> {
        self.log(StoreCall::Scan);
        Ok(self.records())
    }
}

/// Store whose every call fails the way a throttled or missing table does.
#[derive(Default)]
pub struct FailingStore {
    attempts: Mutex<usize>,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().expect("poisoned mutex")
    }

    fn fail(&self, operation: StoreOperation) -> StoreError {
        *self.attempts.lock().expect("poisoned mutex") += 1;
        StoreError::request(
            operation,
            "ProvisionedThroughputExceededException: rate exceeded",
        )
    }
}

impl RecordStore for FailingStore {
    fn put_record(&self, _record: &BookmarkRecord) -> Result<(), StoreError> {
        Err(self.fail(StoreOperation::Put))
    }

    fn delete_record(&self, _id: &str) -> Result<(), StoreError> {
        Err(self.fail(StoreOperation::Delete))
    }

    fn scan_records(&self) -> Result<Vec<BookmarkRecord>, StoreError> {
        Err(self.fail(StoreOperation::Scan))
    }
}

pub struct RecordingPublisher {
    events: Mutex<Vec<OutboundEvent>>,
    reject: bool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            reject: false,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            reject: true,
        }
    }

    pub fn events(&self) -> Vec<OutboundEvent> {
        self.events.lock().expect("poisoned mutex").clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: &OutboundEvent) -> Result<Option<String>, PublishError> {
        if self.reject {
            return Err(PublishError::new(event, "AccessDeniedException: not authorized"));
        }
        let mut events = self.events.lock().expect("poisoned mutex");
        events.push(event.clone());
        Ok(Some(format!("event-{}", events.len())))
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("poisoned mutex").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a JSON subscriber installed for the current thread and
/// returns what it logged.
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().expect("poisoned mutex").clone())
        .expect("logs should be UTF-8");
    (result, logs)
}
