//! Mutation dispatcher: one tagged bus event in, at most one store call out.

use std::str::FromStr;

use bookmark_core::contract::{BookmarkMutation, BookmarkRecord, ContractError, MutationEnvelope};
use bookmark_core::routing::EventRule;
use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::adapters::record_store::{RecordStore, StoreError};

/// What happens to a failed mutation once it has been logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Swallow the failure; the invocation reports success.
    #[default]
    Lenient,
    /// Return the failure to the invoker.
    Strict,
}

impl ErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }

    /// Logs a failed dispatch and either suppresses or propagates it.
    pub fn apply(
        self,
        result: Result<DispatchOutcome, DispatchError>,
    ) -> Result<DispatchOutcome, DispatchError> {
        let failure = match result {
            Ok(outcome) => return Ok(outcome),
            Err(failure) => failure,
        };

        error!(
            event = "mutation_failed",
            policy = self.as_str(),
            error = %failure,
            "bookmark mutation failed"
        );

        match self {
            Self::Lenient => Ok(DispatchOutcome::Suppressed {
                error: failure.to_string(),
            }),
            Self::Strict => Err(failure),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown error policy '{other}', expected 'lenient' or 'strict'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Inserted { id: String },
    Deleted { id: String },
    Ignored { detail_type: String },
    /// A failure swallowed under [`ErrorPolicy::Lenient`].
    Suppressed { error: String },
}

pub fn handle_mutation_event(
    event: Value,
    store: &dyn RecordStore,
    policy: ErrorPolicy,
) -> Result<DispatchOutcome, DispatchError> {
    let result = MutationEnvelope::from_value(event)
        .map_err(DispatchError::from)
        .and_then(|envelope| dispatch_envelope(&envelope, store));
    policy.apply(result)
}

pub fn handle_mutation_envelope(
    envelope: &MutationEnvelope,
    store: &dyn RecordStore,
    policy: ErrorPolicy,
) -> Result<DispatchOutcome, DispatchError> {
    policy.apply(dispatch_envelope(envelope, store))
}

/// Dispatches a bus event only when `rule` selects it; everything else is
/// ignored without touching the store.
pub fn handle_routed_event(
    event: Value,
    rule: &EventRule,
    store: &dyn RecordStore,
    policy: ErrorPolicy,
) -> Result<DispatchOutcome, DispatchError> {
    let envelope = match MutationEnvelope::from_value(event) {
        Ok(value) => value,
        Err(error) => return policy.apply(Err(error.into())),
    };

    if !rule.matches_envelope(&envelope) {
        debug!(
            event = "mutation_ignored",
            source = ?envelope.source,
            detail_type = %envelope.detail_type,
            "event not selected by bookmark rule"
        );
        return Ok(DispatchOutcome::Ignored {
            detail_type: envelope.detail_type,
        });
    }

    handle_mutation_envelope(&envelope, store, policy)
}

fn dispatch_envelope(
    envelope: &MutationEnvelope,
    store: &dyn RecordStore,
) -> Result<DispatchOutcome, DispatchError> {
    if !envelope.discarded_metadata.is_empty() {
        warn!(
            event = "envelope_metadata_discarded",
            fields = ?envelope.discarded_metadata,
            "ignored malformed bus metadata"
        );
    }

    info!(
        event = "mutation_received",
        detail_type = %envelope.detail_type,
        event_id = ?envelope.id,
        delivery_lag_ms = ?envelope.delivery_lag_ms(Utc::now()),
        "received bookmark mutation"
    );

    let Some(mutation) = envelope.mutation()? else {
        debug!(
            event = "mutation_ignored",
            detail_type = %envelope.detail_type,
            "unrecognized detail type"
        );
        return Ok(DispatchOutcome::Ignored {
            detail_type: envelope.detail_type.clone(),
        });
    };

    match mutation {
        BookmarkMutation::Add { title, bookmark } => {
            let record = BookmarkRecord::with_generated_id(title, bookmark);
            store.put_record(&record)?;
            info!(event = "bookmark_inserted", id = %record.id, "inserted bookmark");
            Ok(DispatchOutcome::Inserted { id: record.id })
        }
        BookmarkMutation::Delete { id } => {
            store.delete_record(&id)?;
            info!(event = "bookmark_deleted", id = %id, "deleted bookmark");
            Ok(DispatchOutcome::Deleted { id })
        }
    }
}
