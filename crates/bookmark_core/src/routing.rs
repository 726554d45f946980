use serde::{Deserialize, Serialize};

use crate::contract::{BookmarkMutation, MutationEnvelope, MUTATION_DETAIL_TYPES};

pub const DEFAULT_EVENT_SOURCE: &str = "eru-bookmark-events";
pub const DEFAULT_EVENT_BUS: &str = "default";

/// Bus rule selecting the events this system consumes: one source, and the
/// bookmark mutation detail types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRule {
    source: String,
    detail_types: Vec<String>,
}

impl EventRule {
    pub fn bookmark_mutations(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            detail_types: MUTATION_DETAIL_TYPES
                .iter()
                .map(|detail_type| detail_type.to_string())
                .collect(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, source: Option<&str>, detail_type: &str) -> bool {
        source == Some(self.source.as_str())
            && self
                .detail_types
                .iter()
                .any(|candidate| candidate == detail_type)
    }

    pub fn matches_envelope(&self, envelope: &MutationEnvelope) -> bool {
        self.matches(envelope.source.as_deref(), &envelope.detail_type)
    }
}

impl Default for EventRule {
    fn default() -> Self {
        Self::bookmark_mutations(DEFAULT_EVENT_SOURCE)
    }
}

/// A single entry for the bus `PutEvents` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundEvent {
    pub event_bus_name: String,
    pub source: String,
    pub detail_type: String,
    /// JSON-encoded detail object, as the bus API expects a string.
    pub detail: String,
}

impl OutboundEvent {
    pub fn for_mutation(
        mutation: &BookmarkMutation,
        rule: &EventRule,
        event_bus_name: &str,
    ) -> Self {
        Self {
            event_bus_name: event_bus_name.to_string(),
            source: rule.source().to_string(),
            detail_type: mutation.detail_type().to_string(),
            detail: mutation.to_detail().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::contract::{ADD_BOOKMARK, DELETE_BOOKMARK};

    #[test]
    fn rule_accepts_both_mutation_types_from_own_source() {
        let rule = EventRule::default();
        assert!(rule.matches(Some(DEFAULT_EVENT_SOURCE), ADD_BOOKMARK));
        assert!(rule.matches(Some(DEFAULT_EVENT_SOURCE), DELETE_BOOKMARK));
    }

    #[test]
    fn rule_rejects_foreign_source_and_unknown_types() {
        let rule = EventRule::default();
        assert!(!rule.matches(Some("aws.s3"), ADD_BOOKMARK));
        assert!(!rule.matches(None, ADD_BOOKMARK));
        assert!(!rule.matches(Some(DEFAULT_EVENT_SOURCE), "updateBookmark"));
    }

    #[test]
    fn rule_matches_parsed_envelope() {
        let rule = EventRule::bookmark_mutations("custom-source");
        let envelope = MutationEnvelope::from_value(json!({
            "source": "custom-source",
            "detail-type": "deleteBookmark",
            "detail": {"id": "abc123"}
        }))
        .expect("envelope should parse");

        assert!(rule.matches_envelope(&envelope));
        assert!(!EventRule::default().matches_envelope(&envelope));
    }

    #[test]
    fn outbound_event_carries_mutation_name_and_arguments() {
        let mutation = BookmarkMutation::Add {
            title: "Example".to_string(),
            bookmark: "https://example.com".to_string(),
        };

        let event = OutboundEvent::for_mutation(&mutation, &EventRule::default(), "default");
        assert_eq!(event.source, DEFAULT_EVENT_SOURCE);
        assert_eq!(event.detail_type, ADD_BOOKMARK);
        assert_eq!(event.event_bus_name, "default");

        let detail: Value = serde_json::from_str(&event.detail).expect("detail should be JSON");
        assert_eq!(
            detail,
            json!({"title": "Example", "bookmark": "https://example.com"})
        );
    }

    #[test]
    fn outbound_detail_escapes_quotes_in_arguments() {
        let mutation = BookmarkMutation::Add {
            title: "say \"hi\"".to_string(),
            bookmark: "https://example.com/?q=\"x\"".to_string(),
        };

        let event = OutboundEvent::for_mutation(&mutation, &EventRule::default(), "default");
        let detail: Value = serde_json::from_str(&event.detail).expect("detail should be JSON");
        assert_eq!(detail["title"], "say \"hi\"");
    }
}
