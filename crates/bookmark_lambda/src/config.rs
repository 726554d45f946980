use bookmark_core::routing::{EventRule, DEFAULT_EVENT_BUS, DEFAULT_EVENT_SOURCE};
use tracing::warn;

use crate::handlers::dispatcher::ErrorPolicy;

pub const TABLE_NAME_ENV: &str = "ADDBOOKMARK_EVENT";
pub const EVENT_SOURCE_ENV: &str = "BOOKMARK_EVENT_SOURCE";
pub const EVENT_BUS_ENV: &str = "BOOKMARK_EVENT_BUS";
pub const ERROR_POLICY_ENV: &str = "BOOKMARK_ERROR_POLICY";
pub const DYNAMODB_ENDPOINT_ENV: &str = "BOOKMARK_DYNAMODB_ENDPOINT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Destination table. Left empty when unset; the store rejects it at call time.
    pub table_name: String,
    pub event_source: String,
    pub event_bus_name: String,
    pub error_policy: ErrorPolicy,
    pub dynamodb_endpoint: Option<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let error_policy = match non_blank(ERROR_POLICY_ENV) {
            None => ErrorPolicy::default(),
            Some(raw) => raw.parse().unwrap_or_else(|error: String| {
                warn!(
                    event = "config_fallback",
                    key = ERROR_POLICY_ENV,
                    error = %error,
                    "falling back to lenient error policy"
                );
                ErrorPolicy::default()
            }),
        };

        Self {
            table_name: lookup(TABLE_NAME_ENV).unwrap_or_default(),
            event_source: non_blank(EVENT_SOURCE_ENV)
                .unwrap_or_else(|| DEFAULT_EVENT_SOURCE.to_string()),
            event_bus_name: non_blank(EVENT_BUS_ENV)
                .unwrap_or_else(|| DEFAULT_EVENT_BUS.to_string()),
            error_policy,
            dynamodb_endpoint: non_blank(DYNAMODB_ENDPOINT_ENV),
        }
    }

    pub fn event_rule(&self) -> EventRule {
        EventRule::bookmark_mutations(self.event_source.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> RuntimeConfig {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| values.get(key).cloned())
    }

    #[test]
    fn missing_table_name_resolves_to_empty_string() {
        let config = config_from(&[]);
        assert_eq!(config.table_name, "");
        assert_eq!(config.event_source, DEFAULT_EVENT_SOURCE);
        assert_eq!(config.event_bus_name, DEFAULT_EVENT_BUS);
        assert_eq!(config.error_policy, ErrorPolicy::Lenient);
        assert_eq!(config.dynamodb_endpoint, None);
    }

    #[test]
    fn reads_every_setting() {
        let config = config_from(&[
            (TABLE_NAME_ENV, "addBookmarkEvent"),
            (EVENT_SOURCE_ENV, "custom-source"),
            (EVENT_BUS_ENV, "bookmarks"),
            (ERROR_POLICY_ENV, "Strict"),
            (DYNAMODB_ENDPOINT_ENV, "http://localhost:8000"),
        ]);

        assert_eq!(config.table_name, "addBookmarkEvent");
        assert_eq!(config.event_bus_name, "bookmarks");
        assert_eq!(config.error_policy, ErrorPolicy::Strict);
        assert_eq!(
            config.dynamodb_endpoint.as_deref(),
            Some("http://localhost:8000")
        );
        assert!(config
            .event_rule()
            .matches(Some("custom-source"), "addBookmark"));
    }

    #[test]
    fn unknown_policy_falls_back_to_lenient() {
        let config = config_from(&[(ERROR_POLICY_ENV, "paranoid")]);
        assert_eq!(config.error_policy, ErrorPolicy::Lenient);
    }

    #[test]
    fn blank_optional_values_use_defaults() {
        let config = config_from(&[(EVENT_SOURCE_ENV, "  "), (DYNAMODB_ENDPOINT_ENV, "")]);
        assert_eq!(config.event_source, DEFAULT_EVENT_SOURCE);
        assert_eq!(config.dynamodb_endpoint, None);
    }
}
