//! Classification of inbound Kuroco change-event webhooks.
//!
//! A webhook body names an event type and a content type; this module
//! turns that into the set of page paths whose cached renderings are
//! stale. Content types are deliberately not validated strictly: unknown
//! types proceed under the default path rules so new CMS content types do
//! not require a deployment.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Content types with dedicated path rules.
pub const KNOWN_CONTENT_TYPES: &[&str] = &["information", "test"];

/// Id value Kuroco sends when it does not know the content id.
const UNKNOWN_ID: &str = "unknown";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("missing event_type")]
    MissingEventType,

    #[error("Unsupported event type: {0}")]
    UnsupportedEventType(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    ContentCreated,
    ContentUpdated,
    ContentDeleted,
}

impl EventType {
    pub fn parse(raw: &str) -> Result<Self, EventError> {
        match raw {
            "content_created" => Ok(Self::ContentCreated),
            "content_updated" => Ok(Self::ContentUpdated),
            "content_deleted" => Ok(Self::ContentDeleted),
            other => Err(EventError::UnsupportedEventType(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentCreated => "content_created",
            Self::ContentUpdated => "content_updated",
            Self::ContentDeleted => "content_deleted",
        }
    }
}

/// A classified change event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationEvent {
    pub event_type: EventType,
    pub content_type: String,
    pub content_id: Option<String>,
    pub category_id: Option<String>,
}

impl RevalidationEvent {
    /// Parse a webhook body.
    ///
    /// String fields may arrive wrapped in one redundant pair of quote
    /// characters (an upstream serialization quirk); they are unwrapped
    /// before classification.
    pub fn from_json(body: &Value) -> Result<Self, EventError> {
        let event_type = match field_str(body, "event_type") {
            Some(raw) => EventType::parse(&raw)?,
            None => return Err(EventError::MissingEventType),
        };

        let content_type = field_str(body, "content_type").unwrap_or_default();
        if !KNOWN_CONTENT_TYPES.contains(&content_type.as_str()) {
            warn!(content_type = %content_type, "unknown content type, proceeding with default rules");
        }

        // Created/updated events describe the new revision; deletions the
        // removed one.
        let contents_key = match event_type {
            EventType::ContentCreated | EventType::ContentUpdated => "new",
            EventType::ContentDeleted => "deleted",
        };
        let contents = &body["contents"][contents_key];

        let content_id = field_str(contents, "id").filter(|id| !id.is_empty() && id != UNKNOWN_ID);
        let category_id = content_id
            .as_ref()
            .and_then(|_| field_str(contents, "category_id"))
            .filter(|id| !id.is_empty());

        Ok(Self {
            event_type,
            content_type,
            content_id,
            category_id,
        })
    }

    /// Page paths whose cache this event invalidates.
    ///
    /// Known and unknown content types currently share one rule set; the
    /// listing path is always included so index pages pick up the change.
    pub fn affected_paths(&self) -> Vec<String> {
        let mut paths = Vec::with_capacity(3);

        if let Some(id) = &self.content_id {
            paths.push(format!("/web/samplePages/{id}"));
            if let Some(category) = &self.category_id {
                paths.push(format!("/web/samplePages/?category={category}"));
            }
        }
        paths.push("/web/samplePages/".to_string());

        paths
    }
}

/// Read a string field, tolerating numeric values and one redundant pair
/// of wrapping quotes.
fn field_str(value: &Value, key: &str) -> Option<String> {
    match &value[key] {
        Value::String(s) => Some(unquote(s).to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Strip one wrapping pair of double quotes, if present.
pub fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deleted_event_yields_detail_category_and_listing_paths() {
        let body = json!({
            "event_type": "content_deleted",
            "content_type": "information",
            "contents": { "deleted": { "id": "123", "category_id": "9" } }
        });
        let event = RevalidationEvent::from_json(&body).expect("valid event");

        assert_eq!(
            event.affected_paths(),
            vec![
                "/web/samplePages/123",
                "/web/samplePages/?category=9",
                "/web/samplePages/",
            ]
        );
    }

    #[test]
    fn created_event_reads_the_new_revision() {
        let body = json!({
            "event_type": "content_created",
            "content_type": "information",
            "contents": { "new": { "id": 7 } }
        });
        let event = RevalidationEvent::from_json(&body).expect("valid event");

        assert_eq!(event.content_id.as_deref(), Some("7"));
        assert_eq!(
            event.affected_paths(),
            vec!["/web/samplePages/7", "/web/samplePages/"]
        );
    }

    #[test]
    fn unknown_id_falls_back_to_the_listing_path_only() {
        let body = json!({
            "event_type": "content_updated",
            "content_type": "information",
            "contents": { "new": { "id": "unknown", "category_id": "4" } }
        });
        let event = RevalidationEvent::from_json(&body).expect("valid event");

        assert_eq!(event.content_id, None);
        assert_eq!(event.category_id, None);
        assert_eq!(event.affected_paths(), vec!["/web/samplePages/"]);
    }

    #[test]
    fn quote_wrapped_fields_are_unwrapped() {
        let body = json!({
            "event_type": "\"content_updated\"",
            "content_type": "\"test\"",
            "contents": { "new": { "id": "\"55\"" } }
        });
        let event = RevalidationEvent::from_json(&body).expect("valid event");

        assert_eq!(event.event_type, EventType::ContentUpdated);
        assert_eq!(event.content_type, "test");
        assert_eq!(event.content_id.as_deref(), Some("55"));
    }

    #[test]
    fn unrecognized_event_type_is_rejected() {
        let body = json!({ "event_type": "content_published" });

        assert_eq!(
            RevalidationEvent::from_json(&body),
            Err(EventError::UnsupportedEventType("content_published".into()))
        );
    }

    #[test]
    fn missing_event_type_is_rejected() {
        let body = json!({ "content_type": "information" });

        assert_eq!(
            RevalidationEvent::from_json(&body),
            Err(EventError::MissingEventType)
        );
    }

    #[test]
    fn unquote_strips_exactly_one_pair() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("abc"), "abc");
        assert_eq!(unquote("\"\"x\"\""), "\"x\"");
        assert_eq!(unquote("\""), "\"");
    }
}
