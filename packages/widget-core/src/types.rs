//! Core data types for the chat widget and its wire protocol.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn in the conversation.
///
/// Messages are immutable once created; the fields are only exposed through
/// accessors. Older embed scripts stored the role under `type`, which is still
/// accepted when reading a persisted log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    text: String,
    #[serde(alias = "type")]
    role: Role,
    #[serde(serialize_with = "serialize_millis")]
    timestamp: DateTime<Utc>,
}

fn serialize_millis<S: Serializer>(
    timestamp: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl ChatMessage {
    /// Create a message stamped with the current time.
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self::with_timestamp(text, role, Utc::now())
    }

    /// Create a message with an explicit timestamp, kept to millisecond precision.
    pub fn with_timestamp(text: impl Into<String>, role: Role, timestamp: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            role,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    /// Create a user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Role::User)
    }

    /// Create a bot-authored message.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Role::Bot)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Timestamp as an ISO-8601 string with millisecond precision.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

// ============================================================================
// Exchange Types
// ============================================================================

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    /// Context reference handed to the backend alongside the message
    #[serde(default)]
    pub api_spec_url: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, api_spec_url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            api_spec_url: api_spec_url.into(),
        }
    }
}

/// Successful reply from `POST /api/chat`.
///
/// Only `message` is required; the rest is informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ChatReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
            timestamp: None,
            kind: None,
        }
    }
}

/// Payload of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Payload of `GET /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadyStatus {
    pub message: String,
    pub timestamp: String,
}

// ============================================================================
// Widget State
// ============================================================================

/// Transient UI state of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetState {
    pub minimized: bool,
    pub typing_indicator_visible: bool,
    /// Whether the widget is shown at all (see `Widget::show`/`Widget::hide`)
    pub visible: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            minimized: false,
            typing_indicator_visible: false,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_message_serializes_role_lowercase() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let msg = ChatMessage::with_timestamp("Hello", Role::User, ts);
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["text"], "Hello");
        assert_eq!(json["role"], "user");
        assert_eq!(json["timestamp"], "2026-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_message_timestamp_has_millisecond_precision() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let msg = ChatMessage::with_timestamp("Hello", Role::Bot, ts);

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["timestamp"], "2026-01-02T03:04:05.123Z");

        let back: ChatMessage = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.timestamp_iso(), "2026-01-02T03:04:05.123Z");
    }

    #[test]
    fn test_message_accepts_legacy_type_key() {
        let raw = r#"{"text":"Hi","type":"bot","timestamp":"2025-06-01T10:00:00.000Z"}"#;
        let msg: ChatMessage = serde_json::from_str(raw).unwrap();

        assert_eq!(msg.text(), "Hi");
        assert_eq!(msg.role(), Role::Bot);
        assert_eq!(msg.timestamp_iso(), "2025-06-01T10:00:00.000Z");
    }

    #[test]
    fn test_reply_with_only_message() {
        let reply: ChatReply = serde_json::from_str(r#"{"message":"Hi there"}"#).unwrap();
        assert_eq!(reply, ChatReply::new("Hi there"));
    }

    #[test]
    fn test_reply_full_payload() {
        let raw = r#"{"id":1718000000000,"message":"ok","timestamp":"2025-06-10T06:13:20.000Z","type":"bot"}"#;
        let reply: ChatReply = serde_json::from_str(raw).unwrap();

        assert_eq!(reply.id, Some(1718000000000));
        assert_eq!(reply.kind.as_deref(), Some("bot"));
    }

    #[test]
    fn test_reply_without_message_is_rejected() {
        let result = serde_json::from_str::<ChatReply>(r#"{"error":"boom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_widget_state_default() {
        let state = WidgetState::default();
        assert!(!state.minimized);
        assert!(!state.typing_indicator_visible);
        assert!(state.visible);
    }
}
