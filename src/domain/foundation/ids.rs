//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for one open chat view.
///
/// Used only for log correlation; never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Creates a new random SessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a SessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Identifier of a chatbot in the registry.
///
/// Opaque to the client; only used to build request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatbotId(String);

impl ChatbotId {
    /// Creates a new ChatbotId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("chatbot_id"));
        }
        if trimmed.contains('/') {
            return Err(ValidationError::invalid_format(
                "chatbot_id",
                "must not contain '/'",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatbotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChatbotId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A server-issued token that may arrive as a JSON number or string.
///
/// Serializes back in the same shape it was received in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpaqueToken {
    Number(i64),
    Text(String),
}

impl OpaqueToken {
    /// Returns true if the token carries no usable value.
    pub fn is_blank(&self) -> bool {
        match self {
            OpaqueToken::Number(_) => false,
            OpaqueToken::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for OpaqueToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpaqueToken::Number(n) => write!(f, "{}", n),
            OpaqueToken::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Server-assigned conversation identifier correlating successive turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(OpaqueToken);

impl ConversationId {
    /// Wraps a token received from the backend.
    pub fn from_token(token: OpaqueToken) -> Self {
        Self(token)
    }

    /// Creates a textual conversation id.
    pub fn text(value: impl Into<String>) -> Self {
        Self(OpaqueToken::Text(value.into()))
    }

    /// Creates a numeric conversation id.
    pub fn number(value: i64) -> Self {
        Self(OpaqueToken::Number(value))
    }

    /// Returns the underlying token.
    pub fn as_token(&self) -> &OpaqueToken {
        &self.0
    }

    /// Returns true if the id carries no usable value.
    pub fn is_blank(&self) -> bool {
        self.0.is_blank()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a turn within one session's message log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    /// Literal id reserved for the welcome turn.
    pub const WELCOME: &'static str = "welcome";

    /// Returns the id of the welcome turn.
    pub fn welcome() -> Self {
        Self(Self::WELCOME.to_string())
    }

    /// Builds a locally generated id from a prefix and sequence number.
    pub fn sequenced(prefix: &str, seq: u64) -> Self {
        Self(format!("{}-{}", prefix, seq))
    }

    /// Returns the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the welcome turn id.
    pub fn is_welcome(&self) -> bool {
        self.0 == Self::WELCOME
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TurnId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_generates_unique_values() {
        let id1 = SessionId::new();
        let id2 = SessionId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn session_id_parses_from_string() {
        let id = SessionId::new();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn chatbot_id_rejects_blank() {
        assert!(ChatbotId::new("").is_err());
        assert!(ChatbotId::new("   ").is_err());
    }

    #[test]
    fn chatbot_id_rejects_path_separator() {
        assert!(ChatbotId::new("1/2").is_err());
    }

    #[test]
    fn chatbot_id_trims_whitespace() {
        let id = ChatbotId::new(" 42 ").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn conversation_id_deserializes_from_number() {
        let id: ConversationId = serde_json::from_str("17").unwrap();
        assert_eq!(id, ConversationId::number(17));
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn conversation_id_deserializes_from_string() {
        let id: ConversationId = serde_json::from_str("\"c1\"").unwrap();
        assert_eq!(id, ConversationId::text("c1"));
    }

    #[test]
    fn conversation_id_serializes_in_received_shape() {
        assert_eq!(serde_json::to_string(&ConversationId::number(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&ConversationId::text("c1")).unwrap(),
            "\"c1\""
        );
    }

    #[test]
    fn blank_text_conversation_id_is_blank() {
        assert!(ConversationId::text("  ").is_blank());
        assert!(!ConversationId::number(0).is_blank());
    }

    #[test]
    fn turn_id_sequenced_formats_prefix_and_number() {
        assert_eq!(TurnId::sequenced("user", 3).as_str(), "user-3");
    }

    #[test]
    fn welcome_turn_id_is_recognized() {
        assert!(TurnId::welcome().is_welcome());
        assert!(!TurnId::sequenced("user", 1).is_welcome());
    }
}
