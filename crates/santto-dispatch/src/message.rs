//! Outbound order messages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Immutable snapshot of one order ready for hand-off.
///
/// Owns its text: editing the cart after `submit` cannot change a message
/// already built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    id: String,
    destination: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl OutboundMessage {
    /// `destination` is expected already normalized (digits only).
    pub fn new(destination: impl Into<String>, text: impl Into<String>) -> Self {
        OutboundMessage {
            id: Uuid::new_v4().to_string(),
            destination: destination.into(),
            text: text.into(),
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_message_gets_its_own_id() {
        let a = OutboundMessage::new("5591984497134", "pedido");
        let b = OutboundMessage::new("5591984497134", "pedido");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.text(), b.text());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(OutboundMessage::new("5591984497134", "oi")).unwrap();
        assert_eq!(json["destination"], "5591984497134");
        assert!(json.get("createdAt").is_some());
    }
}
