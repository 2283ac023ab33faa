//! Message envelopes: the unit that is stored in history and broadcast.
//!
//! Wire form (field order is not significant):
//!
//! ```text
//! {"type":"system_message","content":"alice joined the chat","timestamp":"2024-05-01T12:00:00.000000+00:00"}
//! {"type":"chat_message","sender":"alice","content":"hi","timestamp":"2024-05-01T12:00:01.000000+00:00"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value_object::ParticipantName;

/// Tagged, immutable message record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    SystemMessage {
        content: String,
        #[serde(with = "utc_timestamp")]
        timestamp: DateTime<Utc>,
    },
    ChatMessage {
        sender: ParticipantName,
        content: String,
        #[serde(with = "utc_timestamp")]
        timestamp: DateTime<Utc>,
    },
}

impl Envelope {
    pub fn chat(sender: ParticipantName, content: String, timestamp: DateTime<Utc>) -> Self {
        Self::ChatMessage {
            sender,
            content,
            timestamp,
        }
    }

    pub fn system(content: String, timestamp: DateTime<Utc>) -> Self {
        Self::SystemMessage { content, timestamp }
    }

    /// `"<name> joined the chat"`
    pub fn joined(name: &ParticipantName, timestamp: DateTime<Utc>) -> Self {
        Self::system(format!("{} joined the chat", name), timestamp)
    }

    /// `"<name> left the chat"`
    pub fn left(name: &ParticipantName, timestamp: DateTime<Utc>) -> Self {
        Self::system(format!("{} left the chat", name), timestamp)
    }

    pub fn content(&self) -> &str {
        match self {
            Self::SystemMessage { content, .. } | Self::ChatMessage { content, .. } => content,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SystemMessage { timestamp, .. } | Self::ChatMessage { timestamp, .. } => {
                *timestamp
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

mod utc_timestamp {
    use chrono::{DateTime, Utc};
    use engawa_shared::time::{format_utc_timestamp, parse_utc_timestamp};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_utc_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_utc_timestamp(&raw).map_err(D::Error::custom)
    }
}
