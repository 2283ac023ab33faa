//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::Participant;
use engawa_shared::time::format_utc_timestamp;

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthDto {
    pub status: String,
}

/// One live participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub name: String,
    /// RFC 3339, UTC
    pub connected_at: String,
}

impl From<Participant> for ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            name: model.name.into_string(),
            connected_at: format_utc_timestamp(&model.connected_at),
        }
    }
}
