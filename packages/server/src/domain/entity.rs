//! Entities returned by the registry.

use chrono::{DateTime, Utc};

use super::{
    envelope::Envelope,
    value_object::{ConnectionId, ParticipantName},
};

/// A live participant as seen from outside the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: ParticipantName,
    pub connected_at: DateTime<Utc>,
}

/// Result of a successful admission.
#[derive(Debug, Clone)]
pub struct Admission {
    /// Id bound to the new registry entry; required to remove it again
    pub connection_id: ConnectionId,
    /// History as it was at the instant of admission, oldest first
    pub backlog: Vec<Envelope>,
    pub connected_at: DateTime<Utc>,
}
