//! Session registry trait.
//!
//! The registry is the only shared mutable state of the relay: the set of
//! live participants and the message backlog. Use cases depend on this
//! trait; `infrastructure::registry` provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::{
    entity::{Admission, Participant},
    envelope::Envelope,
    error::RegistryError,
    value_object::{ConnectionId, ParticipantName},
};

/// Outbound queue of one connection; carries serialized envelopes.
///
/// Bounded: a recipient whose queue is full is cut off instead of
/// buffering without limit.
pub type Outbox = mpsc::Sender<String>;

/// Default number of envelopes that may wait in one outbox
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Register `name` with its outbox.
    ///
    /// Check and insert happen atomically, and the returned backlog is taken
    /// in the same critical section, so every envelope recorded afterwards
    /// reaches the new outbox and none recorded before it does.
    async fn admit(
        &self,
        name: ParticipantName,
        outbox: Outbox,
        connected_at: DateTime<Utc>,
    ) -> Result<Admission, RegistryError>;

    /// Remove `name` if it is still bound to `connection_id`.
    ///
    /// Returns `true` when an entry was removed. Idempotent.
    async fn remove(&self, name: &ParticipantName, connection_id: ConnectionId) -> bool;

    /// Append to history and enqueue the envelope for every live participant.
    ///
    /// Enqueueing never waits. A participant whose outbox is full has its
    /// outbox closed, so its writer drains what is queued and the session
    /// ends. Returns the names the envelope was handed to.
    async fn record_and_broadcast(
        &self,
        envelope: Envelope,
    ) -> Result<Vec<ParticipantName>, RegistryError>;

    /// Backlog, oldest first
    async fn snapshot_history(&self) -> Vec<Envelope>;

    /// Live participants sorted by name
    async fn participants(&self) -> Vec<Participant>;
}
