//! UseCase errors.

use thiserror::Error;

/// Errors while admitting a participant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// Name is held by another live connection
    #[error("Username '{0}' is already taken.")]
    DuplicateName(String),

    #[error("Failed to broadcast join announcement: {0}")]
    BroadcastFailed(String),
}

/// Errors while relaying a chat message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Failed to broadcast message: {0}")]
    BroadcastFailed(String),
}

/// Errors while running the departure sequence
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    #[error("Failed to broadcast leave announcement: {0}")]
    BroadcastFailed(String),
}
