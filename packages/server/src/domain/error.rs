//! Domain errors.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Name is empty or whitespace only
    #[error("Participant name must not be blank")]
    EmptyName,
}

/// Session registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Another live connection already holds this name
    #[error("Name '{0}' is already taken")]
    AlreadyTaken(String),

    /// Envelope could not be rendered for the wire
    #[error("Failed to serialize envelope: {0}")]
    Serialize(#[from] serde_json::Error),
}
