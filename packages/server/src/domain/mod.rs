//! Domain layer: value objects, envelopes, history and the registry seam.

pub mod entity;
pub mod envelope;
pub mod error;
pub mod history;
pub mod registry;
pub mod value_object;

pub use entity::{Admission, Participant};
pub use envelope::Envelope;
pub use error::{RegistryError, ValueObjectError};
pub use history::MessageHistory;
pub use registry::{DEFAULT_OUTBOX_CAPACITY, Outbox, SessionRegistry};
pub use value_object::{ConnectionId, ParticipantName};
