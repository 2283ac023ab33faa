//! UseCase layer: the session state machine split into its steps.

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_history;
mod get_participants;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{ConnectError, DisconnectError, SendMessageError};
pub use get_history::GetHistoryUseCase;
pub use get_participants::GetParticipantsUseCase;
pub use send_message::SendMessageUseCase;
