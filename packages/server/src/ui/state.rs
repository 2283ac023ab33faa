//! Server state shared by all handlers.

use std::{sync::Arc, time::Duration};

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
    GetParticipantsUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    /// Upper bound for writing one frame to a socket
    pub send_timeout: Duration,
    /// Capacity of each connection's outbox
    pub outbox_capacity: usize,
}
