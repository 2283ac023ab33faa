//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
        GetParticipantsUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{
        http::{get_history, get_participants, health_check},
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(config, connect, disconnect, send_message, participants, history);
/// server.run().await?;
/// ```
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `config` - Bind address and per-connection limits
    /// * `connect_participant_usecase` - UseCase for admission and join announcement
    /// * `disconnect_participant_usecase` - UseCase for departure
    /// * `send_message_usecase` - UseCase for chat relay
    /// * `get_participants_usecase` - UseCase for listing participants
    /// * `get_history_usecase` - UseCase for reading the backlog
    pub fn new(
        config: ServerConfig,
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        get_participants_usecase: Arc<GetParticipantsUseCase>,
        get_history_usecase: Arc<GetHistoryUseCase>,
    ) -> Self {
        let state = Arc::new(AppState {
            connect_participant_usecase,
            disconnect_participant_usecase,
            send_message_usecase,
            get_participants_usecase,
            get_history_usecase,
            send_timeout: config.send_timeout,
            outbox_capacity: config.outbox_capacity,
        });
        Self { config, state }
    }

    /// Build the router with all endpoints
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{name}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(get_participants))
            .route("/api/history", get(get_history))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind to the configured address and serve until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the configured address
    /// or if there's an error during server execution.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = self.config.bind_addr();
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "WebSocket chat relay listening on {} (history capacity {})",
            listener.local_addr()?,
            self.config.history_capacity
        );
        tracing::info!("Connect to: ws://{}/ws/<name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until shutdown
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
