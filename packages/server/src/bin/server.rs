//! Chat relay server.
//!
//! Participants connect to `/ws/<name>`, receive the recent history and
//! then every message broadcast by anyone in the chat.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin engawa-server
//! cargo run --bin engawa-server -- --host 0.0.0.0 --port 3000 --history-capacity 20
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use engawa_server::{
    config::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEND_TIMEOUT, ServerConfig},
    domain::{DEFAULT_OUTBOX_CAPACITY, SessionRegistry, history::DEFAULT_HISTORY_CAPACITY},
    infrastructure::registry::InMemorySessionRegistry,
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetHistoryUseCase,
        GetParticipantsUseCase, SendMessageUseCase,
    },
};
use engawa_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "engawa-server")]
#[command(about = "WebSocket chat relay with unique names and history replay", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Number of recent messages replayed to new participants
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Timeout in milliseconds for writing one message to a participant
    #[arg(long, default_value_t = DEFAULT_SEND_TIMEOUT.as_millis() as u64)]
    send_timeout_ms: u64,

    /// Messages that may queue for one participant before it is disconnected
    #[arg(long, default_value_t = DEFAULT_OUTBOX_CAPACITY)]
    outbox_capacity: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_PKG_NAME"), env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = match ServerConfig::new(
        args.host,
        args.port,
        args.history_capacity,
        Duration::from_millis(args.send_timeout_ms),
        args.outbox_capacity,
    ) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Registry and clock
    // 2. UseCases
    // 3. Server

    // 1. Create the registry (the only shared state of the relay)
    let registry: Arc<dyn SessionRegistry> =
        Arc::new(InMemorySessionRegistry::new(config.history_capacity));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // 2. Create UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        registry.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(registry.clone(), clock));
    let get_participants_usecase = Arc::new(GetParticipantsUseCase::new(registry.clone()));
    let get_history_usecase = Arc::new(GetHistoryUseCase::new(registry));

    // 3. Create and run the server
    let server = Server::new(
        config,
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        get_participants_usecase,
        get_history_usecase,
    );
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
