//! WebSocket connection handlers.
//!
//! One connection runs through `Connecting → Admitted → Active → Closed`:
//!
//! 1. admission: the name from the path is registered, or the socket is
//!    closed with code 1008 and a reason naming the rejected name
//! 2. join: the backlog is written straight to the socket, then the join
//!    announcement is broadcast
//! 3. active: every inbound text frame is broadcast as a chat message
//! 4. closed: deregistration and the leave announcement, on every exit path;
//!    a connection that never announced its join leaves silently

use std::{fmt, sync::Arc, time::Duration};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::{Sink, SinkExt},
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{Envelope, ParticipantName},
    ui::state::AppState,
    usecase::ConnectError,
};

type WsSender = SplitSink<WebSocket, Message>;

/// Reason sent when the claimed name is empty or whitespace only
const BLANK_NAME_REASON: &str = "Username must not be blank.";

/// A close frame payload holds at most 125 bytes, two of them the code.
const MAX_CLOSE_REASON_BYTES: usize = 123;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, name))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, claimed_name: String) {
    let (mut sender, receiver) = socket.split();

    let name = match ParticipantName::new(claimed_name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            reject(&mut sender, BLANK_NAME_REASON.to_string()).await;
            return;
        }
    };

    // Create a channel for this participant to receive broadcasts
    let (tx, rx) = mpsc::channel(state.outbox_capacity);

    let admission = match state
        .connect_participant_usecase
        .execute(name.clone(), tx)
        .await
    {
        Ok(admission) => admission,
        Err(ConnectError::DuplicateName(_)) => {
            tracing::warn!("Name '{}' is already connected. Rejecting connection.", name);
            reject(&mut sender, duplicate_name_reason(name.as_str())).await;
            return;
        }
        Err(e) => {
            tracing::error!("Failed to admit '{}': {}", name, e);
            reject(&mut sender, e.to_string()).await;
            return;
        }
    };
    tracing::info!("Participant '{}' connected and registered", name);

    let announced = run_session(sender, receiver, rx, &state, &name, admission.backlog).await;

    // Departure runs on every exit path once admitted
    if !announced {
        // Nobody saw a join, so nobody gets a leave
        state
            .disconnect_participant_usecase
            .withdraw(&name, admission.connection_id)
            .await;
        tracing::info!("Participant '{}' dropped before joining", name);
        return;
    }
    match state
        .disconnect_participant_usecase
        .execute(&name, admission.connection_id)
        .await
    {
        Ok(notified) => tracing::info!(
            "Participant '{}' disconnected, notified {} participant(s)",
            name,
            notified.len()
        ),
        Err(e) => tracing::warn!("Failed to broadcast leave of '{}': {}", name, e),
    }
}

/// Join sequence and message loop; returns once the connection is gone.
///
/// Returns whether the join announcement was recorded.
async fn run_session(
    mut sender: WsSender,
    receiver: SplitStream<WebSocket>,
    rx: mpsc::Receiver<String>,
    state: &Arc<AppState>,
    name: &ParticipantName,
    backlog: Vec<Envelope>,
) -> bool {
    if let Err(e) = replay_backlog(&mut sender, &backlog, state.send_timeout).await {
        tracing::warn!("Failed to replay history to '{}': {}", name, e);
        return false;
    }
    tracing::debug!("Replayed {} envelope(s) to '{}'", backlog.len(), name);

    // The outbox is drained only after the replay so the backlog comes first
    let mut send_task = pusher_loop(rx, sender, state.send_timeout, name.clone());

    if let Err(e) = state.connect_participant_usecase.announce_joined(name).await {
        tracing::warn!("Failed to broadcast join of '{}': {}", name, e);
        send_task.abort();
        return false;
    }

    let mut recv_task = tokio::spawn(receive_loop(receiver, state.clone(), name.clone()));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    true
}

/// Writes the backlog directly to the socket, oldest first.
async fn replay_backlog<S>(
    sender: &mut S,
    backlog: &[Envelope],
    send_timeout: Duration,
) -> Result<(), String>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    for envelope in backlog {
        let json = envelope.to_json().map_err(|e| e.to_string())?;
        match tokio::time::timeout(send_timeout, sender.send(Message::Text(json.into()))).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e.to_string()),
            Err(_) => return Err(format!("timed out after {:?}", send_timeout)),
        }
    }
    Ok(())
}

/// Spawns the writer task for one connection.
///
/// Broadcasts arrive through `rx` and are written to the socket one by one.
/// A write that does not finish within `send_timeout` ends the task, which
/// ends the session; other connections are never held up by it. The task
/// also ends once the registry closes the outbox and the queue is drained.
fn pusher_loop<S>(
    mut rx: mpsc::Receiver<String>,
    mut sender: S,
    send_timeout: Duration,
    name: ParticipantName,
) -> tokio::task::JoinHandle<()>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: fmt::Display + Send,
{
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match tokio::time::timeout(send_timeout, sender.send(Message::Text(msg.into()))).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("Socket of '{}' closed while sending: {}", name, e);
                    break;
                }
                Err(_) => {
                    tracing::warn!(
                        "Sending to '{}' timed out after {:?}, dropping connection",
                        name,
                        send_timeout
                    );
                    break;
                }
            }
        }
    })
}

/// Reads frames until the peer closes or the transport fails.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    name: ParticipantName,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("WebSocket error from '{}': {}", name, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!("Received text from '{}': {}", name, text);
                if let Err(e) = state
                    .send_message_usecase
                    .execute(&name, text.to_string())
                    .await
                {
                    tracing::warn!("Failed to relay message from '{}': {}", name, e);
                }
            }
            Message::Close(_) => {
                tracing::info!("Participant '{}' requested close", name);
                break;
            }
            // Ping/pong is handled by the WebSocket protocol; binary is ignored
            _ => {}
        }
    }
}

/// `Username '<name>' is already taken.`, with the name shortened to `…`
/// when the whole reason would not fit in a close frame.
fn duplicate_name_reason(name: &str) -> String {
    let reason = ConnectError::DuplicateName(name.to_string()).to_string();
    if reason.len() <= MAX_CLOSE_REASON_BYTES {
        return reason;
    }

    let overhead = reason.len() - name.len() + '…'.len_utf8();
    let mut end = MAX_CLOSE_REASON_BYTES.saturating_sub(overhead);
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    ConnectError::DuplicateName(format!("{}…", &name[..end])).to_string()
}

/// Cut `reason` at a char boundary so it fits in a close frame.
fn fit_close_reason(mut reason: String) -> String {
    if reason.len() > MAX_CLOSE_REASON_BYTES {
        let mut end = MAX_CLOSE_REASON_BYTES;
        while !reason.is_char_boundary(end) {
            end -= 1;
        }
        reason.truncate(end);
    }
    reason
}

/// Closes the socket with a policy-violation code and `reason`.
async fn reject(sender: &mut WsSender, reason: String) {
    let frame = CloseFrame {
        code: close_code::POLICY,
        reason: fit_close_reason(reason).into(),
    };
    if let Err(e) = sender.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}
