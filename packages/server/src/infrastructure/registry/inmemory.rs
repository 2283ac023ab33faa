//! InMemory SessionRegistry 実装
//!
//! 参加者マップと履歴を 1 つの `Mutex` で保護します。
//! admit / remove / record_and_broadcast は互いに排他的に実行されるため、
//!
//! - 同じ名前の同時 admit は片方しか成功しない
//! - 全ての参加者は記録された順序でエンベロープを受け取る
//!
//! 配送は各接続の有界キュー（`Outbox`）に `try_send` で積むだけでブロックしません。
//! キューが満杯の参加者は outbox を閉じて以降の配送対象から外します。
//! ソケットへの書き込みは接続ごとの writer タスクが担当します。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{
    Admission, ConnectionId, Envelope, MessageHistory, Outbox, Participant, ParticipantName,
    RegistryError, SessionRegistry, history::DEFAULT_HISTORY_CAPACITY,
};

/// 登録済みの接続
struct Entry {
    connection_id: ConnectionId,
    /// 満杯で切り離された後は `None`
    outbox: Option<Outbox>,
    connected_at: DateTime<Utc>,
}

struct RegistryState {
    participants: HashMap<ParticipantName, Entry>,
    history: MessageHistory,
}

/// インメモリ SessionRegistry 実装
pub struct InMemorySessionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemorySessionRegistry {
    /// 履歴容量を指定して作成
    pub fn new(history_capacity: usize) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                participants: HashMap::new(),
                history: MessageHistory::new(history_capacity),
            }),
        }
    }
}

impl Default for InMemorySessionRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn admit(
        &self,
        name: ParticipantName,
        outbox: Outbox,
        connected_at: DateTime<Utc>,
    ) -> Result<Admission, RegistryError> {
        let mut state = self.state.lock().await;

        if state.participants.contains_key(&name) {
            return Err(RegistryError::AlreadyTaken(name.into_string()));
        }

        let connection_id = ConnectionId::generate();
        let backlog = state.history.snapshot();
        state.participants.insert(
            name.clone(),
            Entry {
                connection_id,
                outbox: Some(outbox),
                connected_at,
            },
        );
        tracing::debug!(
            "Participant '{}' admitted as connection {} ({} backlog entries)",
            name,
            connection_id,
            backlog.len()
        );

        Ok(Admission {
            connection_id,
            backlog,
            connected_at,
        })
    }

    async fn remove(&self, name: &ParticipantName, connection_id: ConnectionId) -> bool {
        let mut state = self.state.lock().await;

        match state.participants.get(name) {
            Some(entry) if entry.connection_id == connection_id => {
                state.participants.remove(name);
                tracing::debug!("Participant '{}' removed from registry", name);
                true
            }
            Some(_) => {
                tracing::debug!(
                    "Participant '{}' is held by another connection, not removing",
                    name
                );
                false
            }
            None => false,
        }
    }

    async fn record_and_broadcast(
        &self,
        envelope: Envelope,
    ) -> Result<Vec<ParticipantName>, RegistryError> {
        let json = envelope.to_json()?;

        let mut state = self.state.lock().await;
        state.history.push(envelope);

        let mut delivered = Vec::with_capacity(state.participants.len());
        for (name, entry) in state.participants.iter_mut() {
            let Some(outbox) = entry.outbox.as_ref() else {
                continue;
            };
            // 一部の送信失敗は許容してブロードキャストを続ける
            match outbox.try_send(json.clone()) {
                Ok(()) => delivered.push(name.clone()),
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        "Outbox of '{}' is full, closing it and dropping the connection",
                        name
                    );
                    // sender を落とすと writer はキューを書き切ってから終了する
                    entry.outbox = None;
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::warn!("Failed to push envelope to '{}': outbox closed", name);
                }
            }
        }
        tracing::debug!("Broadcasted envelope to {} participant(s)", delivered.len());

        Ok(delivered)
    }

    async fn snapshot_history(&self) -> Vec<Envelope> {
        let state = self.state.lock().await;
        state.history.snapshot()
    }

    async fn participants(&self) -> Vec<Participant> {
        let state = self.state.lock().await;
        let mut participants: Vec<Participant> = state
            .participants
            .iter()
            .map(|(name, entry)| Participant {
                name: name.clone(),
                connected_at: entry.connected_at,
            })
            .collect();

        // Sort by name for consistent ordering
        participants.sort_by(|a, b| a.name.cmp(&b.name));

        participants
    }
}
