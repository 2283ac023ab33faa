//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断後すぐに名前が再利用できることを保証
//! - 退出通知が残りの参加者に届き、履歴に記録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断
//! - エッジケース：既に別の接続が同じ名前を保持している場合

use std::sync::Arc;

use engawa_shared::time::Clock;

use crate::domain::{ConnectionId, Envelope, ParticipantName, SessionRegistry};

use super::error::DisconnectError;

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 参加者を登録解除し、退出通知 `"<name> left the chat"` を配信する
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ParticipantName>)` - 退出通知の配送先（解除済みでなければ空）
    /// * `Err(DisconnectError)` - 通知の配信に失敗
    pub async fn execute(
        &self,
        name: &ParticipantName,
        connection_id: ConnectionId,
    ) -> Result<Vec<ParticipantName>, DisconnectError> {
        if !self.registry.remove(name, connection_id).await {
            tracing::debug!(
                "Connection {} no longer holds '{}', skipping leave announcement",
                connection_id,
                name
            );
            return Ok(Vec::new());
        }

        let envelope = Envelope::left(name, self.clock.now());
        self.registry
            .record_and_broadcast(envelope)
            .await
            .map_err(|e| DisconnectError::BroadcastFailed(e.to_string()))
    }

    /// 参加通知を出す前に終わった接続を、退出通知なしで登録解除する
    ///
    /// 参加通知のない退出通知が他の参加者に届かないようにするため。
    pub async fn withdraw(&self, name: &ParticipantName, connection_id: ConnectionId) -> bool {
        self.registry.remove(name, connection_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::registry::InMemorySessionRegistry,
        usecase::test_support::{at, clock_at},
    };
    use tokio::sync::mpsc;

    fn name(value: &str) -> ParticipantName {
        ParticipantName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 切断した参加者が削除され、残りの参加者に退出通知が届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx_alice, _rx_alice) = mpsc::channel(64);
        let (tx_bob, mut rx_bob) = mpsc::channel(64);
        let alice = registry.admit(name("alice"), tx_alice, at(0)).await.unwrap();
        registry.admit(name("bob"), tx_bob, at(0)).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(registry.clone(), Arc::new(clock_at(9)));

        // when (操作):
        let result = usecase.execute(&name("alice"), alice.connection_id).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![name("bob")]));
        let expected = Envelope::left(&name("alice"), at(9));
        let raw = rx_bob.try_recv().unwrap();
        assert_eq!(serde_json::from_str::<Envelope>(&raw).unwrap(), expected);
        assert_eq!(registry.snapshot_history().await, vec![expected]);
        let participants = registry.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name, name("bob"));
    }

    #[tokio::test]
    async fn test_disconnect_last_participant() {
        // テスト項目: 最後の参加者が切断した場合、配送先は空だが履歴には残る
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx, _rx) = mpsc::channel(64);
        let alice = registry.admit(name("alice"), tx, at(0)).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(registry.clone(), Arc::new(clock_at(1)));

        // when (操作):
        let result = usecase.execute(&name("alice"), alice.connection_id).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
        assert!(registry.participants().await.is_empty());
        assert_eq!(
            registry.snapshot_history().await,
            vec![Envelope::left(&name("alice"), at(1))]
        );
    }

    #[tokio::test]
    async fn test_disconnect_stale_connection_is_noop() {
        // テスト項目: 既に別接続が名前を保持している場合、削除も通知も行わない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx_old, _rx_old) = mpsc::channel(64);
        let old = registry.admit(name("alice"), tx_old, at(0)).await.unwrap();
        registry.remove(&name("alice"), old.connection_id).await;
        let (tx_new, mut rx_new) = mpsc::channel(64);
        registry.admit(name("alice"), tx_new, at(1)).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(registry.clone(), Arc::new(clock_at(2)));

        // when (操作):
        let result = usecase.execute(&name("alice"), old.connection_id).await;

        // then (期待する結果):
        assert_eq!(result, Ok(vec![]));
        assert_eq!(registry.participants().await.len(), 1);
        assert!(registry.snapshot_history().await.is_empty());
        assert!(rx_new.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_withdraw_removes_without_announcement() {
        // テスト項目: withdraw は登録を解除するが、退出通知を配信・記録しない
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx_alice, _rx_alice) = mpsc::channel(64);
        let (tx_bob, mut rx_bob) = mpsc::channel(64);
        let alice = registry.admit(name("alice"), tx_alice, at(0)).await.unwrap();
        registry.admit(name("bob"), tx_bob, at(0)).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(registry.clone(), Arc::new(clock_at(1)));

        // when (操作):
        let removed = usecase.withdraw(&name("alice"), alice.connection_id).await;

        // then (期待する結果):
        assert!(removed);
        let participants = registry.participants().await;
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].name, name("bob"));
        assert!(registry.snapshot_history().await.is_empty());
        assert!(rx_bob.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_name_is_reusable_after_disconnect() {
        // テスト項目: 切断直後に同じ名前で別の接続が登録できる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx1, _rx1) = mpsc::channel(64);
        let first = registry.admit(name("alice"), tx1, at(0)).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(registry.clone(), Arc::new(clock_at(1)));
        usecase
            .execute(&name("alice"), first.connection_id)
            .await
            .unwrap();

        // when (操作):
        let (tx2, _rx2) = mpsc::channel(64);
        let second = registry.admit(name("alice"), tx2, at(2)).await;

        // then (期待する結果):
        let second = second.unwrap();
        assert_ne!(second.connection_id, first.connection_id);
        assert_eq!(second.backlog.len(), 1);
    }
}
