//! UseCase: メッセージ送信処理
//!
//! 受信したテキストを `chat_message` エンベロープに包んで全員に配信します。
//! sender は常に接続時に登録された名前であり、クライアントが指定することはできません。

use std::sync::Arc;

use engawa_shared::time::Clock;

use crate::domain::{Envelope, ParticipantName, SessionRegistry};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 接続時に登録された送信者の名前
    /// * `content` - 受信したテキスト（そのまま配信する）
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ParticipantName>)` - 配送先の名前リスト（送信者自身を含む）
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        sender: &ParticipantName,
        content: String,
    ) -> Result<Vec<ParticipantName>, SendMessageError> {
        let envelope = Envelope::chat(sender.clone(), content, self.clock.now());
        self.registry
            .record_and_broadcast(envelope)
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::registry::InMemorySessionRegistry,
        usecase::test_support::{MockClock, at, clock_at},
    };
    use mockall::Sequence;
    use tokio::sync::mpsc;

    fn name(value: &str) -> ParticipantName {
        ParticipantName::new(value.to_string()).unwrap()
    }

    fn received(rx: &mut mpsc::Receiver<String>) -> Vec<Envelope> {
        let mut envelopes = Vec::new();
        while let Ok(raw) = rx.try_recv() {
            envelopes.push(serde_json::from_str(&raw).unwrap());
        }
        envelopes
    }

    #[tokio::test]
    async fn test_send_message_reaches_everyone_including_sender() {
        // テスト項目: alice の "hi" が alice と bob の両方にちょうど 1 回届く
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let (tx_alice, mut rx_alice) = mpsc::channel(64);
        let (tx_bob, mut rx_bob) = mpsc::channel(64);
        registry.admit(name("alice"), tx_alice, at(0)).await.unwrap();
        registry.admit(name("bob"), tx_bob, at(0)).await.unwrap();
        let usecase = SendMessageUseCase::new(registry.clone(), Arc::new(clock_at(3)));

        // when (操作):
        let mut delivered = usecase
            .execute(&name("alice"), "hi".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        let expected = Envelope::chat(name("alice"), "hi".to_string(), at(3));
        delivered.sort();
        assert_eq!(delivered, vec![name("alice"), name("bob")]);
        assert_eq!(received(&mut rx_alice), vec![expected.clone()]);
        assert_eq!(received(&mut rx_bob), vec![expected]);
    }

    #[tokio::test]
    async fn test_send_message_stamps_each_message_with_clock() {
        // テスト項目: 各メッセージに送信時点の時刻が付与される
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let mut clock = MockClock::new();
        let mut seq = Sequence::new();
        clock
            .expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(at(1));
        clock
            .expect_now()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(at(2));
        let usecase = SendMessageUseCase::new(registry.clone(), Arc::new(clock));

        // when (操作):
        usecase
            .execute(&name("alice"), "first".to_string())
            .await
            .unwrap();
        usecase
            .execute(&name("alice"), "second".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        let history = registry.snapshot_history().await;
        let timestamps: Vec<_> = history.iter().map(|e| e.timestamp()).collect();
        assert_eq!(timestamps, vec![at(1), at(2)]);
    }

    #[tokio::test]
    async fn test_send_message_with_no_participants_still_records() {
        // テスト項目: 配送先がいなくても履歴には記録される
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let usecase = SendMessageUseCase::new(registry.clone(), Arc::new(clock_at(0)));

        // when (操作):
        let delivered = usecase
            .execute(&name("ghost"), "echo".to_string())
            .await
            .unwrap();

        // then (期待する結果):
        assert!(delivered.is_empty());
        assert_eq!(registry.snapshot_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_content_is_verbatim() {
        // テスト項目: JSON のように見える本文もそのまま content として扱われる
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(10));
        let usecase = SendMessageUseCase::new(registry.clone(), Arc::new(clock_at(0)));
        let payload = r#"{"sender":"mallory","content":"spoof"}"#.to_string();

        // when (操作):
        usecase
            .execute(&name("alice"), payload.clone())
            .await
            .unwrap();

        // then (期待する結果):
        let history = registry.snapshot_history().await;
        assert_eq!(
            history,
            vec![Envelope::chat(name("alice"), payload, at(0))]
        );
    }
}
