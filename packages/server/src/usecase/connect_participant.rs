//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() と announce_joined()
//!
//! ### なぜこのテストが必要か
//! - 重複した名前を拒否し、拒否時に状態を一切変更しないことを保証
//! - 参加通知が履歴に記録され、新規参加者自身にも届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続、バックログの受け取り
//! - 異常系：使用中の名前での接続試行

use std::sync::Arc;

use engawa_shared::time::Clock;

use crate::domain::{Admission, Envelope, Outbox, ParticipantName, RegistryError, SessionRegistry};

use super::error::ConnectError;

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn SessionRegistry>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// 参加者を登録する
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - 登録成功（接続 ID と再生用バックログ）
    /// * `Err(ConnectError::DuplicateName)` - 名前が使用中
    pub async fn execute(
        &self,
        name: ParticipantName,
        outbox: Outbox,
    ) -> Result<Admission, ConnectError> {
        let connected_at = self.clock.now();
        match self.registry.admit(name, outbox, connected_at).await {
            Ok(admission) => Ok(admission),
            Err(RegistryError::AlreadyTaken(name)) => Err(ConnectError::DuplicateName(name)),
            Err(e) => Err(ConnectError::BroadcastFailed(e.to_string())),
        }
    }

    /// 参加通知 `"<name> joined the chat"` を記録して全員に配信する
    ///
    /// バックログの再生が終わってから呼び出すこと。
    pub async fn announce_joined(
        &self,
        name: &ParticipantName,
    ) -> Result<Vec<ParticipantName>, ConnectError> {
        let envelope = Envelope::joined(name, self.clock.now());
        self.registry
            .record_and_broadcast(envelope)
            .await
            .map_err(|e| ConnectError::BroadcastFailed(e.to_string()))
    }
}
