//! UseCase: 接続中の参加者一覧の取得

use std::sync::Arc;

use crate::domain::{Participant, SessionRegistry};

pub struct GetParticipantsUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl GetParticipantsUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    /// 名前順の参加者リスト
    pub async fn execute(&self) -> Vec<Participant> {
        self.registry.participants().await
    }
}
