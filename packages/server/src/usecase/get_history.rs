//! UseCase: 履歴（バックログ）の取得

use std::sync::Arc;

use crate::domain::{Envelope, SessionRegistry};

pub struct GetHistoryUseCase {
    registry: Arc<dyn SessionRegistry>,
}

impl GetHistoryUseCase {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> Vec<Envelope> {
        self.registry.snapshot_history().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{infrastructure::registry::InMemorySessionRegistry, usecase::test_support::at};

    #[tokio::test]
    async fn test_get_history_returns_backlog_in_order() {
        // テスト項目: 履歴が古い順に返される
        // given (前提条件):
        let registry = Arc::new(InMemorySessionRegistry::new(2));
        for n in 1..=3 {
            registry
                .record_and_broadcast(Envelope::system(format!("notice {}", n), at(n)))
                .await
                .unwrap();
        }
        let usecase = GetHistoryUseCase::new(registry);

        // when (操作):
        let result = usecase.execute().await;

        // then (期待する結果):
        let contents: Vec<&str> = result.iter().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["notice 2", "notice 3"]);
    }
}
