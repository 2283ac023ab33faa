//! Logging setup utilities for the Engawa relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// `RUST_LOG` takes precedence when it is set. Otherwise both the calling
/// crate and the binary log at `default_log_level`.
///
/// # Arguments
///
/// * `crate_name` - The library crate to enable (e.g., "engawa_server")
/// * `binary_name` - The name of the binary (e.g., "engawa-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use engawa_shared::logger::setup_logger;
///
/// setup_logger("engawa_server", "engawa-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
///
/// Target names use underscores, so dashes in either name are normalized.
pub fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_dashes() {
        // テスト項目: クレート名とバイナリ名のハイフンがアンダースコアに変換される
        // given (前提条件):
        let crate_name = "engawa-server";
        let binary_name = "engawa-server";

        // when (操作):
        let filter = default_filter(crate_name, binary_name, "info");

        // then (期待する結果):
        assert_eq!(
            filter,
            "engawa_server=info,engawa_server=info,tower_http=info"
        );
    }

    #[test]
    fn test_default_filter_uses_given_level() {
        // テスト項目: 指定したログレベルが全てのターゲットに適用される
        // given (前提条件):
        let level = "warn";

        // when (操作):
        let filter = default_filter("engawa_server", "relay", level);

        // then (期待する結果):
        assert!(filter.contains("engawa_server=warn"));
        assert!(filter.contains("relay=warn"));
        assert!(filter.contains("tower_http=warn"));
    }
}
