//! # トレーシング初期化
//!
//! `LOG_FORMAT` で JSON / Pretty 出力を切り替え、`RUST_LOG` でレベルを制御する。
//! 通知の送信結果は `log_business_event!` で出力されるため、本番では JSON 出力を
//! `jq` で絞り込む運用を想定している。

/// `RUST_LOG` 未設定時のフィルタ（`todoapp_*` クレートは debug まで出力する）
pub const DEFAULT_FILTER: &str = "info,todoapp=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（本番環境向け）
    Json,
    /// 人間が読みやすい形式（開発環境向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 大文字小文字を区別せずに解釈する。未知の値は `None`。
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if value.eq_ignore_ascii_case("pretty") {
            Some(Self::Pretty)
        } else {
            None
        }
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub service_name:       String,
    pub log_format:         LogFormat,
    /// 解釈できなかった `LOG_FORMAT` の値。初期化後に警告として出力する。
    pub unknown_log_format: Option<String>,
}

impl TracingConfig {
    /// 環境変数から設定を読み取る
    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::from_lookup(service_name, |key| std::env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み取る
    ///
    /// `LOG_FORMAT` が未設定・空なら Pretty。未知の値も Pretty にフォールバックする。
    pub fn from_lookup(
        service_name: impl Into<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let raw = lookup("LOG_FORMAT").filter(|value| !value.trim().is_empty());
        let (log_format, unknown_log_format) = match raw {
            None => (LogFormat::default(), None),
            Some(value) => match LogFormat::parse(&value) {
                Some(format) => (format, None),
                None => (LogFormat::default(), Some(value)),
            },
        };

        Self {
            service_name: service_name.into(),
            log_format,
            unknown_log_format,
        }
    }
}

/// トレーシングを初期化する
///
/// JSON モードではイベントフィールド（`event.kind`, `event.action` など）が
/// トップレベルに平坦化される。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    if let Some(value) = &config.unknown_log_format {
        tracing::warn!(log_format = %value, "未知の LOG_FORMAT のため pretty で出力する");
    }
    tracing::debug!(
        service = %config.service_name,
        log_format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn config_with(log_format: Option<&str>) -> TracingConfig {
        let log_format = log_format.map(str::to_string);
        TracingConfig::from_lookup("core-service", move |key| {
            (key == "LOG_FORMAT").then(|| log_format.clone()).flatten()
        })
    }

    #[rstest]
    #[case::json("json", Some(LogFormat::Json))]
    #[case::大文字("JSON", Some(LogFormat::Json))]
    #[case::前後の空白(" pretty ", Some(LogFormat::Pretty))]
    #[case::未知の値("yaml", None)]
    fn test_parseは大文字小文字を区別しない(
        #[case] value: &str,
        #[case] expected: Option<LogFormat>,
    ) {
        assert_eq!(LogFormat::parse(value), expected);
    }

    #[test]
    fn test_log_formatが未設定ならprettyになる() {
        let config = config_with(None);

        assert_eq!(config.service_name, "core-service");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.unknown_log_format, None);
    }

    #[test]
    fn test_空のlog_formatは未設定として扱う() {
        assert_eq!(config_with(Some("  ")).unknown_log_format, None);
    }

    #[test]
    fn test_未知のlog_formatはprettyにフォールバックし値を保持する() {
        let config = config_with(Some("yaml"));

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.unknown_log_format.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_jsonを指定するとjson出力になる() {
        assert_eq!(config_with(Some("json")).log_format, LogFormat::Json);
    }
}
