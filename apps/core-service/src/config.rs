//! # Core Service 設定
//!
//! 環境変数から Core Service サーバーの設定を読み込む。
//!
//! 不正な値は [`ConfigError`] として返し、起動を中止する。

use std::{env, time::Duration};

use thiserror::Error;
use todoapp_infra::notification::{DEFAULT_TIMEOUT, Sender, SmtpCredentials, SmtpSettings};

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 値の形式が不正
    #[error("{key} の値が不正です: {value}")]
    InvalidValue { key: &'static str, value: String },

    /// 必須の値が未設定
    #[error("{key} が設定されていません（{reason}）")]
    Missing {
        key:    &'static str,
        reason: &'static str,
    },
}

/// Core Service サーバーの設定
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// バインドアドレス
    pub host:         String,
    /// ポート番号
    pub port:         u16,
    /// 起動時にデモデータを投入するか
    pub seed_demo:    bool,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    /// SMTP サーバー経由で送信
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

impl NotificationBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Noop => "noop",
        }
    }
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える:
/// - `smtp`: Mailpit（開発）/ SMTP サーバー経由で送信
/// - `noop`: 送信しない（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// 送信バックエンド
    pub backend: NotificationBackend,
    /// SMTP 接続設定（backend=smtp の場合に使用）
    pub smtp:    SmtpSettings,
    /// 送信元
    pub sender:  Sender,
}

impl CoreConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意の参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host:         lookup("CORE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port:         parse_or("CORE_PORT", &lookup, 3001)?,
            seed_demo:    parse_bool_or("SEED_DEMO_DATA", &lookup, true)?,
            notification: NotificationConfig::from_lookup(&lookup)?,
        })
    }
}

impl NotificationConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("NOTIFICATION_BACKEND").as_deref() {
            None | Some("noop") => NotificationBackend::Noop,
            Some("smtp") => NotificationBackend::Smtp,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key:   "NOTIFICATION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let auth = parse_bool_or("SMTP_AUTH", lookup, false)?;
        let credentials = if auth {
            let username = non_empty(lookup("SMTP_USERNAME")).ok_or(ConfigError::Missing {
                key:    "SMTP_USERNAME",
                reason: "SMTP_AUTH=true の場合は必須",
            })?;
            let password = non_empty(lookup("SMTP_PASSWORD")).ok_or(ConfigError::Missing {
                key:    "SMTP_PASSWORD",
                reason: "SMTP_AUTH=true の場合は必須",
            })?;
            Some(SmtpCredentials { username, password })
        } else {
            None
        };

        let timeout_secs = parse_or("SMTP_TIMEOUT_SECS", lookup, DEFAULT_TIMEOUT.as_secs())?;

        Ok(Self {
            backend,
            smtp: SmtpSettings {
                host: lookup("SMTP_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: parse_or("SMTP_PORT", lookup, 1025)?,
                credentials,
                starttls: parse_bool_or("SMTP_STARTTLS", lookup, false)?,
                timeout: Duration::from_secs(timeout_secs),
            },
            sender: Sender::new(
                lookup("MAIL_FROM_ADDRESS")
                    .unwrap_or_else(|| "noreply@todoapp.example.com".to_string()),
                lookup("MAIL_FROM_NAME").unwrap_or_else(|| "Todo App".to_string()),
            ),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

fn parse_bool_or(
    key: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
    }
}
