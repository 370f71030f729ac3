//! # メール送信
//!
//! 通知メールの配送を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `MailTransport` trait でメール配送を抽象化
//! - **2 つの実装**: SMTP（Mailpit / SMTP リレー）、Noop（通知無効化時）
//! - **失敗は bool に変換**: `send*` 系メソッドはエラーをログに記録し `false` を返す。
//!   呼び出し元に例外やエラーは伝播しない
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod noop;
mod smtp;

use async_trait::async_trait;
pub use noop::NoopMailTransport;
pub use smtp::{DEFAULT_TIMEOUT, Sender, SmtpCredentials, SmtpMailTransport, SmtpSettings};
use todoapp_domain::notification::{EmailMessage, NotificationError};

/// メール配送トレイト
///
/// 実装は `deliver` のみを提供すればよい。`send` / `send_plain` / `send_html` は
/// `deliver` の結果をログに記録して bool に変換する。
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// メールを 1 回だけ配送する
    ///
    /// リトライは行わない。失敗理由は [`NotificationError`] で返す。
    async fn deliver(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    /// メールを送信し、成否を返す
    ///
    /// 空の宛先が含まれる場合は `deliver` を呼ばずに `false` を返す。
    async fn send(&self, email: &EmailMessage) -> bool {
        if let Err(e) = email.ensure_recipients() {
            tracing::warn!(
                subject = %email.subject,
                error = %e,
                "宛先が不正なためメールを送信しない"
            );
            return false;
        }

        match self.deliver(email).await {
            Ok(()) => {
                tracing::debug!(
                    to = %email.to,
                    subject = %email.subject,
                    "メール送信に成功"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    to = %email.to,
                    subject = %email.subject,
                    error = %e,
                    "メール送信に失敗"
                );
                false
            }
        }
    }

    /// プレーンテキストのメールを送信する
    async fn send_plain(&self, to: &str, subject: &str, body: &str) -> bool {
        self.send(&EmailMessage::plain(to, subject, body)).await
    }

    /// HTML のメールを送信する
    async fn send_html(&self, to: &str, subject: &str, html_body: &str) -> bool {
        self.send(&EmailMessage::html(to, subject, html_body)).await
    }
}
