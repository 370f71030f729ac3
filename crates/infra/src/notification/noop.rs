//! Noop メール送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! 通知無効化時（`NOTIFICATION_BACKEND=noop`）に使用する。

use async_trait::async_trait;
use todoapp_domain::notification::{EmailMessage, NotificationError};

use super::MailTransport;

/// Noop メール送信（ログ出力のみ）
#[derive(Debug, Clone, Default)]
pub struct NoopMailTransport;

#[async_trait]
impl MailTransport for NoopMailTransport {
    async fn deliver(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            format = %email.format,
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
