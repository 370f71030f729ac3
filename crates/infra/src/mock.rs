//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのメール送信モック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! todoapp-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoapp_domain::notification::{EmailMessage, NotificationError};

use crate::notification::MailTransport;

// ===== MockMailTransport =====

/// 送信されたメールを記録するモック
///
/// [`rejecting`](MockMailTransport::rejecting) で作成すると、
/// すべての接続を拒否する SMTP サーバーと同様に送信が失敗する。
/// 失敗した送信は記録しない。
#[derive(Clone, Default)]
pub struct MockMailTransport {
    sent_emails: Arc<Mutex<Vec<EmailMessage>>>,
    attempts:    Arc<Mutex<usize>>,
    reject:      bool,
}

impl MockMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// すべての送信を失敗させるモックを作成する
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    /// 送信に成功したメールを送信順で返す
    pub fn sent_emails(&self) -> Vec<EmailMessage> {
        self.sent_emails.lock().unwrap().clone()
    }

    /// 配送を試みた回数（失敗を含む）
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MailTransport for MockMailTransport {
    async fn deliver(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        *self.attempts.lock().unwrap() += 1;
        if self.reject {
            return Err(NotificationError::SendFailed(
                "Connection refused (mock)".to_string(),
            ));
        }
        self.sent_emails.lock().unwrap().push(email.clone());
        Ok(())
    }
}
