//! # 宛先解決
//!
//! 通知イベントから送信先メールアドレスを決定する。
//!
//! 名前付きの通知操作は常に対象人物 1 名宛てで、CC / BCC は付与しない。
//! 複数宛先が必要な場合は `TodoNotificationService::send_custom` を使う。

use todoapp_domain::notification::{NotificationError, TodoNotification};

/// 通知イベントの送信先メールアドレスを返す
///
/// # エラー
///
/// 対象人物のメールアドレスが空の場合は `InvalidRecipient`。
/// `Email` 値オブジェクトは空文字列を許さないため、通常は発生しない。
pub fn resolve_recipient(notification: &TodoNotification<'_>) -> Result<String, NotificationError> {
    let recipient = notification.recipient();
    let email = recipient.email().as_str();

    if email.trim().is_empty() {
        return Err(NotificationError::InvalidRecipient(format!(
            "{} 通知の宛先メールアドレスが空です",
            notification.event_type()
        )));
    }

    Ok(email.to_string())
}
