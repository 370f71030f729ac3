//! # ビジネスイベントログとエラーコンテキストの構造化ヘルパー
//!
//! `jq` で効率的に調査できるよう、ログフィールドの命名規約とヘルパーマクロを提供する。
//!
//! ## ビジネスイベント
//!
//! [`log_business_event!`] マクロで出力する。`event.kind = "business_event"` マーカーが
//! 自動付与され、`jq 'select(.["event.kind"] == "business_event")'` でフィルタできる。
//!
//! ## エラーコンテキスト
//!
//! 既存の `tracing::error!` に `error.category` + `error.kind` フィールドを直接追加する。
//! 定数は [`error`] モジュールで提供。
//!
//! ## フィールド命名規約
//!
//! ドット記法（`event.category`、`error.kind`）を使用。tracing の
//! `$($field:ident).+` パターンでサポートされ、JSON 出力でフラットなキーになる。

/// ビジネスイベントを構造化ログとして出力する。
///
/// `event.kind = "business_event"` マーカーを自動付与し、
/// `tracing::info!` レベルで出力する。
///
/// ## 必須フィールド（慣例）
///
/// - `event.category`: イベントカテゴリ（[`event::category`] の定数を使用）
/// - `event.action`: アクション名（[`event::action`] の定数を使用）
/// - `event.result`: 結果（[`event::result`] の定数を使用）
///
/// ## 推奨フィールド
///
/// - `event.entity_type`: エンティティ種別（[`event::entity_type`] の定数を使用）
/// - `event.entity_id`: エンティティ ID
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const TODO: &str = "todo";
        pub const NOTIFICATION: &str = "notification";
    }

    /// イベントアクション
    pub mod action {
        // Todo
        pub const TODO_CREATED: &str = "todo.created";
        pub const TODO_ASSIGNED: &str = "todo.assigned";
        pub const TODO_COMPLETED: &str = "todo.completed";

        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_FAILED: &str = "notification.failed";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const TODO: &str = "todo";
        pub const EMAIL: &str = "email";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// 外部サービス呼び出し（SMTP サーバー）
        pub const EXTERNAL_SERVICE: &str = "external_service";
        /// 呼び出し側の契約違反（空の宛先など）
        pub const PROGRAMMING: &str = "programming";
    }

    /// エラー種別
    pub mod kind {
        pub const TEMPLATE: &str = "template";
        pub const RECIPIENT: &str = "recipient";
        pub const MAIL_TRANSPORT: &str = "mail_transport";
    }
}

#[cfg(test)]
mod tests {
    use super::event;

    #[test]
    fn test_通知アクションはカテゴリ名で始まる() {
        assert!(
            event::action::NOTIFICATION_SENT.starts_with(event::category::NOTIFICATION)
        );
        assert!(
            event::action::NOTIFICATION_FAILED.starts_with(event::category::NOTIFICATION)
        );
    }

    #[test]
    fn test_todoアクションはカテゴリ名で始まる() {
        for action in [
            event::action::TODO_CREATED,
            event::action::TODO_ASSIGNED,
            event::action::TODO_COMPLETED,
        ] {
            assert!(action.starts_with(event::category::TODO), "{action}");
        }
    }
}
