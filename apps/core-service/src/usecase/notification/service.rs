//! # 通知サービス
//!
//! テンプレートレンダリング → 宛先解決 → メール送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **bool を返す**: 各操作は送信の成否を返し、エラーを伝播しない
//! - **1 回の送信試行**: リトライ・キュー・バックグラウンドタスクは持たない
//! - **依存性注入**: `MailTransport` は trait で抽象化
//! - **ビジネスイベントログ**: 成功・失敗どちらも `log_business_event!` で記録

use std::sync::Arc;

use todoapp_domain::{
    notification::{EmailMessage, NotificationError, TodoNotification},
    person::Person,
    todo::Todo,
};
use todoapp_infra::notification::MailTransport;
use todoapp_shared::{
    event_log::{error, event},
    log_business_event,
};

use super::{TemplateRenderer, resolve_recipient};

/// Todo 通知サービス
///
/// Todo の状態変化に応じたメール通知の全体フローを統合する。
/// 内部状態は生成後に変更されないため、複数タスクから同時に呼び出せる。
pub struct TodoNotificationService {
    transport:         Arc<dyn MailTransport>,
    template_renderer: TemplateRenderer,
}

impl TodoNotificationService {
    pub fn new(transport: Arc<dyn MailTransport>, template_renderer: TemplateRenderer) -> Self {
        Self {
            transport,
            template_renderer,
        }
    }

    /// Todo 作成を通知する（プレーンテキスト）
    pub async fn notify_created(&self, todo: &Todo, recipient: &Person) -> bool {
        self.notify(TodoNotification::Created { todo, recipient })
            .await
    }

    /// Todo 割り当てを担当者に通知する
    pub async fn notify_assigned(&self, todo: &Todo, assignee: &Person) -> bool {
        self.notify(TodoNotification::Assigned { todo, assignee })
            .await
    }

    /// Todo 完了を通知する
    pub async fn notify_completed(&self, todo: &Todo, recipient: &Person) -> bool {
        self.notify(TodoNotification::Completed { todo, recipient })
            .await
    }

    /// 期限間近のリマインダーを送信する（期限切れの Todo にも送信する）
    pub async fn send_due_date_reminder(&self, todo: &Todo, recipient: &Person) -> bool {
        self.notify(TodoNotification::DueSoon { todo, recipient })
            .await
    }

    /// 日次サマリを送信する
    ///
    /// `todos` は渡された順序のまま表に並ぶ。
    pub async fn send_daily_summary(&self, person: &Person, todos: &[Todo]) -> bool {
        self.notify(TodoNotification::DailySummary { person, todos })
            .await
    }

    /// 通知を送信する
    ///
    /// テンプレートレンダリング → 宛先解決 → メール送信を行う。
    /// いずれのステップで失敗しても `false` を返すだけで、エラーは伝播しない。
    pub async fn notify(&self, notification: TodoNotification<'_>) -> bool {
        let event_type = notification.event_type();
        let event_type_str: &str = event_type.into();

        // テンプレートレンダリング
        let content = match self.template_renderer.render(&notification) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(
                    error.category = error::category::PROGRAMMING,
                    error.kind = error::kind::TEMPLATE,
                    error = %e,
                    event_type = event_type_str,
                    "通知テンプレートのレンダリングに失敗"
                );
                return false;
            }
        };

        // 宛先解決
        let to = match resolve_recipient(&notification) {
            Ok(to) => to,
            Err(e) => {
                log_invalid_recipient(&e, event_type_str);
                return false;
            }
        };

        let email = EmailMessage {
            to,
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: content.subject,
            body: content.body,
            format: content.format,
            attachment: None,
        };

        self.deliver(&email, event_type_str).await
    }

    /// 任意のメッセージを送信する
    ///
    /// CC / BCC / 添付ファイルを指定できる汎用経路。
    /// 空の宛先が含まれる場合は送信せずに `false` を返す。
    pub async fn send_custom(&self, email: EmailMessage) -> bool {
        if let Err(e) = email.ensure_recipients() {
            log_invalid_recipient(&e, "custom");
            return false;
        }

        self.deliver(&email, "custom").await
    }

    async fn deliver(&self, email: &EmailMessage, event_type: &str) -> bool {
        match self.transport.deliver(email).await {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.entity_type = event::entity_type::EMAIL,
                    event.result = event::result::SUCCESS,
                    notification.event_type = event_type,
                    notification.recipient = %email.to,
                    notification.subject = %email.subject,
                    "通知メール送信成功"
                );
                true
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.entity_type = event::entity_type::EMAIL,
                    event.result = event::result::FAILURE,
                    notification.event_type = event_type,
                    notification.recipient = %email.to,
                    notification.subject = %email.subject,
                    error.category = error::category::EXTERNAL_SERVICE,
                    error.kind = error::kind::MAIL_TRANSPORT,
                    error = %e,
                    "通知メール送信失敗"
                );
                false
            }
        }
    }
}

fn log_invalid_recipient(e: &NotificationError, event_type: &str) {
    tracing::error!(
        error.category = error::category::PROGRAMMING,
        error.kind = error::kind::RECIPIENT,
        error = %e,
        event_type,
        "通知の宛先が不正"
    );
}
