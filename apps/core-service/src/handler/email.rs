//! # メール送信テスト API ハンドラ
//!
//! 開発環境でメール送信経路を手動確認するためのエンドポイント。
//! Mailpit などのローカル SMTP サーバーと組み合わせて使う。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /api/email/test-simple?email=...
//! GET /api/email/test-html?email=...
//! GET /api/email/test-assignment
//! GET /api/email/test-summary
//! ```
//!
//! 送信成功は 200、送信失敗は 500、対象データがない場合は 404 を返す。

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use todoapp_infra::{
    MailTransport,
    repository::{PersonRepository, TodoRepository},
};

use crate::{error::CoreError, usecase::TodoNotificationService};

const SIMPLE_SUBJECT: &str = "Test Email from Todo App";
const SIMPLE_BODY: &str = "Hello! This is a test email from your Todo Application. \
                           If you receive this, your email service is working correctly!";
const HTML_SUBJECT: &str = "HTML Test Email";
const HTML_BODY: &str = "<html><body>\
                         <h1 style='color: #4CAF50;'>Hello from Todo App!</h1>\
                         <p>This is an <strong>HTML</strong> email with <em>formatting</em>.</p>\
                         <ul><li>Feature 1</li><li>Feature 2</li><li>Feature 3</li></ul>\
                         </body></html>";

/// メール送信テストハンドラーの State
pub struct EmailState<P, T> {
    pub transport:    Arc<dyn MailTransport>,
    pub notification: Arc<TodoNotificationService>,
    pub person_repo:  P,
    pub todo_repo:    T,
}

/// 送信先クエリパラメータ
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// GET /api/email/test-simple
///
/// プレーンテキストのテストメールを送信する。
pub async fn test_simple_email<P, T>(
    State(state): State<Arc<EmailState<P, T>>>,
    Query(query): Query<EmailQuery>,
) -> Response
where
    P: PersonRepository,
    T: TodoRepository,
{
    let sent = state
        .transport
        .send_plain(&query.email, SIMPLE_SUBJECT, SIMPLE_BODY)
        .await;

    send_result(
        sent,
        format!("✅ Email sent successfully to {}", query.email),
        "❌ Failed to send email",
    )
}

/// GET /api/email/test-html
///
/// HTML のテストメールを送信する。
pub async fn test_html_email<P, T>(
    State(state): State<Arc<EmailState<P, T>>>,
    Query(query): Query<EmailQuery>,
) -> Response
where
    P: PersonRepository,
    T: TodoRepository,
{
    let sent = state
        .transport
        .send_html(&query.email, HTML_SUBJECT, HTML_BODY)
        .await;

    send_result(
        sent,
        format!("✅ HTML email sent successfully to {}", query.email),
        "❌ Failed to send HTML email",
    )
}

/// GET /api/email/test-assignment
///
/// 最初の人物に、最初の未完了 Todo の割り当て通知を送信する。
pub async fn test_assignment_notification<P, T>(
    State(state): State<Arc<EmailState<P, T>>>,
) -> Result<Response, CoreError>
where
    P: PersonRepository,
    T: TodoRepository,
{
    let person = state
        .person_repo
        .find_all()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NotFound("人物が登録されていません".to_string()))?;

    let todo = state
        .todo_repo
        .find_by_completed(false)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NotFound("未完了の Todo がありません".to_string()))?;

    let sent = state.notification.notify_assigned(&todo, &person).await;

    Ok(send_result(
        sent,
        format!("✅ Assignment notification sent to {}", person.email()),
        "❌ Failed to send notification",
    ))
}

/// GET /api/email/test-summary
///
/// 最初の人物に、その人物が担当する Todo の日次サマリを送信する。
pub async fn test_daily_summary<P, T>(
    State(state): State<Arc<EmailState<P, T>>>,
) -> Result<Response, CoreError>
where
    P: PersonRepository,
    T: TodoRepository,
{
    let person = state
        .person_repo
        .find_all()
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| CoreError::NotFound("人物が登録されていません".to_string()))?;

    let todos = state.todo_repo.find_by_assigned_to(person.id()).await?;
    let sent = state.notification.send_daily_summary(&person, &todos).await;

    Ok(send_result(
        sent,
        format!("✅ Daily summary sent to {}", person.email()),
        "❌ Failed to send summary",
    ))
}

fn send_result(sent: bool, success: String, failure: &'static str) -> Response {
    if sent {
        (StatusCode::OK, success).into_response()
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, failure).into_response()
    }
}
