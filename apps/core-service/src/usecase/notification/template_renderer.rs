//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールの件名と本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **本文形式はイベントで固定**: 作成通知のみプレーンテキスト、他は HTML
//! - **純粋関数**: 同じ入力からは常にバイト単位で同一の出力を生成する。I/O は行わない
//! - **未設定項目のプレースホルダー**: 説明・期限が未設定の場合は固定文言を表示する

use chrono::{DateTime, Utc};
use serde::Serialize;
use tera::{Context, Tera};
use todoapp_domain::{
    notification::{BodyFormat, NotificationError, TodoNotification},
    person::Person,
    todo::Todo,
};

/// 期限の表示形式（例: `Jan 05, 2025 at 14:30`）
const DUE_DATE_FORMAT: &str = "%b %d, %Y at %H:%M";

const NO_DESCRIPTION: &str = "No description";
const NO_DESCRIPTION_PROVIDED: &str = "No description provided";
const NO_DUE_DATE: &str = "No due date";
const NO_DUE_DATE_SET: &str = "No due date set";

/// レンダリング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub subject: String,
    pub body:    String,
    pub format:  BodyFormat,
}

/// 日次サマリの 1 行
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    title:     &'a str,
    due_date:  String,
    status:    &'static str,
    completed: bool,
}

/// 期限を表示用文字列に変換する
pub fn format_due_date(due_date: DateTime<Utc>) -> String {
    due_date.format(DUE_DATE_FORMAT).to_string()
}

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、`TodoNotification` から
/// 件名・本文・本文形式を生成する。
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "created.txt",
                    include_str!("../../../templates/notifications/created.txt"),
                ),
                (
                    "assigned.html",
                    include_str!("../../../templates/notifications/assigned.html"),
                ),
                (
                    "completed.html",
                    include_str!("../../../templates/notifications/completed.html"),
                ),
                (
                    "due_soon.html",
                    include_str!("../../../templates/notifications/due_soon.html"),
                ),
                (
                    "daily_summary.html",
                    include_str!("../../../templates/notifications/daily_summary.html"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 通知イベントから件名と本文を生成する
    pub fn render(
        &self,
        notification: &TodoNotification<'_>,
    ) -> Result<RenderedContent, NotificationError> {
        let (template_name, subject, format, context) = build_template_params(notification);

        let body = self
            .engine
            .render(template_name, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(RenderedContent {
            subject,
            body,
            format,
        })
    }
}

/// テンプレート名、件名、本文形式、コンテキストを構築する
fn build_template_params(
    notification: &TodoNotification<'_>,
) -> (&'static str, String, BodyFormat, Context) {
    let mut context = Context::new();
    context.insert("recipient_name", notification.recipient().name().as_str());

    match *notification {
        TodoNotification::Created { todo, .. } => {
            insert_todo(&mut context, todo, NO_DESCRIPTION, NO_DUE_DATE);
            (
                "created.txt",
                format!("New Task Created: {}", todo.title()),
                BodyFormat::PlainText,
                context,
            )
        }
        TodoNotification::Assigned { todo, .. } => {
            insert_todo(&mut context, todo, NO_DESCRIPTION_PROVIDED, NO_DUE_DATE_SET);
            context.insert(
                "status",
                if todo.is_completed() {
                    "Completed ✅"
                } else {
                    "Pending ⏳"
                },
            );
            (
                "assigned.html",
                format!("Task Assigned to You: {}", todo.title()),
                BodyFormat::Html,
                context,
            )
        }
        TodoNotification::Completed { todo, .. } => {
            insert_todo(&mut context, todo, NO_DESCRIPTION, NO_DUE_DATE);
            (
                "completed.html",
                format!("Task Completed: {}", todo.title()),
                BodyFormat::Html,
                context,
            )
        }
        TodoNotification::DueSoon { todo, .. } => {
            insert_todo(&mut context, todo, NO_DESCRIPTION, NO_DUE_DATE);
            (
                "due_soon.html",
                format!("⚠️ Reminder: Task Due Soon - {}", todo.title()),
                BodyFormat::Html,
                context,
            )
        }
        TodoNotification::DailySummary { person, todos } => {
            let subject = insert_summary(&mut context, person, todos);
            ("daily_summary.html", subject, BodyFormat::Html, context)
        }
    }
}

fn insert_todo(context: &mut Context, todo: &Todo, no_description: &str, no_due_date: &str) {
    context.insert("title", todo.title().as_str());
    context.insert(
        "description",
        todo.description().map_or(no_description, |d| d.as_str()),
    );
    context.insert(
        "due_date",
        &todo
            .due_date()
            .map_or_else(|| no_due_date.to_string(), format_due_date),
    );
}

/// 日次サマリのコンテキストを構築し、件名を返す
fn insert_summary(context: &mut Context, person: &Person, todos: &[Todo]) -> String {
    let rows: Vec<SummaryRow<'_>> = todos
        .iter()
        .map(|todo| SummaryRow {
            title:     todo.title().as_str(),
            due_date:  todo
                .due_date()
                .map_or_else(|| NO_DUE_DATE.to_string(), format_due_date),
            status:    if todo.is_completed() {
                "✅ Done"
            } else {
                "⏳ Pending"
            },
            completed: todo.is_completed(),
        })
        .collect();

    let total = todos.len();
    let completed_count = todos.iter().filter(|t| t.is_completed()).count();
    let pending_count = total - completed_count;

    tracing::debug!(
        recipient = %person.email(),
        total,
        completed_count,
        pending_count,
        "日次サマリを構築"
    );

    context.insert("rows", &rows);
    context.insert("total", &total);
    context.insert("completed_count", &completed_count);
    context.insert("pending_count", &pending_count);

    format!("Daily Todo Summary - {total} Tasks ({pending_count} Pending)")
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use todoapp_domain::{
        notification::NotificationEventType,
        person::{Email, NewPerson, PersonId},
        todo::{NewTodo, TodoId},
        value_objects::{PersonName, TodoDescription, TodoTitle},
    };

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap()
    }

    #[fixture]
    fn renderer() -> TemplateRenderer {
        TemplateRenderer::new().unwrap()
    }

    #[fixture]
    fn alice() -> Person {
        Person::new(NewPerson {
            id:         PersonId::new(),
            name:       PersonName::new("Alice Johnson").unwrap(),
            email:      Email::new("alice@example.com").unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            today:      now().date_naive(),
        })
    }

    fn make_todo(title: &str, description: Option<&str>, due_date: Option<DateTime<Utc>>) -> Todo {
        Todo::new(NewTodo {
            id: TodoId::new(),
            title: TodoTitle::new(title).unwrap(),
            description: description.map(|d| TodoDescription::new(d).unwrap()),
            due_date,
            assigned_to: None,
            now: now(),
        })
    }

    fn due_at_1430() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 14, 30, 0).unwrap()
    }

    #[test]
    fn newが正常に初期化される() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_期限は月名_日_年_時刻の形式で表示する() {
        assert_eq!(format_due_date(due_at_1430()), "Jan 05, 2025 at 14:30");
    }

    #[rstest]
    fn 作成通知はプレーンテキストで描画される(renderer: TemplateRenderer, alice: Person) {
        let todo = make_todo(
            "Buy groceries",
            Some("Milk, eggs, bread"),
            Some(due_at_1430()),
        );

        let content = renderer
            .render(&TodoNotification::Created { todo: &todo, recipient: &alice })
            .unwrap();

        assert_eq!(content.subject, "New Task Created: Buy groceries");
        assert_eq!(content.format, BodyFormat::PlainText);
        assert!(content.body.starts_with("Hello Alice Johnson,"));
        assert!(content.body.contains("Title: Buy groceries"));
        assert!(content.body.contains("Description: Milk, eggs, bread"));
        assert!(content.body.contains("Due Date: Jan 05, 2025 at 14:30"));
        assert!(!content.body.contains("<html>"));
    }

    #[rstest]
    fn 割り当て通知はhtmlで状態を表示する(renderer: TemplateRenderer, alice: Person) {
        let todo = make_todo("Buy groceries", None, None);

        let content = renderer
            .render(&TodoNotification::Assigned { todo: &todo, assignee: &alice })
            .unwrap();

        assert_eq!(content.subject, "Task Assigned to You: Buy groceries");
        assert_eq!(content.format, BodyFormat::Html);
        assert!(content.body.starts_with("<html>"));
        assert!(content.body.contains("Pending ⏳"));
        assert!(content.body.contains("No description provided"));
        assert!(content.body.contains("No due date set"));
    }

    #[rstest]
    fn 完了済みのtodoの割り当て通知は完了状態を表示する(
        renderer: TemplateRenderer,
        alice: Person,
    ) {
        let todo = make_todo("Finish project report", None, None).completed(now());

        let content = renderer
            .render(&TodoNotification::Assigned { todo: &todo, assignee: &alice })
            .unwrap();

        assert!(content.body.contains("Completed ✅"));
    }

    #[rstest]
    fn 完了通知の件名と本文(renderer: TemplateRenderer, alice: Person) {
        let todo = make_todo("Finish project report", Some("Complete the Q4 analysis"), None)
            .completed(now());

        let content = renderer
            .render(&TodoNotification::Completed { todo: &todo, recipient: &alice })
            .unwrap();

        assert_eq!(content.subject, "Task Completed: Finish project report");
        assert_eq!(content.format, BodyFormat::Html);
        assert!(content.body.contains("Complete the Q4 analysis"));
        assert!(content.body.contains("No due date"));
    }

    #[rstest]
    fn 期限間近通知は警告付きの件名と期限を含む(renderer: TemplateRenderer, alice: Person) {
        let todo = make_todo("Call dentist", None, Some(due_at_1430()));

        let content = renderer
            .render(&TodoNotification::DueSoon { todo: &todo, recipient: &alice })
            .unwrap();

        assert_eq!(content.subject, "⚠️ Reminder: Task Due Soon - Call dentist");
        assert!(content.body.contains("Jan 05, 2025 at 14:30"));
        assert!(content.body.contains("No description"));
    }

    #[rstest]
    fn 説明と期限が未設定ならすべての単一todo通知にプレースホルダーが含まれる(
        renderer: TemplateRenderer,
        alice: Person,
    ) {
        let todo = make_todo("Clean garage", None, None);
        let notifications = [
            TodoNotification::Created { todo: &todo, recipient: &alice },
            TodoNotification::Assigned { todo: &todo, assignee: &alice },
            TodoNotification::Completed { todo: &todo, recipient: &alice },
            TodoNotification::DueSoon { todo: &todo, recipient: &alice },
        ];

        for notification in notifications {
            let content = renderer.render(&notification).unwrap();
            assert!(
                content.body.contains("No description"),
                "{}",
                notification.event_type()
            );
            assert!(
                content.body.contains("No due date"),
                "{}",
                notification.event_type()
            );
        }
    }

    #[rstest]
    fn 日次サマリは入力順で行を描画し件数を集計する(renderer: TemplateRenderer, alice: Person) {
        let todos = vec![
            make_todo("Buy groceries", None, Some(due_at_1430())),
            make_todo("Call dentist", None, None).completed(now()),
        ];

        let content = renderer
            .render(&TodoNotification::DailySummary { person: &alice, todos: &todos })
            .unwrap();

        assert_eq!(content.subject, "Daily Todo Summary - 2 Tasks (1 Pending)");
        let groceries = content.body.find("Buy groceries").unwrap();
        let dentist = content.body.find("Call dentist").unwrap();
        assert!(groceries < dentist);
        assert!(content.body.contains("<strong>Total:</strong> 2"));
        assert!(content.body.contains("<strong>Completed:</strong> 1"));
        assert!(content.body.contains("<strong>Pending:</strong> 1"));
        assert!(content.body.contains("✅ Done"));
        assert!(content.body.contains("⏳ Pending"));
        assert!(content.body.contains("No due date"));
    }

    #[rstest]
    fn 空の日次サマリは0件を表示する(renderer: TemplateRenderer, alice: Person) {
        let content = renderer
            .render(&TodoNotification::DailySummary { person: &alice, todos: &[] })
            .unwrap();

        assert_eq!(content.subject, "Daily Todo Summary - 0 Tasks (0 Pending)");
        assert!(content.body.contains("<strong>Total:</strong> 0"));
    }

    #[rstest]
    fn htmlテンプレートは値をエスケープする(renderer: TemplateRenderer, alice: Person) {
        let todo = make_todo("<b>Bold</b> & more", None, None);

        let content = renderer
            .render(&TodoNotification::Assigned { todo: &todo, assignee: &alice })
            .unwrap();

        assert!(content.body.contains("&lt;b&gt;Bold"));
        assert!(!content.body.contains("<b>Bold"));
        // 件名はメールヘッダーなのでエスケープしない
        assert_eq!(content.subject, "Task Assigned to You: <b>Bold</b> & more");
    }

    /// 種別ごとの通知を組み立てる（単一 Todo の通知は `todos[0]` を使う）
    fn notification_of<'a>(
        event_type: NotificationEventType,
        person: &'a Person,
        todos: &'a [Todo],
    ) -> TodoNotification<'a> {
        let todo = &todos[0];
        match event_type {
            NotificationEventType::Created => TodoNotification::Created { todo, recipient: person },
            NotificationEventType::Assigned => TodoNotification::Assigned { todo, assignee: person },
            NotificationEventType::Completed => {
                TodoNotification::Completed { todo, recipient: person }
            }
            NotificationEventType::DueSoon => TodoNotification::DueSoon { todo, recipient: person },
            NotificationEventType::DailySummary => TodoNotification::DailySummary { person, todos },
        }
    }

    fn sample_todos() -> Vec<Todo> {
        vec![
            make_todo("Buy groceries", Some("Milk"), Some(due_at_1430())),
            make_todo("Call dentist", None, None).completed(now()),
        ]
    }

    #[rstest]
    #[case::作成(NotificationEventType::Created)]
    #[case::割り当て(NotificationEventType::Assigned)]
    #[case::完了(NotificationEventType::Completed)]
    #[case::期限間近(NotificationEventType::DueSoon)]
    #[case::日次サマリ(NotificationEventType::DailySummary)]
    fn 同じ入力のレンダリングはバイト単位で一致する(
        renderer: TemplateRenderer,
        alice: Person,
        #[case] event_type: NotificationEventType,
    ) {
        let todos = sample_todos();
        let notification = notification_of(event_type, &alice, &todos);

        let first = renderer.render(&notification).unwrap();
        let second = renderer.render(&notification).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    #[case::作成(NotificationEventType::Created, BodyFormat::PlainText)]
    #[case::割り当て(NotificationEventType::Assigned, BodyFormat::Html)]
    #[case::完了(NotificationEventType::Completed, BodyFormat::Html)]
    #[case::期限間近(NotificationEventType::DueSoon, BodyFormat::Html)]
    #[case::日次サマリ(NotificationEventType::DailySummary, BodyFormat::Html)]
    fn 本文形式とhtmlタグの有無は通知種別で決まる(
        renderer: TemplateRenderer,
        alice: Person,
        #[case] event_type: NotificationEventType,
        #[case] expected: BodyFormat,
    ) {
        let todos = sample_todos();

        let content = renderer
            .render(&notification_of(event_type, &alice, &todos))
            .unwrap();

        assert_eq!(content.format, expected);
        assert_eq!(content.body.starts_with("<html>"), expected == BodyFormat::Html);
        assert_eq!(content.body.contains("</html>"), expected == BodyFormat::Html);
    }
}
