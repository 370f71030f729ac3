//! # Todo ユースケース
//!
//! Todo の作成・割り当て・完了と、それに伴う通知送信を実装する。
//!
//! ## 設計方針
//!
//! - **保存してから通知**: ドメインの変更を先に保存し、その後で通知を送る
//! - **通知失敗はロールバックしない**: 送信結果は戻り値で報告するだけで、
//!   Todo 操作自体はエラーにならない
//! - **時刻は Clock から取得**: テストで期限判定を固定できる

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use todoapp_domain::{
    clock::Clock,
    person::{Person, PersonId},
    todo::{NewTodo, Todo, TodoId},
    value_objects::{TodoDescription, TodoTitle},
};
use todoapp_infra::repository::{PersonRepository, TodoRepository};
use todoapp_shared::{event_log::event, log_business_event};

use super::notification::TodoNotificationService;
use crate::error::CoreError;

/// Todo 作成の入力
pub struct CreateTodoInput {
    pub title:       TodoTitle,
    pub description: Option<TodoDescription>,
    pub due_date:    Option<DateTime<Utc>>,
    pub assigned_to: Option<PersonId>,
}

/// 操作後の Todo と通知の送信結果
///
/// `notification_sent` は通知を試みなかった場合（担当者なし等）に `None`。
#[derive(Debug)]
pub struct TodoWithNotification {
    pub todo:              Todo,
    pub notification_sent: Option<bool>,
}

/// 一括送信の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent:   usize,
    pub failed: usize,
}

impl DeliveryReport {
    fn record(&mut self, sent: bool) {
        if sent {
            self.sent += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Todo ユースケース実装
///
/// P: PersonRepository, T: TodoRepository
pub struct TodoUseCaseImpl<P, T> {
    person_repo:  P,
    todo_repo:    T,
    notification: Arc<TodoNotificationService>,
    clock:        Arc<dyn Clock>,
}

impl<P, T> TodoUseCaseImpl<P, T>
where
    P: PersonRepository,
    T: TodoRepository,
{
    pub fn new(
        person_repo: P,
        todo_repo: T,
        notification: Arc<TodoNotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            person_repo,
            todo_repo,
            notification,
            clock,
        }
    }

    /// Todo を作成する
    ///
    /// 担当者が指定されていれば作成通知（プレーンテキスト）を送る。
    pub async fn create_todo(
        &self,
        input: CreateTodoInput,
    ) -> Result<TodoWithNotification, CoreError> {
        let assignee = match &input.assigned_to {
            Some(person_id) => Some(self.find_person(person_id).await?),
            None => None,
        };

        let todo = Todo::new(NewTodo {
            id:          TodoId::new(),
            title:       input.title,
            description: input.description,
            due_date:    input.due_date,
            assigned_to: input.assigned_to,
            now:         self.clock.now(),
        });
        self.todo_repo.insert(&todo).await?;

        log_business_event!(
            event.category = event::category::TODO,
            event.action = event::action::TODO_CREATED,
            event.entity_type = event::entity_type::TODO,
            event.entity_id = %todo.id(),
            event.result = event::result::SUCCESS,
            "Todo を作成"
        );

        let notification_sent = match &assignee {
            Some(person) => Some(self.notification.notify_created(&todo, person).await),
            None => None,
        };

        Ok(TodoWithNotification {
            todo,
            notification_sent,
        })
    }

    /// Todo を担当者に割り当て、割り当て通知を送る
    pub async fn assign_todo(
        &self,
        todo_id: &TodoId,
        person_id: &PersonId,
    ) -> Result<TodoWithNotification, CoreError> {
        let todo = self.find_todo(todo_id).await?;
        let assignee = self.find_person(person_id).await?;

        let todo = todo.assigned_to(assignee.id().clone(), self.clock.now());
        self.todo_repo.update(&todo).await?;

        log_business_event!(
            event.category = event::category::TODO,
            event.action = event::action::TODO_ASSIGNED,
            event.entity_type = event::entity_type::TODO,
            event.entity_id = %todo.id(),
            event.result = event::result::SUCCESS,
            todo.assignee = %assignee.id(),
            "Todo を割り当て"
        );

        let sent = self.notification.notify_assigned(&todo, &assignee).await;
        Ok(TodoWithNotification {
            todo,
            notification_sent: Some(sent),
        })
    }

    /// Todo を完了にし、担当者がいれば完了通知を送る
    pub async fn complete_todo(&self, todo_id: &TodoId) -> Result<TodoWithNotification, CoreError> {
        let todo = self
            .find_todo(todo_id)
            .await?
            .completed(self.clock.now());
        self.todo_repo.update(&todo).await?;

        log_business_event!(
            event.category = event::category::TODO,
            event.action = event::action::TODO_COMPLETED,
            event.entity_type = event::entity_type::TODO,
            event.entity_id = %todo.id(),
            event.result = event::result::SUCCESS,
            "Todo を完了"
        );

        let notification_sent = match todo.assignee() {
            Some(person_id) => match self.person_repo.find_by_id(person_id).await? {
                Some(person) => Some(self.notification.notify_completed(&todo, &person).await),
                None => {
                    tracing::warn!(todo_id = %todo.id(), person_id = %person_id, "担当者が見つからないため完了通知を省略");
                    None
                }
            },
            None => None,
        };

        Ok(TodoWithNotification {
            todo,
            notification_sent,
        })
    }

    /// 期限が `now + window` より前の未完了 Todo の担当者にリマインダーを送る
    ///
    /// 期限切れの Todo も対象に含む。担当者のいない Todo は対象外。
    pub async fn send_due_date_reminders(&self, window: Duration) -> Result<DeliveryReport, CoreError> {
        let deadline = self.clock.now() + window;
        let todos = self
            .todo_repo
            .find_by_due_date_before_and_completed(deadline, false)
            .await?;

        let mut report = DeliveryReport::default();
        for todo in &todos {
            let Some(person_id) = todo.assignee() else {
                continue;
            };
            let Some(person) = self.person_repo.find_by_id(person_id).await? else {
                tracing::warn!(todo_id = %todo.id(), person_id = %person_id, "担当者が見つからないためリマインダーを省略");
                continue;
            };
            report.record(self.notification.send_due_date_reminder(todo, &person).await);
        }

        tracing::info!(sent = report.sent, failed = report.failed, "期限リマインダーを送信");
        Ok(report)
    }

    /// 担当 Todo を持つ全員に日次サマリを送る
    pub async fn send_daily_summaries(&self) -> Result<DeliveryReport, CoreError> {
        let mut report = DeliveryReport::default();
        for person in self.person_repo.find_all().await? {
            let todos = self.todo_repo.find_by_assigned_to(person.id()).await?;
            if todos.is_empty() {
                continue;
            }
            report.record(self.notification.send_daily_summary(&person, &todos).await);
        }

        tracing::info!(sent = report.sent, failed = report.failed, "日次サマリを送信");
        Ok(report)
    }

    async fn find_todo(&self, todo_id: &TodoId) -> Result<Todo, CoreError> {
        self.todo_repo
            .find_by_id(todo_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Todo: {todo_id}")))
    }

    async fn find_person(&self, person_id: &PersonId) -> Result<Person, CoreError> {
        self.person_repo
            .find_by_id(person_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Person: {person_id}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use todoapp_domain::{
        clock::FixedClock,
        notification::BodyFormat,
        person::{Email, NewPerson},
        value_objects::PersonName,
    };
    use todoapp_infra::{
        mock::MockMailTransport,
        repository::{InMemoryPersonRepository, InMemoryTodoRepository},
    };

    use super::*;
    use crate::usecase::notification::TemplateRenderer;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap()
    }

    struct Fixture {
        usecase:   TodoUseCaseImpl<InMemoryPersonRepository, InMemoryTodoRepository>,
        persons:   InMemoryPersonRepository,
        todos:     InMemoryTodoRepository,
        transport: MockMailTransport,
    }

    fn setup(transport: MockMailTransport) -> Fixture {
        let persons = InMemoryPersonRepository::new();
        let todos = InMemoryTodoRepository::new();
        let notification = Arc::new(TodoNotificationService::new(
            Arc::new(transport.clone()),
            TemplateRenderer::new().unwrap(),
        ));
        let usecase = TodoUseCaseImpl::new(
            persons.clone(),
            todos.clone(),
            notification,
            Arc::new(FixedClock::new(now())),
        );
        Fixture {
            usecase,
            persons,
            todos,
            transport,
        }
    }

    async fn add_person(persons: &InMemoryPersonRepository, name: &str, email: &str) -> Person {
        let person = Person::new(NewPerson {
            id:         PersonId::new(),
            name:       PersonName::new(name).unwrap(),
            email:      Email::new(email).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            today:      now().date_naive(),
        });
        persons.insert(&person).await.unwrap();
        person
    }

    fn input(title: &str, due_in_days: Option<i64>, assignee: Option<&Person>) -> CreateTodoInput {
        CreateTodoInput {
            title:       TodoTitle::new(title).unwrap(),
            description: None,
            due_date:    due_in_days.map(|d| now() + Duration::days(d)),
            assigned_to: assignee.map(|p| p.id().clone()),
        }
    }

    #[tokio::test]
    async fn test_担当者付きで作成すると作成通知を送る() {
        let f = setup(MockMailTransport::new());
        let alice = add_person(&f.persons, "Alice Johnson", "alice@example.com").await;

        let result = f
            .usecase
            .create_todo(input("Buy groceries", Some(2), Some(&alice)))
            .await
            .unwrap();

        assert_eq!(result.notification_sent, Some(true));
        let sent = f.transport.sent_emails();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Task Created: Buy groceries");
        assert_eq!(sent[0].format, BodyFormat::PlainText);
        assert!(f.todos.find_by_id(result.todo.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_担当者なしで作成すると通知しない() {
        let f = setup(MockMailTransport::new());

        let result = f
            .usecase
            .create_todo(input("Clean garage", Some(7), None))
            .await
            .unwrap();

        assert_eq!(result.notification_sent, None);
        assert_eq!(f.transport.attempts(), 0);
    }

    #[tokio::test]
    async fn test_存在しない担当者での作成はnot_foundになり保存しない() {
        let f = setup(MockMailTransport::new());
        let mut bad = input("Buy groceries", None, None);
        bad.assigned_to = Some(PersonId::new());

        let err = f.usecase.create_todo(bad).await.unwrap_err();

        assert!(matches!(err, CoreError::NotFound(_)));
        assert!(f.todos.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_通知に失敗しても割り当ては保存される() {
        let f = setup(MockMailTransport::rejecting());
        let alice = add_person(&f.persons, "Alice Johnson", "alice@example.com").await;
        let created = f
            .usecase
            .create_todo(input("Buy groceries", Some(2), None))
            .await
            .unwrap();

        let result = f
            .usecase
            .assign_todo(created.todo.id(), alice.id())
            .await
            .unwrap();

        assert_eq!(result.notification_sent, Some(false));
        let stored = f.todos.find_by_id(created.todo.id()).await.unwrap().unwrap();
        assert_eq!(stored.assignee(), Some(alice.id()));
    }

    #[tokio::test]
    async fn test_完了すると担当者に完了通知を送る() {
        let f = setup(MockMailTransport::new());
        let bob = add_person(&f.persons, "Bob Smith", "bob@example.com").await;
        let created = f
            .usecase
            .create_todo(input("Finish project report", Some(-1), Some(&bob)))
            .await
            .unwrap();

        let result = f.usecase.complete_todo(created.todo.id()).await.unwrap();

        assert!(result.todo.is_completed());
        assert_eq!(result.notification_sent, Some(true));
        let sent = f.transport.sent_emails();
        assert_eq!(sent.last().unwrap().subject, "Task Completed: Finish project report");
        assert_eq!(sent.last().unwrap().to, "bob@example.com");
    }

    #[tokio::test]
    async fn test_存在しないtodoの完了はnot_foundになる() {
        let f = setup(MockMailTransport::new());
        let err = f.usecase.complete_todo(&TodoId::new()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[rstest]
    #[case(3, 2)]
    #[case(1, 1)]
    #[tokio::test]
    async fn test_期限リマインダーは期限切れと期間内の未完了todoに送る(
        #[case] window_days: i64,
        #[case] expected: usize,
    ) {
        let f = setup(MockMailTransport::new());
        let alice = add_person(&f.persons, "Alice Johnson", "alice@example.com").await;
        for (title, due) in [("Buy groceries", Some(2)), ("Call dentist", Some(-5)), ("Learn Rust", None)] {
            f.usecase
                .create_todo(input(title, due, Some(&alice)))
                .await
                .unwrap();
        }
        f.usecase
            .create_todo(input("Clean garage", Some(-1), None))
            .await
            .unwrap();
        let attempts_before = f.transport.attempts();

        let report = f
            .usecase
            .send_due_date_reminders(Duration::days(window_days))
            .await
            .unwrap();

        assert_eq!(report, DeliveryReport { sent: expected, failed: 0 });
        assert_eq!(f.transport.attempts() - attempts_before, expected);
        assert!(
            f.transport
                .sent_emails()
                .iter()
                .any(|e| e.subject == "⚠️ Reminder: Task Due Soon - Call dentist")
        );
    }

    #[tokio::test]
    async fn test_日次サマリは担当todoを持つ人物にだけ送る() {
        let f = setup(MockMailTransport::new());
        let alice = add_person(&f.persons, "Alice Johnson", "alice@example.com").await;
        add_person(&f.persons, "Bob Smith", "bob@example.com").await;
        f.usecase
            .create_todo(input("Buy groceries", Some(2), Some(&alice)))
            .await
            .unwrap();
        let attempts_before = f.transport.attempts();

        let report = f.usecase.send_daily_summaries().await.unwrap();

        assert_eq!(report, DeliveryReport { sent: 1, failed: 0 });
        assert_eq!(f.transport.attempts() - attempts_before, 1);
        let last = f.transport.sent_emails().pop().unwrap();
        assert_eq!(last.to, "alice@example.com");
        assert_eq!(last.subject, "Daily Todo Summary - 1 Tasks (1 Pending)");
    }
}
