//! # デモデータ投入
//!
//! 起動時にサンプルの人物・Todo を登録し、デモ用の通知を送信する。
//! `SEED_DEMO_DATA=false` で無効化できる。
//!
//! 通知の失敗はログに記録するだけで、起動は継続する。

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use todoapp_domain::{
    DomainError,
    clock::Clock,
    person::{Email, NewPerson, Person, PersonId},
    todo::{NewTodo, Todo, TodoId},
    value_objects::{PersonName, TodoDescription, TodoTitle},
};
use todoapp_infra::repository::{PersonRepository, TodoRepository};

use super::notification::TodoNotificationService;
use crate::error::CoreError;

/// デモ通知の送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub persons:            usize,
    pub todos:              usize,
    /// 「Buy groceries」の割り当て通知
    pub assignment_sent:    bool,
    /// 「Call dentist」の期限リマインダー
    pub reminder_sent:      bool,
    /// Alice への日次サマリ
    pub daily_summary_sent: bool,
}

struct SamplePerson {
    name:       &'static str,
    email:      &'static str,
    birth_date: (i32, u32, u32),
}

const SAMPLE_PERSONS: [SamplePerson; 3] = [
    SamplePerson {
        name:       "Alice Johnson",
        email:      "alice@example.com",
        birth_date: (1990, 5, 15),
    },
    SamplePerson {
        name:       "Bob Smith",
        email:      "bob@example.com",
        birth_date: (1985, 8, 22),
    },
    SamplePerson {
        name:       "Charlie Brown",
        email:      "charlie@example.com",
        birth_date: (1995, 3, 10),
    },
];

/// デモデータを投入し、デモ通知を送信する
pub async fn seed_demo_data<P, T>(
    person_repo: &P,
    todo_repo: &T,
    notification: &Arc<TodoNotificationService>,
    clock: &dyn Clock,
) -> Result<SeedReport, CoreError>
where
    P: PersonRepository,
    T: TodoRepository,
{
    tracing::info!("デモデータを投入します");
    let now = clock.now();

    let mut persons = Vec::with_capacity(SAMPLE_PERSONS.len());
    for sample in &SAMPLE_PERSONS {
        let person = sample_person(sample, clock.today())?;
        person_repo.insert(&person).await?;
        persons.push(person);
    }
    let [alice, bob, charlie] = [&persons[0], &persons[1], &persons[2]];

    let groceries = sample_todo(
        "Buy groceries",
        "Milk, eggs, bread, vegetables",
        Some(now + Duration::days(2)),
        Some(alice),
        now,
    )?;
    let report = sample_todo(
        "Finish project report",
        "Complete the Q4 analysis",
        Some(now - Duration::days(1)),
        Some(bob),
        now,
    )?
    .completed(now);
    let dentist = sample_todo(
        "Call dentist",
        "Schedule annual checkup",
        Some(now - Duration::days(5)),
        Some(alice),
        now,
    )?;
    let garage = sample_todo(
        "Clean garage",
        "Organize tools and boxes",
        Some(now + Duration::days(7)),
        None,
        now,
    )?;
    let learn = sample_todo(
        "Learn Spring Boot",
        "Complete online tutorial",
        None,
        Some(charlie),
        now,
    )?;

    let todos = [groceries, report, dentist, garage, learn];
    for todo in &todos {
        todo_repo.insert(todo).await?;
    }
    tracing::info!(persons = persons.len(), todos = todos.len(), "サンプルデータを作成");

    let assignment_sent = notification.notify_assigned(&todos[0], alice).await;
    log_demo_result(assignment_sent, "割り当て通知");

    let reminder_sent = notification.send_due_date_reminder(&todos[2], alice).await;
    log_demo_result(reminder_sent, "期限リマインダー");

    let alice_todos = todo_repo.find_by_assigned_to(alice.id()).await?;
    let daily_summary_sent = notification.send_daily_summary(alice, &alice_todos).await;
    log_demo_result(daily_summary_sent, "日次サマリ");

    Ok(SeedReport {
        persons: persons.len(),
        todos: todos.len(),
        assignment_sent,
        reminder_sent,
        daily_summary_sent,
    })
}

fn log_demo_result(sent: bool, label: &str) {
    if sent {
        tracing::info!(recipient = "alice@example.com", "デモ{label}を送信");
    } else {
        tracing::warn!(recipient = "alice@example.com", "デモ{label}の送信に失敗（起動は継続）");
    }
}

fn sample_person(sample: &SamplePerson, today: NaiveDate) -> Result<Person, DomainError> {
    let (year, month, day) = sample.birth_date;
    let birth_date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| DomainError::Validation(format!("生年月日が不正です: {year}-{month}-{day}")))?;

    Ok(Person::new(NewPerson {
        id: PersonId::new(),
        name: PersonName::new(sample.name)?,
        email: Email::new(sample.email)?,
        birth_date,
        today,
    }))
}

fn sample_todo(
    title: &str,
    description: &str,
    due_date: Option<DateTime<Utc>>,
    assignee: Option<&Person>,
    now: DateTime<Utc>,
) -> Result<Todo, DomainError> {
    Ok(Todo::new(NewTodo {
        id: TodoId::new(),
        title: TodoTitle::new(title)?,
        description: Some(TodoDescription::new(description)?),
        due_date,
        assigned_to: assignee.map(|p| p.id().clone()),
        now,
    }))
}
