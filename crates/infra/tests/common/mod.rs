//! テスト共通フィクスチャ
//!
//! 統合テストで共通利用する基準時刻・エンティティ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use todoapp_domain::{
    person::{Email, NewPerson, Person, PersonId},
    todo::{Attachment, AttachmentId, NewTodo, Todo, TodoId},
    value_objects::{FileName, MimeType, PersonName, TodoTitle},
};

/// テストの基準時刻
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 5, 9, 0, 0).unwrap()
}

pub fn make_person(name: &str, email: &str) -> Person {
    Person::new(NewPerson {
        id:         PersonId::new(),
        name:       PersonName::new(name).unwrap(),
        email:      Email::new(email).unwrap(),
        birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
        today:      test_now().date_naive(),
    })
}

/// 基準時刻から `due_in_days` 日後を期限とする Todo を作成する
pub fn make_todo(title: &str, due_in_days: Option<i64>, assignee: Option<&Person>) -> Todo {
    Todo::new(NewTodo {
        id:          TodoId::new(),
        title:       TodoTitle::new(title).unwrap(),
        description: None,
        due_date:    due_in_days.map(|days| test_now() + Duration::days(days)),
        assigned_to: assignee.map(|p| p.id().clone()),
        now:         test_now(),
    })
}

pub fn make_attachment(file_name: &str, file_type: &str) -> Attachment {
    Attachment::new(
        AttachmentId::new(),
        FileName::new(file_name).unwrap(),
        MimeType::new(file_type).unwrap(),
        b"data".to_vec(),
    )
}
