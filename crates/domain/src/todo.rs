//! # Todo
//!
//! Todo エンティティと、Todo が所有する添付ファイルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`Todo`] | Todo | タイトル・説明・期限・完了フラグ・担当者を持つタスク |
//! | [`Attachment`] | 添付ファイル | ちょうど 1 つの Todo に属するバイナリファイル |
//!
//! ## 設計方針
//!
//! - **状態遷移は所有権を消費するメソッド**: `assigned_to` / `completed` などは
//!   `self` を消費して新しいインスタンスを返し、`updated_at` を更新する
//! - **双方向関連は単一操作で更新**: 添付ファイルの追加・削除は
//!   [`Todo::add_attachment`] / [`Todo::remove_attachment`] のみで行い、
//!   Todo 側のコレクションと Attachment 側の逆参照を同時に書き換える
//! - **所有**: Todo を削除すると添付ファイルも削除される（リポジトリ層の責務）

use chrono::{DateTime, Utc};

use crate::{
    person::PersonId,
    value_objects::{FileName, MimeType, TodoDescription, TodoTitle},
};

define_uuid_id! {
    /// Todo ID（一意識別子）
    pub struct TodoId;
}

define_uuid_id! {
    /// 添付ファイル ID（一意識別子）
    pub struct AttachmentId;
}

// =========================================================================
// Attachment（添付ファイル）
// =========================================================================

/// 添付ファイルエンティティ
///
/// 所属する Todo への逆参照（`todo_id`）は [`Todo`] の操作経由でのみ変更される。
#[derive(Clone)]
pub struct Attachment {
    id:        AttachmentId,
    file_name: FileName,
    file_type: MimeType,
    data:      Vec<u8>,
    todo_id:   Option<TodoId>,
}

impl Attachment {
    /// どの Todo にも属さない添付ファイルを作成する
    pub fn new(id: AttachmentId, file_name: FileName, file_type: MimeType, data: Vec<u8>) -> Self {
        Self {
            id,
            file_name,
            file_type,
            data,
            todo_id: None,
        }
    }

    pub fn id(&self) -> &AttachmentId {
        &self.id
    }

    pub fn file_name(&self) -> &FileName {
        &self.file_name
    }

    pub fn file_type(&self) -> &MimeType {
        &self.file_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 所属する Todo の ID
    pub fn todo_id(&self) -> Option<&TodoId> {
        self.todo_id.as_ref()
    }
}

// バイナリ本体はログに出さない
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("id", &self.id)
            .field("file_name", &self.file_name)
            .field("file_type", &self.file_type)
            .field("size", &self.data.len())
            .field("todo_id", &self.todo_id)
            .finish()
    }
}

impl PartialEq for Attachment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Attachment {}

// =========================================================================
// Todo
// =========================================================================

/// Todo エンティティ
///
/// # 不変条件
///
/// - `title` は必須
/// - `created_at` は作成時に一度だけ設定される
/// - `updated_at` は作成時に `created_at` と同値、以降は変更のたびに更新される
/// - `attachments` の全要素の `todo_id` はこの Todo の ID を指す
#[derive(Debug, Clone)]
pub struct Todo {
    id:          TodoId,
    title:       TodoTitle,
    description: Option<TodoDescription>,
    completed:   bool,
    created_at:  DateTime<Utc>,
    updated_at:  DateTime<Utc>,
    due_date:    Option<DateTime<Utc>>,
    assigned_to: Option<PersonId>,
    attachments: Vec<Attachment>,
}

/// Todo の新規作成パラメータ
pub struct NewTodo {
    pub id:          TodoId,
    pub title:       TodoTitle,
    pub description: Option<TodoDescription>,
    pub due_date:    Option<DateTime<Utc>>,
    pub assigned_to: Option<PersonId>,
    pub now:         DateTime<Utc>,
}

/// Todo の DB 復元パラメータ
pub struct TodoRecord {
    pub id:          TodoId,
    pub title:       TodoTitle,
    pub description: Option<TodoDescription>,
    pub completed:   bool,
    pub created_at:  DateTime<Utc>,
    pub updated_at:  DateTime<Utc>,
    pub due_date:    Option<DateTime<Utc>>,
    pub assigned_to: Option<PersonId>,
    pub attachments: Vec<Attachment>,
}

impl Todo {
    /// 新しい Todo を作成する（未完了、添付なし）
    pub fn new(params: NewTodo) -> Self {
        Self {
            id:          params.id,
            title:       params.title,
            description: params.description,
            completed:   false,
            created_at:  params.now,
            updated_at:  params.now,
            due_date:    params.due_date,
            assigned_to: params.assigned_to,
            attachments: Vec::new(),
        }
    }

    /// 既存のデータから復元する
    ///
    /// 添付ファイルの逆参照はこの Todo の ID に揃える。
    pub fn from_db(record: TodoRecord) -> Self {
        let id = record.id;
        let attachments = record
            .attachments
            .into_iter()
            .map(|mut attachment| {
                attachment.todo_id = Some(id.clone());
                attachment
            })
            .collect();

        Self {
            id,
            title: record.title,
            description: record.description,
            completed: record.completed,
            created_at: record.created_at,
            updated_at: record.updated_at,
            due_date: record.due_date,
            assigned_to: record.assigned_to,
            attachments,
        }
    }

    // 状態遷移メソッド

    /// 担当者を設定した新しいインスタンスを返す
    pub fn assigned_to(self, person_id: PersonId, now: DateTime<Utc>) -> Self {
        Self {
            assigned_to: Some(person_id),
            updated_at: now,
            ..self
        }
    }

    /// 担当者を外した新しいインスタンスを返す
    pub fn unassigned(self, now: DateTime<Utc>) -> Self {
        Self {
            assigned_to: None,
            updated_at: now,
            ..self
        }
    }

    /// 完了状態の新しいインスタンスを返す
    pub fn completed(self, now: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            updated_at: now,
            ..self
        }
    }

    /// 未完了に戻した新しいインスタンスを返す
    pub fn reopened(self, now: DateTime<Utc>) -> Self {
        Self {
            completed: false,
            updated_at: now,
            ..self
        }
    }

    /// 期限を変更した新しいインスタンスを返す
    pub fn rescheduled(self, due_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        Self {
            due_date,
            updated_at: now,
            ..self
        }
    }

    /// タイトルと説明を変更した新しいインスタンスを返す
    pub fn described(
        self,
        title: TodoTitle,
        description: Option<TodoDescription>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            title,
            description,
            updated_at: now,
            ..self
        }
    }

    // 添付ファイル操作

    /// 添付ファイルを追加し、添付ファイル側の逆参照もこの Todo に設定する
    ///
    /// 同じ ID の添付ファイルが既にある場合は置き換える。
    pub fn add_attachment(&mut self, mut attachment: Attachment, now: DateTime<Utc>) {
        attachment.todo_id = Some(self.id.clone());
        self.attachments.retain(|a| a.id != attachment.id);
        self.attachments.push(attachment);
        self.updated_at = now;
    }

    /// 添付ファイルを取り外し、逆参照を解除した状態で返す
    ///
    /// 該当する添付ファイルがない場合は `None` を返し、何も変更しない。
    pub fn remove_attachment(
        &mut self,
        attachment_id: &AttachmentId,
        now: DateTime<Utc>,
    ) -> Option<Attachment> {
        let position = self
            .attachments
            .iter()
            .position(|a| &a.id == attachment_id)?;
        let mut removed = self.attachments.remove(position);
        removed.todo_id = None;
        self.updated_at = now;
        Some(removed)
    }

    // 判定メソッド

    /// 期限が `at` より前で、まだ完了していないか
    pub fn is_overdue(&self, at: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < at)
    }

    // Getter メソッド

    pub fn id(&self) -> &TodoId {
        &self.id
    }

    pub fn title(&self) -> &TodoTitle {
        &self.title
    }

    pub fn description(&self) -> Option<&TodoDescription> {
        self.description.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn assignee(&self) -> Option<&PersonId> {
        self.assigned_to.as_ref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

impl PartialEq for Todo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Todo {}
