//! # TodoRepository
//!
//! Todo の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **集約単位で保存**: 添付ファイルは Todo に所有されるため、Todo と一緒に保存・削除される
//! - **期限の比較は両端を含む**: `find_by_due_date_between` は開始・終了時刻ちょうどの Todo も返す
//! - **期限なしの Todo**: 期限による検索ではどの範囲にも該当しない

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use todoapp_domain::{
    person::PersonId,
    todo::{Todo, TodoId},
};

use super::{InMemoryAttachmentRepository, lock};
use crate::error::InfraError;

/// Todo リポジトリトレイト
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Todo を登録する
    ///
    /// # エラー
    ///
    /// - 同じ ID の Todo が既に存在する場合は `Conflict`
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError>;

    /// Todo を更新する（添付ファイルを含めて置き換える）
    ///
    /// # エラー
    ///
    /// - 対象の Todo が存在しない場合は `NotFound`
    async fn update(&self, todo: &Todo) -> Result<(), InfraError>;

    /// Todo を削除する（添付ファイルも削除される）
    ///
    /// # エラー
    ///
    /// - 対象の Todo が存在しない場合は `NotFound`
    async fn delete(&self, id: &TodoId) -> Result<(), InfraError>;

    /// ID で Todo を検索
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, InfraError>;

    /// 全 Todo を登録順で取得
    async fn find_all(&self) -> Result<Vec<Todo>, InfraError>;

    /// 担当者で検索
    async fn find_by_assigned_to(&self, person_id: &PersonId) -> Result<Vec<Todo>, InfraError>;

    /// 担当者ごとの件数
    async fn count_by_assigned_to(&self, person_id: &PersonId) -> Result<usize, InfraError>;

    /// 完了状態と担当者で検索
    async fn find_by_completed_and_assigned_to(
        &self,
        completed: bool,
        person_id: &PersonId,
    ) -> Result<Vec<Todo>, InfraError>;

    /// タイトルの部分一致で検索（大文字小文字を区別しない）
    async fn find_by_title_containing(&self, keyword: &str) -> Result<Vec<Todo>, InfraError>;

    /// 完了状態で検索
    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, InfraError>;

    /// 期限が `start` 以上 `end` 以下の Todo を検索
    async fn find_by_due_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Todo>, InfraError>;

    /// 期限が `before` より前で、指定の完了状態の Todo を検索
    async fn find_by_due_date_before_and_completed(
        &self,
        before: DateTime<Utc>,
        completed: bool,
    ) -> Result<Vec<Todo>, InfraError>;

    /// 期限切れ（期限が `now` より前で未完了）の Todo を検索
    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Todo>, InfraError> {
        self.find_by_due_date_before_and_completed(now, false).await
    }

    /// 担当者が未設定の Todo を検索
    async fn find_unassigned(&self) -> Result<Vec<Todo>, InfraError>;

    /// 期限が未設定の Todo を検索
    async fn find_without_due_date(&self) -> Result<Vec<Todo>, InfraError>;
}

/// インメモリ実装の TodoRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryTodoRepository {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同じストアを参照する添付ファイルリポジトリを返す
    pub fn attachments(&self) -> InMemoryAttachmentRepository {
        InMemoryAttachmentRepository::new(Arc::clone(&self.todos))
    }

    fn filter(&self, predicate: impl Fn(&Todo) -> bool) -> Result<Vec<Todo>, InfraError> {
        Ok(lock(&self.todos)?
            .iter()
            .filter(|todo| predicate(todo))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TodoRepository for InMemoryTodoRepository {
    async fn insert(&self, todo: &Todo) -> Result<(), InfraError> {
        let mut todos = lock(&self.todos)?;
        if todos.iter().any(|t| t.id() == todo.id()) {
            return Err(InfraError::conflict("Todo", todo.id().to_string()));
        }
        todos.push(todo.clone());
        Ok(())
    }

    async fn update(&self, todo: &Todo) -> Result<(), InfraError> {
        let mut todos = lock(&self.todos)?;
        let Some(slot) = todos.iter_mut().find(|t| t.id() == todo.id()) else {
            return Err(InfraError::not_found("Todo", todo.id().to_string()));
        };
        *slot = todo.clone();
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), InfraError> {
        let mut todos = lock(&self.todos)?;
        let before = todos.len();
        todos.retain(|t| t.id() != id);
        if todos.len() == before {
            return Err(InfraError::not_found("Todo", id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, InfraError> {
        Ok(lock(&self.todos)?.iter().find(|t| t.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Todo>, InfraError> {
        Ok(lock(&self.todos)?.clone())
    }

    async fn find_by_assigned_to(&self, person_id: &PersonId) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.assignee() == Some(person_id))
    }

    async fn count_by_assigned_to(&self, person_id: &PersonId) -> Result<usize, InfraError> {
        Ok(lock(&self.todos)?
            .iter()
            .filter(|t| t.assignee() == Some(person_id))
            .count())
    }

    async fn find_by_completed_and_assigned_to(
        &self,
        completed: bool,
        person_id: &PersonId,
    ) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.is_completed() == completed && t.assignee() == Some(person_id))
    }

    async fn find_by_title_containing(&self, keyword: &str) -> Result<Vec<Todo>, InfraError> {
        let keyword = keyword.to_lowercase();
        self.filter(|t| t.title().as_str().to_lowercase().contains(&keyword))
    }

    async fn find_by_completed(&self, completed: bool) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.is_completed() == completed)
    }

    async fn find_by_due_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.due_date().is_some_and(|due| start <= due && due <= end))
    }

    async fn find_by_due_date_before_and_completed(
        &self,
        before: DateTime<Utc>,
        completed: bool,
    ) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.is_completed() == completed && t.due_date().is_some_and(|due| due < before))
    }

    async fn find_unassigned(&self) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.assignee().is_none())
    }

    async fn find_without_due_date(&self) -> Result<Vec<Todo>, InfraError> {
        self.filter(|t| t.due_date().is_none())
    }
}
