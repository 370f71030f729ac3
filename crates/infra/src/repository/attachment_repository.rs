//! # AttachmentRepository
//!
//! 添付ファイルの検索を担当するリポジトリ。
//!
//! 添付ファイルは Todo 集約の一部なので、登録・削除は `TodoRepository` 経由で行う。
//! このリポジトリは Todo ストアに対する読み取り専用のビューを提供する。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoapp_domain::todo::{Attachment, Todo, TodoId};

use super::lock;
use crate::error::InfraError;

/// 添付ファイルリポジトリトレイト
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Todo に紐づく添付ファイルを取得
    async fn find_by_todo(&self, todo_id: &TodoId) -> Result<Vec<Attachment>, InfraError>;

    /// MIME タイプで検索
    async fn find_by_file_type(&self, file_type: &str) -> Result<Vec<Attachment>, InfraError>;

    /// ファイル名の部分一致で検索（大文字小文字を区別しない）
    async fn find_by_file_name_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Attachment>, InfraError>;
}

/// インメモリ実装の AttachmentRepository
///
/// [`InMemoryTodoRepository::attachments`](super::InMemoryTodoRepository::attachments) で生成する。
#[derive(Debug, Clone)]
pub struct InMemoryAttachmentRepository {
    todos: Arc<Mutex<Vec<Todo>>>,
}

impl InMemoryAttachmentRepository {
    pub(super) fn new(todos: Arc<Mutex<Vec<Todo>>>) -> Self {
        Self { todos }
    }

    fn filter(&self, predicate: impl Fn(&Attachment) -> bool) -> Result<Vec<Attachment>, InfraError> {
        Ok(lock(&self.todos)?
            .iter()
            .flat_map(Todo::attachments)
            .filter(|attachment| predicate(attachment))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryAttachmentRepository {
    async fn find_by_todo(&self, todo_id: &TodoId) -> Result<Vec<Attachment>, InfraError> {
        Ok(lock(&self.todos)?
            .iter()
            .find(|t| t.id() == todo_id)
            .map(|t| t.attachments().to_vec())
            .unwrap_or_default())
    }

    async fn find_by_file_type(&self, file_type: &str) -> Result<Vec<Attachment>, InfraError> {
        self.filter(|a| a.file_type().as_str() == file_type)
    }

    async fn find_by_file_name_containing(
        &self,
        keyword: &str,
    ) -> Result<Vec<Attachment>, InfraError> {
        let keyword = keyword.to_lowercase();
        self.filter(|a| a.file_name().as_str().to_lowercase().contains(&keyword))
    }
}
