//! # リポジトリ実装
//!
//! 人物・Todo・添付ファイルの永続化を担当するリポジトリを提供する。
//!
//! ## 設計方針
//!
//! - **トレイトによる抽象化**: ユースケース層はトレイト経由でのみアクセスする
//! - **インメモリ実装**: `Arc<Mutex<Vec<_>>>` で保持し、プロセス終了とともに破棄される
//! - **挿入順の保持**: 検索結果は常に登録順で返す

pub mod attachment_repository;
pub mod person_repository;
pub mod todo_repository;

use std::sync::{Mutex, MutexGuard};

pub use attachment_repository::{AttachmentRepository, InMemoryAttachmentRepository};
pub use person_repository::{InMemoryPersonRepository, PersonRepository};
pub use todo_repository::{InMemoryTodoRepository, TodoRepository};

use crate::error::InfraError;

/// ストアのロックを取得する
///
/// ロックが poisoned の場合は `Unexpected` エラーとして扱う。
fn lock<T>(store: &Mutex<T>) -> Result<MutexGuard<'_, T>, InfraError> {
    store
        .lock()
        .map_err(|_| InfraError::unexpected("インメモリストアのロックが破損しています"))
}
