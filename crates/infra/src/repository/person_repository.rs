//! # PersonRepository
//!
//! 人物の永続化を担当するリポジトリ。
//!
//! メールアドレスはシステム内で一意。既に登録済みのメールアドレスでの登録は
//! `Conflict` エラーになる。

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use todoapp_domain::person::{Email, Person, PersonId};

use super::lock;
use crate::error::InfraError;

/// 人物リポジトリトレイト
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// 人物を登録する
    ///
    /// # エラー
    ///
    /// - 同じメールアドレスの人物が既に存在する場合は `Conflict`
    async fn insert(&self, person: &Person) -> Result<(), InfraError>;

    /// ID で人物を検索
    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, InfraError>;

    /// 全人物を登録順で取得
    async fn find_all(&self) -> Result<Vec<Person>, InfraError>;

    /// メールアドレスで人物を検索
    async fn find_by_email(&self, email: &Email) -> Result<Option<Person>, InfraError>;

    /// メールアドレスが登録済みか判定する
    async fn exists_by_email(&self, email: &Email) -> Result<bool, InfraError>;
}

/// インメモリ実装の PersonRepository
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersonRepository {
    persons: Arc<Mutex<Vec<Person>>>,
}

impl InMemoryPersonRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn insert(&self, person: &Person) -> Result<(), InfraError> {
        let mut persons = lock(&self.persons)?;
        if persons.iter().any(|p| p.email() == person.email()) {
            return Err(InfraError::conflict("Person", person.email().as_str()));
        }
        persons.push(person.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PersonId) -> Result<Option<Person>, InfraError> {
        Ok(lock(&self.persons)?.iter().find(|p| p.id() == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Person>, InfraError> {
        Ok(lock(&self.persons)?.clone())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Person>, InfraError> {
        Ok(lock(&self.persons)?
            .iter()
            .find(|p| p.email() == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> Result<bool, InfraError> {
        Ok(lock(&self.persons)?.iter().any(|p| p.email() == email))
    }
}
