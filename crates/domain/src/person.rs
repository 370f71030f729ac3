//! # 人物
//!
//! Todo を所有・担当し、通知メールを受け取る人物エンティティを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 要件 |
//! |---|------------|------|
//! | [`Person`] | 人物 | メールアドレスでシステム内一意に識別される |
//! | [`Email`] | メールアドレス | 空でない、システム内で一意 |
//!
//! ## 設計方針
//!
//! - **同一性はメールアドレス**: `PartialEq` / `Hash` は ID ではなく `email` で判定する。
//!   永続化前で ID が確定していない場合でも比較できる
//! - **不変スナップショット**: 通知処理では読み取り専用の値として扱う
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::NaiveDate;
//! use todoapp_domain::{
//!     person::{Email, NewPerson, Person, PersonId},
//!     value_objects::PersonName,
//! };
//!
//! let alice = Person::new(NewPerson {
//!     id:         PersonId::new(),
//!     name:       PersonName::new("Alice Johnson")?,
//!     email:      Email::new("alice@example.com")?,
//!     birth_date: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
//!     today:      NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
//! });
//! assert_eq!(alice.email().as_str(), "alice@example.com");
//! # Ok(())
//! # }
//! ```

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DomainError, value_objects::PersonName};

define_uuid_id! {
    /// 人物 ID（一意識別子）
    pub struct PersonId;
}

/// メールアドレスの最大長
const EMAIL_MAX_LENGTH: usize = 150;

/// メールアドレス（値オブジェクト）
///
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない（前後の空白は除去する）
    /// - `local@domain` の形式
    /// - 最大 150 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.chars().count() > EMAIL_MAX_LENGTH {
            return Err(DomainError::Validation(format!(
                "メールアドレスは{EMAIL_MAX_LENGTH}文字以内である必要があります"
            )));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 人物エンティティ
///
/// # 不変条件
///
/// - `email` は空でなく、システム内で一意
/// - `created_at` は作成時に一度だけ設定される
#[derive(Debug, Clone)]
pub struct Person {
    id:         PersonId,
    name:       PersonName,
    email:      Email,
    birth_date: NaiveDate,
    created_at: NaiveDate,
}

/// 人物の新規作成パラメータ
pub struct NewPerson {
    pub id:         PersonId,
    pub name:       PersonName,
    pub email:      Email,
    pub birth_date: NaiveDate,
    /// 作成日（`created_at` に設定される）
    pub today:      NaiveDate,
}

/// 人物の DB 復元パラメータ
pub struct PersonRecord {
    pub id:         PersonId,
    pub name:       PersonName,
    pub email:      Email,
    pub birth_date: NaiveDate,
    pub created_at: NaiveDate,
}

impl Person {
    /// 新しい人物を作成する
    pub fn new(params: NewPerson) -> Self {
        Self {
            id:         params.id,
            name:       params.name,
            email:      params.email,
            birth_date: params.birth_date,
            created_at: params.today,
        }
    }

    /// 既存のデータから復元する
    pub fn from_db(record: PersonRecord) -> Self {
        Self {
            id:         record.id,
            name:       record.name,
            email:      record.email,
            birth_date: record.birth_date,
            created_at: record.created_at,
        }
    }

    /// 表示名を変更した新しいインスタンスを返す
    pub fn renamed(self, name: PersonName) -> Self {
        Self { name, ..self }
    }

    // Getter メソッド

    pub fn id(&self) -> &PersonId {
        &self.id
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}
