//! # TodoApp ドメイン層
//!
//! Todo 管理とメール通知の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（Person, Todo, Attachment）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（Email, TodoTitle）
//! - **通知イベント**: 状態変化に対応する通知イベントとメールメッセージ
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（永続化、SMTP）には一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`person`] - 人物（Todo の担当者・受信者）
//! - [`todo`] - Todo と添付ファイル
//! - [`notification`] - 通知イベントとメールメッセージ
//! - [`value_objects`] - 共通値オブジェクト
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー
//!
//! ## 使用例
//!
//! ```rust
//! use todoapp_domain::{DomainError, person::Email};
//!
//! assert!(Email::new("alice@example.com").is_ok());
//! assert!(matches!(Email::new(""), Err(DomainError::Validation(_))));
//! ```

#[macro_use]
mod macros;

pub mod clock;
pub mod error;
pub mod notification;
pub mod person;
pub mod todo;
pub mod value_objects;

pub use error::DomainError;

/// PII マスク時に Debug 出力へ表示する文字列
pub const REDACTED: &str = "[REDACTED]";
