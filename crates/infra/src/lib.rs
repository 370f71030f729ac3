//! # TodoApp インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはメール配送とリポジトリの具体的な実装を提供する。
//! 外部システムの詳細をカプセル化し、ユースケース層をインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **メール配送**: SMTP サーバーへの送信（lettre）
//! - **リポジトリ実装**: 人物・Todo・添付ファイルのインメモリストア
//!
//! ## 依存関係
//!
//! ```text
//! core-service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - メール配送（SMTP / Noop）
//! - [`repository`] - リポジトリ実装
//!
//! ## 使用例
//!
//! ```rust
//! use todoapp_infra::notification::{MailTransport, NoopMailTransport};
//!
//! # tokio_test::block_on(async {
//! let transport = NoopMailTransport;
//! assert!(transport.send_plain("alice@example.com", "Hello", "Hi").await);
//! # });
//! ```

pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod notification;
pub mod repository;

pub use error::InfraError;
pub use notification::MailTransport;
