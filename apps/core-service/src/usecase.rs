//! # ユースケース層
//!
//! Core Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリはジェネリクス、メール送信は `Arc<dyn MailTransport>` で注入
//! - **薄いハンドラ**: ハンドラは薄く保ち、ロジックはユースケースに集約
//! - **通知は副作用**: Todo の変更を保存してから通知し、通知失敗で変更を巻き戻さない
//!
//! ## モジュール構成
//!
//! - `notification`: 通知のレンダリング・宛先解決・送信
//! - `todo`: Todo 操作と通知のトリガー
//! - `seed`: 起動時のデモデータ投入

pub mod notification;
pub mod seed;
pub mod todo;

pub use notification::{TemplateRenderer, TodoNotificationService};
pub use seed::{SeedReport, seed_demo_data};
pub use todo::{CreateTodoInput, DeliveryReport, TodoUseCaseImpl, TodoWithNotification};
