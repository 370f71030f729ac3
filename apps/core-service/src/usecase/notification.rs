//! # 通知ユースケース
//!
//! Todo 操作に伴うメール通知の生成・宛先解決・送信を統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによる件名・本文の生成
//! - [`recipient_resolver`] - 通知イベントからの送信先決定
//! - [`service`] - レンダリング + 宛先解決 + 送信の統合サービス

pub mod recipient_resolver;
pub mod service;
pub mod template_renderer;

pub use recipient_resolver::resolve_recipient;
pub use service::TodoNotificationService;
pub use template_renderer::{RenderedContent, TemplateRenderer, format_due_date};
