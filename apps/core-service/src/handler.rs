//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、送信ロジックはユースケース層に委譲

pub mod email;
pub mod health;

pub use email::{
    EmailState,
    test_assignment_notification,
    test_daily_summary,
    test_html_email,
    test_simple_email,
};
pub use health::{HealthState, health_check};
