//! # ヘルスチェックハンドラ
//!
//! Core Service の稼働状態と、有効なメール送信バックエンドを返す。
//!
//! ## エンドポイント
//!
//! ```text
//! GET /health
//! ```
//!
//! ## レスポンス例
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "notification_backend": "smtp"
//! }
//! ```

use std::sync::Arc;

use axum::{Json, extract::State};
use todoapp_shared::HealthResponse;

use crate::config::NotificationBackend;

/// ヘルスチェックハンドラーの State
pub struct HealthState {
    pub notification_backend: NotificationBackend,
}

/// ヘルスチェックエンドポイント
pub async fn health_check(State(state): State<Arc<HealthState>>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        env!("CARGO_PKG_VERSION"),
        state.notification_backend.as_str(),
    ))
}
