//! # Core Service エラー定義
//!
//! Core Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! 通知の送信失敗はここには含まれない。送信結果は bool で返され、
//! Todo 操作のエラーにはならない。

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use todoapp_domain::DomainError;
use todoapp_infra::{InfraError, error::InfraErrorKind};

/// エラーレスポンス（RFC 7807 Problem Details）
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title:      String,
    pub status:     u16,
    pub detail:     String,
}

/// Core Service で発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
    /// リソースが見つからない
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 不正なリクエスト
    #[error("不正なリクエスト: {0}")]
    BadRequest(String),

    /// 競合（メールアドレスの重複など）
    #[error("競合が発生しました: {0}")]
    Conflict(String),

    /// リポジトリエラー
    #[error("リポジトリエラー: {0}")]
    Repository(InfraError),

    /// 内部エラー
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<InfraError> for CoreError {
    fn from(e: InfraError) -> Self {
        match e.kind() {
            InfraErrorKind::Conflict { .. } => CoreError::Conflict(e.to_string()),
            InfraErrorKind::NotFound { .. } => CoreError::NotFound(e.to_string()),
            InfraErrorKind::Unexpected(_) => CoreError::Repository(e),
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) => CoreError::BadRequest(msg),
            DomainError::NotFound { entity_type, id } => {
                CoreError::NotFound(format!("{entity_type}: {id}"))
            }
            DomainError::Conflict(msg) => CoreError::Conflict(msg),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, error_type, title, detail) = match &self {
            CoreError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "https://todoapp.example.com/errors/not-found",
                "Not Found",
                msg.clone(),
            ),
            CoreError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "https://todoapp.example.com/errors/bad-request",
                "Bad Request",
                msg.clone(),
            ),
            CoreError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "https://todoapp.example.com/errors/conflict",
                "Conflict",
                msg.clone(),
            ),
            CoreError::Repository(e) => {
                tracing::error!(span_trace = %e.span_trace(), "リポジトリエラー: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://todoapp.example.com/errors/internal-error",
                    "Internal Server Error",
                    "内部エラーが発生しました".to_string(),
                )
            }
            CoreError::Internal(msg) => {
                tracing::error!("内部エラー: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "https://todoapp.example.com/errors/internal-error",
                    "Internal Server Error",
                    "内部エラーが発生しました".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error_type: error_type.to_string(),
                title: title.to_string(),
                status: status.as_u16(),
                detail,
            }),
        )
            .into_response()
    }
}
