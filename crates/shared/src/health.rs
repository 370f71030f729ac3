//! # ヘルスチェック共通型
//!
//! ヘルスチェックエンドポイントで使用されるレスポンス型を提供する。

use serde::{Deserialize, Serialize};

/// ヘルスチェックレスポンス
///
/// `status` はサービスの稼働状態、`version` は Cargo.toml のバージョン、
/// `notification_backend` は有効なメール送信バックエンドを示す。
///
/// ## 使用例
///
/// ```
/// use todoapp_shared::HealthResponse;
///
/// let response = HealthResponse::healthy("0.1.0", "noop");
/// assert_eq!(response.status, "healthy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 稼働状態（`"healthy"` または `"unhealthy"`）
    pub status:               String,
    /// アプリケーションバージョン（Cargo.toml から取得）
    pub version:              String,
    /// メール送信バックエンド（`"smtp"` または `"noop"`）
    pub notification_backend: String,
}

impl HealthResponse {
    /// 稼働中を示すレスポンスを作成する
    pub fn healthy(version: impl Into<String>, notification_backend: impl Into<String>) -> Self {
        Self {
            status:               "healthy".to_string(),
            version:              version.into(),
            notification_backend: notification_backend.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_responseのserializeで正しいjson形状にする() {
        let response = HealthResponse::healthy("0.1.0", "smtp");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "status": "healthy",
                "version": "0.1.0",
                "notification_backend": "smtp"
            })
        );
    }
}
