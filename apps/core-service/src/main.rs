//! # Core Service サーバー
//!
//! Todo 管理とメール通知を担当するサービス。
//!
//! ## 役割
//!
//! - **通知**: Todo の作成・割り当て・完了・期限・日次サマリをメールで通知
//! - **デモデータ**: 起動時にサンプルの人物・Todo を投入し、デモ通知を送信
//! - **送信テスト**: `/api/email/*` で送信経路を手動確認
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORE_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `CORE_PORT` | No | ポート番号（デフォルト: `3001`） |
//! | `SEED_DEMO_DATA` | No | デモデータを投入するか（デフォルト: `true`） |
//! | `NOTIFICATION_BACKEND` | No | `smtp` または `noop`（デフォルト: `noop`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP サーバー（デフォルト: `localhost:1025`） |
//! | `SMTP_AUTH` / `SMTP_USERNAME` / `SMTP_PASSWORD` | No | SMTP 認証 |
//! | `SMTP_STARTTLS` | No | STARTTLS を必須にするか |
//! | `SMTP_TIMEOUT_SECS` | No | 接続・送信タイムアウト秒数（デフォルト: `10`） |
//! | `MAIL_FROM_ADDRESS` / `MAIL_FROM_NAME` | No | 送信元 |
//! | `LOG_FORMAT` | No | `json` または `pretty` |
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit を localhost:1025 で起動しておく）
//! NOTIFICATION_BACKEND=smtp cargo run -p todoapp-core-service
//! ```

use std::{net::SocketAddr, sync::Arc};

use axum::{Router, routing::get};
use todoapp_core_service::{
    config::{CoreConfig, NotificationBackend},
    handler::{
        EmailState,
        HealthState,
        health_check,
        test_assignment_notification,
        test_daily_summary,
        test_html_email,
        test_simple_email,
    },
    usecase::{TemplateRenderer, TodoNotificationService, seed_demo_data},
};
use todoapp_domain::clock::SystemClock;
use todoapp_infra::{
    MailTransport,
    notification::{NoopMailTransport, SmtpMailTransport},
    repository::{InMemoryPersonRepository, InMemoryTodoRepository},
};
use todoapp_shared::observability::{TracingConfig, init_tracing};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Core Service サーバーのエントリーポイント
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("core-service"));

    let config = CoreConfig::from_env()?;
    tracing::info!(
        "Core Service サーバーを起動します: {}:{}",
        config.host,
        config.port
    );

    // メール送信バックエンド
    let backend = config.notification.backend;
    let transport: Arc<dyn MailTransport> = match backend {
        NotificationBackend::Smtp => {
            tracing::info!(
                host = %config.notification.smtp.host,
                port = config.notification.smtp.port,
                starttls = config.notification.smtp.starttls,
                "SMTP でメールを送信します"
            );
            Arc::new(SmtpMailTransport::new(
                config.notification.smtp.clone(),
                &config.notification.sender,
            )?)
        }
        NotificationBackend::Noop => {
            tracing::info!("メール送信は無効です（noop）");
            Arc::new(NoopMailTransport)
        }
    };
    let notification = Arc::new(TodoNotificationService::new(
        transport.clone(),
        TemplateRenderer::new()?,
    ));

    let person_repo = InMemoryPersonRepository::new();
    let todo_repo = InMemoryTodoRepository::new();

    if config.seed_demo {
        let report = seed_demo_data(&person_repo, &todo_repo, &notification, &SystemClock).await?;
        tracing::info!(?report, "デモデータの投入が完了しました");
    }

    let health_state = Arc::new(HealthState {
        notification_backend: backend,
    });
    let email_state = Arc::new(EmailState {
        transport,
        notification,
        person_repo,
        todo_repo,
    });

    // ルーター構築
    let app = Router::new()
        .route("/health", get(health_check))
        .with_state(health_state)
        .route(
            "/api/email/test-simple",
            get(test_simple_email::<InMemoryPersonRepository, InMemoryTodoRepository>),
        )
        .route(
            "/api/email/test-html",
            get(test_html_email::<InMemoryPersonRepository, InMemoryTodoRepository>),
        )
        .route(
            "/api/email/test-assignment",
            get(test_assignment_notification::<InMemoryPersonRepository, InMemoryTodoRepository>),
        )
        .route(
            "/api/email/test-summary",
            get(test_daily_summary::<InMemoryPersonRepository, InMemoryTodoRepository>),
        )
        .with_state(email_state)
        .layer(TraceLayer::new_for_http());

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Core Service サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
