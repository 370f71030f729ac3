//! SMTP メール送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用してメールを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。
//!
//! 1 回の送信で 1 通のメッセージを組み立てる。To / Cc / Bcc は同じメッセージの
//! 宛先区分として扱い、Bcc ヘッダーは送信されるメッセージには含まれない。

use std::{path::Path, time::Duration};

use async_trait::async_trait;
use lettre::{
    Address,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use todoapp_domain::notification::{
    BodyFormat,
    EmailMessage,
    MailAttachment,
    NotificationError,
};

use super::MailTransport;

/// 接続・読み取りタイムアウトのデフォルト値
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 拡張子から判別できないファイル添付の Content-Type
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// ファイル添付の拡張子と Content-Type の対応（拡張子は小文字）
const CONTENT_TYPES_BY_EXTENSION: &[(&str, &str)] = &[
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("zip", "application/zip"),
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
];

/// SMTP 接続設定
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    /// SMTP サーバーのホスト名（例: "localhost"）
    pub host:        String,
    /// SMTP サーバーのポート番号（例: 1025 for Mailpit）
    pub port:        u16,
    /// 認証情報（`None` なら認証しない）
    pub credentials: Option<SmtpCredentials>,
    /// STARTTLS を必須にするか
    pub starttls:    bool,
    /// 接続・読み取りタイムアウト
    pub timeout:     Duration,
}

/// SMTP 認証情報
#[derive(Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SmtpSettings {
    /// 認証・TLS なしの設定を作成する（Mailpit 等のローカル SMTP 向け）
    pub fn plain(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            credentials: None,
            starttls: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// 送信元
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// 送信元メールアドレス
    pub address: String,
    /// 表示名（例: "Todo App"）
    pub name:    String,
}

impl Sender {
    pub fn new(address: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name:    name.into(),
        }
    }

    fn mailbox(&self) -> Result<Mailbox, NotificationError> {
        let address: Address = self
            .address
            .parse()
            .map_err(|e| NotificationError::MessageBuild(format!("送信元アドレス不正: {e}")))?;
        Ok(Mailbox::new(Some(self.name.clone()), address))
    }
}

/// SMTP メール送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// 送信ごとに接続するため、複数タスクから同時に使用できる。
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from:      Mailbox,
}

impl SmtpMailTransport {
    /// 新しい SMTP 送信インスタンスを作成する
    ///
    /// 送信元アドレスが不正な場合、または TLS 設定を構築できない場合はエラーを返す。
    pub fn new(settings: SmtpSettings, sender: &Sender) -> Result<Self, NotificationError> {
        let from = sender.mailbox()?;

        // builder_dangerous: 暗黙の TLS なしで接続し、必要なら STARTTLS に切り替える
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .timeout(Some(settings.timeout));

        if settings.starttls {
            let parameters = TlsParameters::new(settings.host.clone())
                .map_err(|e| NotificationError::SendFailed(format!("TLS 設定の構築に失敗: {e}")))?;
            builder = builder.tls(Tls::Required(parameters));
        }

        if let Some(credentials) = settings.credentials {
            builder = builder.credentials(Credentials::new(
                credentials.username,
                credentials.password,
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// EmailMessage から lettre のメッセージを組み立てる
    ///
    /// ファイル添付はここで読み込むため、読み込めない場合は接続前に失敗する。
    async fn build_message(&self, email: &EmailMessage) -> Result<Message, NotificationError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&email.to)?)
            .subject(&email.subject);

        for cc in &email.cc {
            builder = builder.cc(parse_mailbox(cc)?);
        }
        for bcc in &email.bcc {
            builder = builder.bcc(parse_mailbox(bcc)?);
        }

        let body = match email.format {
            BodyFormat::PlainText => SinglePart::plain(email.body.clone()),
            BodyFormat::Html => SinglePart::html(email.body.clone()),
        };

        let result = match &email.attachment {
            None => builder.singlepart(body),
            Some(attachment) => {
                let attachment_part = load_attachment(attachment).await?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(body)
                        .singlepart(attachment_part),
                )
            }
        };

        result.map_err(|e| NotificationError::MessageBuild(format!("メッセージ構築失敗: {e}")))
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotificationError> {
    address
        .parse()
        .map_err(|e| NotificationError::MessageBuild(format!("宛先アドレス不正 ({address}): {e}")))
}

async fn load_attachment(attachment: &MailAttachment) -> Result<SinglePart, NotificationError> {
    match attachment {
        MailAttachment::File(path) => {
            let data = tokio::fs::read(path).await.map_err(|e| {
                NotificationError::AttachmentFailed(format!("{}: {e}", path.display()))
            })?;
            let file_name = file_name_of(path)?;
            let content_type = parse_content_type(content_type_of(path))?;
            Ok(Attachment::new(file_name).body(data, content_type))
        }
        MailAttachment::Stored {
            file_name,
            content_type,
            data,
        } => {
            let content_type = parse_content_type(content_type)?;
            Ok(Attachment::new(file_name.clone()).body(data.clone(), content_type))
        }
    }
}

fn file_name_of(path: &Path) -> Result<String, NotificationError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            NotificationError::AttachmentFailed(format!(
                "ファイル名を取得できません: {}",
                path.display()
            ))
        })
}

/// 拡張子から Content-Type を判別する
fn content_type_of(path: &Path) -> &'static str {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return FALLBACK_CONTENT_TYPE;
    };
    CONTENT_TYPES_BY_EXTENSION
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(extension))
        .map_or(FALLBACK_CONTENT_TYPE, |&(_, content_type)| content_type)
}

fn parse_content_type(value: &str) -> Result<ContentType, NotificationError> {
    ContentType::parse(value).map_err(|e| {
        NotificationError::AttachmentFailed(format!("Content-Type が不正です ({value}): {e}"))
    })
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = self.build_message(email).await?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        tracing::info!(
            to = %email.to,
            cc = email.cc.len(),
            bcc = email.bcc.len(),
            subject = %email.subject,
            "SMTP: メールを送信"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn transport() -> SmtpMailTransport {
        SmtpMailTransport::new(
            SmtpSettings::plain("localhost", 1025),
            &Sender::new("noreply@todoapp.example.com", "Todo App"),
        )
        .unwrap()
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpMailTransport>();
    }

    #[test]
    fn test_送信元アドレスが不正ならエラーを返す() {
        let result = SmtpMailTransport::new(
            SmtpSettings::plain("localhost", 1025),
            &Sender::new("not-an-address", "Todo App"),
        );
        assert!(matches!(result, Err(NotificationError::MessageBuild(_))));
    }

    #[test]
    fn test_デフォルトのタイムアウトは10秒() {
        assert_eq!(SmtpSettings::plain("localhost", 1025).timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_認証情報のdebug出力はパスワードをマスクする() {
        let credentials = SmtpCredentials {
            username: "mailer".to_string(),
            password: "s3cret".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("mailer"));
        assert!(!debug.contains("s3cret"));
    }

    #[tokio::test]
    async fn test_bccはメッセージのヘッダーに含まれない() {
        let email = EmailMessage::plain("alice@example.com", "Hello", "body")
            .with_cc(["bob@example.com"])
            .with_bcc(["charlie@example.com"]);

        let message = transport().build_message(&email).await.unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("bob@example.com"));
        assert!(!formatted.contains("charlie@example.com"));

        let envelope_to: Vec<String> = message
            .envelope()
            .to()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            envelope_to,
            vec![
                "alice@example.com".to_string(),
                "bob@example.com".to_string(),
                "charlie@example.com".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_宛先アドレスが不正ならメッセージ構築に失敗する() {
        let email = EmailMessage::plain("not an address", "Hello", "body");
        let result = transport().build_message(&email).await;
        assert!(matches!(result, Err(NotificationError::MessageBuild(_))));
    }

    #[tokio::test]
    async fn test_保存済み添付ファイルはmultipart_mixedになる() {
        let email = EmailMessage::html("alice@example.com", "Report", "<p>See attached</p>")
            .with_attachment(MailAttachment::Stored {
                file_name:    "report.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data:         b"%PDF-1.4".to_vec(),
            });

        let message = transport().build_message(&email).await.unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("multipart/mixed"));
        assert!(formatted.contains("report.pdf"));
        assert!(formatted.contains("application/pdf"));
    }

    #[rstest]
    #[case::テキスト("notes.txt", "text/plain")]
    #[case::大文字の拡張子("REPORT.PDF", "application/pdf")]
    #[case::画像("photo.jpeg", "image/jpeg")]
    #[case::未知の拡張子("archive.7z", "application/octet-stream")]
    #[case::拡張子なし("README", "application/octet-stream")]
    fn test_ファイル添付のcontent_typeは拡張子で決まる(
        #[case] file_name: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(content_type_of(Path::new(file_name)), expected);
    }

    #[tokio::test]
    async fn test_読み込めない添付ファイルは送信前に失敗する() {
        let email = EmailMessage::plain("alice@example.com", "Hello", "body").with_attachment(
            MailAttachment::File("/nonexistent/dir/missing.txt".into()),
        );

        let result = transport().deliver(&email).await;
        assert!(matches!(result, Err(NotificationError::AttachmentFailed(_))));
    }
}
