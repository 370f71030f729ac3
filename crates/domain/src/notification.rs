//! # 通知
//!
//! メール通知に関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`TodoNotification`] | 通知イベント | 5 種類: 作成、割り当て、完了、期限間近、日次サマリ |
//! | [`NotificationEventType`] | 通知イベント種別 | ログ出力用の識別子 |
//! | [`EmailMessage`] | メールメッセージ | 宛先・件名・本文を確定した送信単位 |
//!
//! ## 設計方針
//!
//! - **enum による通知イベント**: 各バリアントが Todo の状態変化に対応
//! - **読み取り専用スナップショット**: 通知イベントはエンティティを借用するだけで変更しない
//! - **fire-and-forget**: 通知送信の失敗は Todo 操作に影響しない
//! - **テンプレート分離**: 通知イベントとメール本文の生成は分離（TemplateRenderer は core-service）

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::{
    person::Person,
    todo::{Attachment, Todo},
};

/// 通知送信エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 宛先が不正（空のメールアドレスなど）
    #[error("宛先が不正です: {0}")]
    InvalidRecipient(String),

    /// メッセージの組み立てに失敗（アドレス形式不正など）
    #[error("メッセージ構築に失敗: {0}")]
    MessageBuild(String),

    /// 添付ファイルの読み込みに失敗
    #[error("添付ファイルの読み込みに失敗: {0}")]
    AttachmentFailed(String),

    /// メール送信に失敗（接続拒否、認証失敗など）
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 通知イベント種別
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationEventType {
    /// Todo 作成 → 担当者に送信
    Created,
    /// Todo 割り当て → 担当者に送信
    Assigned,
    /// Todo 完了 → 関係者に送信
    Completed,
    /// 期限間近（期限切れを含む）→ 担当者に送信
    DueSoon,
    /// 日次サマリ → 人物ごとに送信
    DailySummary,
}

/// 本文の形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BodyFormat {
    /// `text/plain`
    PlainText,
    /// `text/html`
    Html,
}

/// メール添付ファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailAttachment {
    /// ファイルシステム上のファイル（送信時に読み込む）
    File(PathBuf),
    /// メモリ上のデータ（Todo の添付ファイルなど）
    Stored {
        file_name:    String,
        content_type: String,
        data:         Vec<u8>,
    },
}

impl From<&Attachment> for MailAttachment {
    fn from(attachment: &Attachment) -> Self {
        Self::Stored {
            file_name:    attachment.file_name().as_str().to_string(),
            content_type: attachment.file_type().as_str().to_string(),
            data:         attachment.data().to_vec(),
        }
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングと宛先解決の出力。MailTransport に渡される。
/// 永続化はしない（組み立て → 送信 → 破棄）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信先メールアドレス
    pub to:         String,
    /// CC
    pub cc:         Vec<String>,
    /// BCC
    pub bcc:        Vec<String>,
    /// 件名
    pub subject:    String,
    /// 本文
    pub body:       String,
    /// 本文の形式
    pub format:     BodyFormat,
    /// 添付ファイル（任意、1 件まで）
    pub attachment: Option<MailAttachment>,
}

impl EmailMessage {
    /// プレーンテキストのメッセージを作成する
    pub fn plain(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_format(to, subject, body, BodyFormat::PlainText)
    }

    /// HTML のメッセージを作成する
    pub fn html(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::with_format(to, subject, body, BodyFormat::Html)
    }

    fn with_format(
        to: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
        format: BodyFormat,
    ) -> Self {
        Self {
            to: to.into(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
            format,
            attachment: None,
        }
    }

    /// CC を追加する
    pub fn with_cc(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.cc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// BCC を追加する
    pub fn with_bcc(mut self, addresses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.bcc.extend(addresses.into_iter().map(Into::into));
        self
    }

    /// 添付ファイルを設定する
    pub fn with_attachment(mut self, attachment: MailAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// To / CC / BCC を合わせた全宛先
    pub fn all_recipients(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.to.as_str())
            .chain(self.cc.iter().map(String::as_str))
            .chain(self.bcc.iter().map(String::as_str))
    }

    /// 空白のみ・空の宛先が含まれていないことを確認する
    ///
    /// 位置は To を 0 番目として CC → BCC の順に数える。
    pub fn ensure_recipients(&self) -> Result<(), NotificationError> {
        match self.all_recipients().position(|r| r.trim().is_empty()) {
            Some(position) => Err(NotificationError::InvalidRecipient(format!(
                "{position} 番目の宛先が空です"
            ))),
            None => Ok(()),
        }
    }
}

/// Todo 通知イベント
///
/// 各バリアントが Todo の状態変化に対応する。
/// エンティティは借用のみで、通知処理の間は不変のスナップショットとして扱う。
#[derive(Debug, Clone, Copy)]
pub enum TodoNotification<'a> {
    /// Todo 作成
    Created {
        todo:      &'a Todo,
        recipient: &'a Person,
    },
    /// Todo 割り当て
    Assigned {
        todo:     &'a Todo,
        assignee: &'a Person,
    },
    /// Todo 完了
    Completed {
        todo:      &'a Todo,
        recipient: &'a Person,
    },
    /// 期限間近のリマインダー
    DueSoon {
        todo:      &'a Todo,
        recipient: &'a Person,
    },
    /// 日次サマリ（入力順を保持する）
    DailySummary {
        person: &'a Person,
        todos:  &'a [Todo],
    },
}

impl<'a> TodoNotification<'a> {
    /// 通知イベント種別を返す
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::Created { .. } => NotificationEventType::Created,
            Self::Assigned { .. } => NotificationEventType::Assigned,
            Self::Completed { .. } => NotificationEventType::Completed,
            Self::DueSoon { .. } => NotificationEventType::DueSoon,
            Self::DailySummary { .. } => NotificationEventType::DailySummary,
        }
    }

    /// 通知を受け取る人物を返す
    pub fn recipient(&self) -> &'a Person {
        match *self {
            Self::Created { recipient, .. }
            | Self::Completed { recipient, .. }
            | Self::DueSoon { recipient, .. } => recipient,
            Self::Assigned { assignee, .. } => assignee,
            Self::DailySummary { person, .. } => person,
        }
    }

    /// 対象の Todo を返す（日次サマリは単一の Todo を持たない）
    pub fn todo(&self) -> Option<&'a Todo> {
        match *self {
            Self::Created { todo, .. }
            | Self::Assigned { todo, .. }
            | Self::Completed { todo, .. }
            | Self::DueSoon { todo, .. } => Some(todo),
            Self::DailySummary { .. } => None,
        }
    }
}
