//! # 共通値オブジェクト
//!
//! 複数のエンティティで共有される値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: プリミティブ型をラップし、型安全性を確保
//! - **バリデーション**: 生成時に検証し、不正な値の存在を型レベルで排除
//! - **不変性**: 一度作成したら変更不可
//!
//! ## 含まれる型
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`PersonName`] | `String` | 人物の表示名（PII） |
//! | [`TodoTitle`] | `String` | Todo のタイトル |
//! | [`TodoDescription`] | `String` | Todo の説明 |
//! | [`FileName`] | `String` | 添付ファイル名 |
//! | [`MimeType`] | `String` | 添付ファイルの MIME タイプ |

// =========================================================================
// PersonName（氏名）
// =========================================================================

define_validated_string! {
    /// 氏名（値オブジェクト）
    ///
    /// PII（個人識別情報）のため、Debug 出力はマスクされる。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 100 文字
    pub struct PersonName {
        label: "氏名",
        max_length: 100,
        pii: true,
    }
}

// =========================================================================
// TodoTitle（Todo タイトル）
// =========================================================================

define_validated_string! {
    /// Todo タイトル（値オブジェクト）
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 100 文字
    pub struct TodoTitle {
        label: "タイトル",
        max_length: 100,
    }
}

// =========================================================================
// TodoDescription（Todo 説明）
// =========================================================================

define_validated_string! {
    /// Todo の説明（値オブジェクト）
    ///
    /// 説明そのものは任意項目。未設定は `Option::None` で表現し、
    /// 空文字列の説明は作らない。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 500 文字
    pub struct TodoDescription {
        label: "説明",
        max_length: 500,
    }
}

// =========================================================================
// FileName / MimeType（添付ファイル）
// =========================================================================

define_validated_string! {
    /// 添付ファイル名（例: `report.pdf`）
    pub struct FileName {
        label: "ファイル名",
        max_length: 255,
    }
}

define_validated_string! {
    /// 添付ファイルの MIME タイプ（例: `application/pdf`）
    pub struct MimeType {
        label: "ファイル形式",
        max_length: 100,
    }
}
