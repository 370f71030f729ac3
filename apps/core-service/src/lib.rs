//! # Core Service ライブラリ
//!
//! Core Service の設定・ユースケース・ハンドラを公開する。
//! 結合テストから通知フロー全体を組み立てられるようにする。

pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
