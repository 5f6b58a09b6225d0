//! docscan - 書類スキャンクライアント
//!
//! バックエンド（デコード・PDF生成）へのアップロードとレポート取得を行う。

pub mod api;
pub mod cli;
pub mod config;
pub mod desk;
pub mod error;
pub mod input;
pub mod output;
pub mod summary;
