//! バックエンドAPI
//!
//! デコード・PDF生成はすべてバックエンド側。ここでは呼び出し口だけを定義する。

mod http;

pub use http::HttpApi;

use crate::error::Result;
use crate::input::UploadFile;
use docscan_common::{ItemKind, PdfReport, ReportRequest, ScanPayload, SessionAggregate};

/// 生成失敗時のバナー文言
pub const GENERATE_FALLBACK: &str = "Failed to generate PDF";

/// リセット失敗時のバナー文言
pub const RESET_FAILED: &str = "Failed to reset session";

/// オーケストレータから見たバックエンド
///
/// 失敗は `DocscanError::Api` に正規化したメッセージを載せて返す。
#[allow(async_fn_in_trait)]
pub trait ScanApi {
    /// `GET /health`
    async fn health(&self) -> Result<bool>;

    /// `GET /session`
    async fn fetch_session(&self) -> Result<SessionAggregate>;

    /// `POST /reset`
    async fn reset(&self) -> Result<()>;

    /// `POST /upload/*`（`target` で枠とフィールド名が決まる）
    async fn upload(&self, target: ItemKind, file: &UploadFile) -> Result<ScanPayload>;

    /// `GET /generate-pdf` または `POST /generate-pdf-selective`
    async fn generate(&self, request: ReportRequest) -> Result<PdfReport>;
}
