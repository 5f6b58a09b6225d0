//! アップロード対象ファイルの読み込み
//!
//! 拡張子・サイズのチェックはブラウザの `accept` と同じく目安のみ。
//! 外れていても警告を出して送信する（判定はバックエンド側）。

use crate::error::{DocscanError, Result};
use docscan_common::scanner::{ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
use std::path::Path;
use tracing::warn;

/// 送信する1ファイル
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for(&file_name);
        Self { file_name, bytes, mime }
    }
}

pub fn load_upload(path: &Path) -> Result<UploadFile> {
    if !path.is_file() {
        return Err(DocscanError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if !is_accepted_extension(&file_name) {
        warn!(file = %file_name, "画像形式ではない可能性があります (png/jpg/jpeg/bmp/gif)");
    }

    let size = std::fs::metadata(path)?.len();
    if size > MAX_UPLOAD_BYTES {
        warn!(file = %file_name, size, "ファイルサイズが上限の目安(50MB)を超えています");
    }

    let bytes = std::fs::read(path)?;
    Ok(UploadFile::new(file_name, bytes))
}

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

fn is_accepted_extension(file_name: &str) -> bool {
    extension(file_name).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

fn mime_for(file_name: &str) -> &'static str {
    match extension(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("bmp") => "image/bmp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
