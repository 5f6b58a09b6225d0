use super::{ScanApi, GENERATE_FALLBACK, RESET_FAILED};
use crate::error::{DocscanError, Result};
use crate::input::UploadFile;
use docscan_common::{
    failure_message, field_name, ItemKind, PdfReport, ReportRequest, ScanPayload, ScannerKind,
    SessionAggregate,
};
use reqwest::header::CONTENT_DISPOSITION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, instrument};

/// reqwestによる実装
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// `timeout` が `None` なら無制限（ブラウザ版と同じ）
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().connect_timeout(Duration::from_secs(10));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 2xx以外をバナー用メッセージ付きのエラーへ
async fn reject(response: Response, fallback: &str) -> DocscanError {
    let status = response.status().as_u16();
    let body = response.text().await.ok();
    let message = failure_message(body.as_deref(), fallback);
    debug!(status, %message, "バックエンドがエラーを返しました");
    DocscanError::Api { status, message }
}

impl ScanApi for HttpApi {
    async fn health(&self) -> Result<bool> {
        let response = self.client.get(self.url("/health")).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: serde_json::Value = response.json().await?;
        Ok(body.get("status").and_then(|s| s.as_str()) == Some("ok"))
    }

    #[instrument(skip(self))]
    async fn fetch_session(&self) -> Result<SessionAggregate> {
        let response = self.client.get(self.url("/session")).send().await?;
        if !response.status().is_success() {
            return Err(reject(response, "Failed to load session").await);
        }
        Ok(response.json().await?)
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<()> {
        let response = self.client.post(self.url("/reset")).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(DocscanError::Api {
                status,
                message: RESET_FAILED.to_string(),
            });
        }
        Ok(())
    }

    #[instrument(skip(self, file), fields(file = %file.file_name))]
    async fn upload(&self, target: ItemKind, file: &UploadFile) -> Result<ScanPayload> {
        let scanner = ScannerKind::for_item(target);
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(file.mime)?;
        let form = Form::new().part(field_name(target), part);

        debug!(endpoint = scanner.endpoint(), bytes = file.bytes.len(), "アップロード送信");
        let response = self
            .client
            .post(self.url(scanner.endpoint()))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(reject(response, scanner.fallback_message()).await);
        }

        let body = response.text().await?;
        Ok(ScanPayload::parse(target, &body)?)
    }

    #[instrument(skip(self))]
    async fn generate(&self, request: ReportRequest) -> Result<PdfReport> {
        let builder = match request {
            ReportRequest::All => self.client.get(self.url("/generate-pdf")),
            ReportRequest::Selective(selection) => self
                .client
                .post(self.url("/generate-pdf-selective"))
                .json(&selection),
        };
        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(reject(response, GENERATE_FALLBACK).await);
        }

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?;
        debug!(bytes = bytes.len(), ?disposition, "PDF受信");

        Ok(PdfReport::new(bytes.to_vec(), disposition.as_deref()))
    }
}
