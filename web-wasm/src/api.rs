//! バックエンド呼び出し（fetch）
//!
//! 失敗はすべてバナーにそのまま出せる1行メッセージへ正規化して返す。

use docscan_common::{
    failure_message, field_name, ItemKind, PdfReport, ReportRequest, ScanPayload, ScannerKind,
    SessionAggregate, DEFAULT_API_URL,
};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, File, FormData, Request, RequestInit, RequestMode, Response, Url};

/// 生成失敗時のバナー文言
pub const GENERATE_FALLBACK: &str = "Failed to generate PDF";

/// リセット失敗時のバナー文言
pub const RESET_FAILED: &str = "Failed to reset session";

/// ビルド時の `DOCSCAN_API_URL`（未指定なら開発用サーバ）
pub fn api_base() -> String {
    normalize_base(option_env!("DOCSCAN_API_URL"))
}

fn normalize_base(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

fn url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn js_message(err: JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err))
}

async fn send(method: &str, path: &str, body: Option<&JsValue>, json: bool) -> Result<Response, JsValue> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(body);
    }

    let request = Request::new_with_str_and_init(&url(path), &opts)?;
    if json {
        request.headers().set("Content-Type", "application/json")?;
    }

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let value = JsFuture::from(window.fetch_with_request(&request)).await?;
    value.dyn_into()
}

async fn text(response: &Response) -> Result<String, JsValue> {
    let value = JsFuture::from(response.text()?).await?;
    Ok(value.as_string().unwrap_or_default())
}

/// 2xx以外の応答からバナー文言を作る
async fn rejection(response: &Response, fallback: &str) -> String {
    let body = text(response).await.ok();
    failure_message(body.as_deref(), fallback)
}

/// `GET /session`
pub async fn fetch_session() -> Result<SessionAggregate, String> {
    let response = send("GET", "/session", None, false).await.map_err(js_message)?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    let value = JsFuture::from(response.json().map_err(js_message)?)
        .await
        .map_err(js_message)?;
    serde_wasm_bindgen::from_value(value).map_err(|e| e.to_string())
}

/// `POST /reset`（本文は見ない）
pub async fn reset() -> Result<(), String> {
    match send("POST", "/reset", None, false).await {
        Ok(response) if response.ok() => Ok(()),
        Ok(response) => {
            web_sys::console::error_1(&format!("reset: HTTP {}", response.status()).into());
            Err(RESET_FAILED.to_string())
        }
        Err(e) => {
            web_sys::console::error_1(&e);
            Err(RESET_FAILED.to_string())
        }
    }
}

/// `POST /upload/*`
pub async fn upload(target: ItemKind, file: &File) -> Result<ScanPayload, String> {
    let scanner = ScannerKind::for_item(target);
    let fallback = scanner.fallback_message();

    let form = FormData::new().map_err(|_| fallback.to_string())?;
    form.append_with_blob_and_filename(field_name(target), file, &file.name())
        .map_err(|_| fallback.to_string())?;

    let response = match send("POST", scanner.endpoint(), Some(form.as_ref()), false).await {
        Ok(response) => response,
        Err(e) => {
            web_sys::console::error_1(&e);
            return Err(fallback.to_string());
        }
    };

    if !response.ok() {
        return Err(rejection(&response, fallback).await);
    }

    let body = text(&response).await.map_err(|_| fallback.to_string())?;
    ScanPayload::parse(target, &body).map_err(|e| {
        web_sys::console::error_1(&format!("{}: {}", scanner.endpoint(), e).into());
        fallback.to_string()
    })
}

/// `GET /generate-pdf` または `POST /generate-pdf-selective`
pub async fn generate(request: ReportRequest) -> Result<PdfReport, String> {
    let sent = match request {
        ReportRequest::All => send("GET", "/generate-pdf", None, false).await,
        ReportRequest::Selective(selection) => {
            let body = serde_json::to_string(&selection).map_err(|e| e.to_string())?;
            send("POST", "/generate-pdf-selective", Some(&JsValue::from_str(&body)), true).await
        }
    };
    let response = sent.map_err(|e| {
        web_sys::console::error_1(&e);
        GENERATE_FALLBACK.to_string()
    })?;

    if !response.ok() {
        return Err(rejection(&response, GENERATE_FALLBACK).await);
    }

    let disposition = response.headers().get("Content-Disposition").ok().flatten();
    let buffer = JsFuture::from(response.array_buffer().map_err(js_message)?)
        .await
        .map_err(js_message)?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    Ok(PdfReport::new(bytes, disposition.as_deref()))
}

/// PDFを新しいタブで開く（ダウンロードはさせない）
pub fn open_pdf(report: &PdfReport) -> Result<(), JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(report.bytes.as_slice()));

    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let object_url = Url::create_object_url_with_blob(&blob)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.open_with_url_and_target(&object_url, "_blank")?;
    Ok(())
}
