//! スキャナ（アップロードウィジェット）の定義とレスポンス型
//!
//! 4種類のウィジェットを1つのパラメータ化された定義として扱う:
//! エンドポイント・multipartフィールド名・フォールバックメッセージ・結果型。

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ウィジェットの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerKind {
    Barcode,
    Pdf417,
    Checkbook,
    Card,
}

impl ScannerKind {
    pub const ALL: [ScannerKind; 4] = [
        ScannerKind::Barcode,
        ScannerKind::Pdf417,
        ScannerKind::Checkbook,
        ScannerKind::Card,
    ];

    pub fn endpoint(&self) -> &'static str {
        match self {
            ScannerKind::Barcode => "/upload/barcode",
            ScannerKind::Pdf417 => "/upload/pdf417",
            ScannerKind::Checkbook => "/upload/checkbook",
            ScannerKind::Card => "/upload/card",
        }
    }

    /// バックエンドが `error` を返さなかった場合のメッセージ
    pub fn fallback_message(&self) -> &'static str {
        match self {
            ScannerKind::Barcode => "Failed to decode barcode",
            ScannerKind::Pdf417 => "Failed to decode PDF417",
            ScannerKind::Checkbook => "Failed to upload checkbook",
            ScannerKind::Card => "Failed to upload card",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ScannerKind::Barcode => "Barcode Scanner",
            ScannerKind::Pdf417 => "PDF417 Scanner",
            ScannerKind::Checkbook => "Checkbook Scanner",
            ScannerKind::Card => "Card Scanner",
        }
    }

    /// アップロード欄の案内文
    pub fn prompt(&self, target: ItemKind) -> &'static str {
        match target {
            ItemKind::Barcode => "Click to upload barcode image",
            ItemKind::Pdf417 => "Click to upload PDF417 image",
            ItemKind::Checkbook => "Click to upload checkbook scan",
            ItemKind::CardFront => "Upload front",
            ItemKind::CardBack => "Upload back",
        }
    }

    /// このウィジェットが持つアップロード枠（カードのみ表裏の2枠）
    pub fn targets(&self) -> &'static [ItemKind] {
        match self {
            ScannerKind::Barcode => &[ItemKind::Barcode],
            ScannerKind::Pdf417 => &[ItemKind::Pdf417],
            ScannerKind::Checkbook => &[ItemKind::Checkbook],
            ScannerKind::Card => &[ItemKind::CardFront, ItemKind::CardBack],
        }
    }

    pub fn for_item(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Barcode => ScannerKind::Barcode,
            ItemKind::Pdf417 => ScannerKind::Pdf417,
            ItemKind::Checkbook => ScannerKind::Checkbook,
            ItemKind::CardFront | ItemKind::CardBack => ScannerKind::Card,
        }
    }
}

/// multipartのフィールド名
pub fn field_name(target: ItemKind) -> &'static str {
    match target {
        ItemKind::CardFront => "front",
        ItemKind::CardBack => "back",
        _ => "file",
    }
}

/// ブラウザの `accept` 相当（あくまで目安）
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// バックエンドの上限に合わせた目安サイズ
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// アップロード成功時のレスポンス全体
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub data: Value,
}

/// エラーレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// エラーボディから表示用メッセージを取り出す
///
/// JSONでない・`error` が無い・空文字の場合は `fallback` を返す。
pub fn failure_message(body: Option<&str>, fallback: &str) -> String {
    body.and_then(|b| serde_json::from_str::<ErrorBody>(b).ok())
        .and_then(|e| e.error)
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarcodeData {
    #[serde(default)]
    pub barcodes: Vec<BarcodeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarcodeEntry {
    #[serde(rename = "type", default)]
    pub symbology: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pdf417Data {
    #[serde(default)]
    pub pdf417_data: Vec<Pdf417Entry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pdf417Entry {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub parsed: Option<Pdf417Parsed>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pdf417Parsed {
    #[serde(default)]
    pub user: Option<IdHolder>,
}

/// AAMVA由来の所持者情報（バックエンドで整形済み）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdHolder {
    pub last: Option<String>,
    pub first: Option<String>,
    pub dob: Option<String>,
    pub sex: Option<String>,
    pub eyes: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    pub country: Option<String>,
    pub id: Option<String>,
    pub expires: Option<String>,
    pub issued: Option<String>,
    pub card_revision: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckbookData {
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub size: Vec<u32>,
}

/// ウィジェットが保持する結果（レスポンスの `data` そのもの）
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPayload {
    Barcode(BarcodeData),
    Pdf417(Pdf417Data),
    Checkbook(CheckbookData),
    /// カードは表裏それぞれの保存結果（`data.front` / `data.back`）
    Card(Value),
}

impl ScanPayload {
    /// 成功レスポンスのボディを枠に応じた型へ変換
    pub fn parse(target: ItemKind, body: &str) -> Result<Self> {
        let response: UploadResponse = serde_json::from_str(body)?;
        Self::from_data(target, response.data)
    }

    pub fn from_data(target: ItemKind, data: Value) -> Result<Self> {
        let payload = match target {
            ItemKind::Barcode => ScanPayload::Barcode(serde_json::from_value(data)?),
            ItemKind::Pdf417 => ScanPayload::Pdf417(serde_json::from_value(data)?),
            ItemKind::Checkbook => ScanPayload::Checkbook(serde_json::from_value(data)?),
            ItemKind::CardFront | ItemKind::CardBack => {
                let side = field_name(target);
                let stored = data.get(side).cloned().unwrap_or(Value::Null);
                ScanPayload::Card(stored)
            }
        };
        Ok(payload)
    }

    /// ペイロードが枠の種別と食い違っていないか
    pub fn matches(&self, target: ItemKind) -> Result<()> {
        let ok = matches!(
            (self, target),
            (ScanPayload::Barcode(_), ItemKind::Barcode)
                | (ScanPayload::Pdf417(_), ItemKind::Pdf417)
                | (ScanPayload::Checkbook(_), ItemKind::Checkbook)
                | (ScanPayload::Card(_), ItemKind::CardFront | ItemKind::CardBack)
        );
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidState(format!("payload does not belong to {}", target)))
        }
    }
}
