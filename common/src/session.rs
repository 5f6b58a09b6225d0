//! セッション集約（サーバ保持）のスナップショット
//!
//! クライアントは取得した値を保持するだけで、構築・マージはしない。
//! 変更後は常に再取得する。

use crate::kind::ItemKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// `GET /session` のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionAggregate {
    pub barcode: Option<Value>,
    pub pdf417: Option<Value>,
    pub checkbook: Option<Value>,
    pub card_front: Option<Value>,
    pub card_back: Option<Value>,
    /// 項目キー → アップロード時刻（ISO 8601）
    pub timestamps: BTreeMap<String, String>,
}

impl SessionAggregate {
    pub fn get(&self, kind: ItemKind) -> Option<&Value> {
        match kind {
            ItemKind::Barcode => self.barcode.as_ref(),
            ItemKind::Pdf417 => self.pdf417.as_ref(),
            ItemKind::Checkbook => self.checkbook.as_ref(),
            ItemKind::CardFront => self.card_front.as_ref(),
            ItemKind::CardBack => self.card_back.as_ref(),
        }
    }

    /// JSの真偽判定と同じ基準で「アップロード済み」を判定
    pub fn is_present(&self, kind: ItemKind) -> bool {
        self.get(kind).is_some_and(is_truthy)
    }

    pub fn has_any_uploads(&self) -> bool {
        ItemKind::ALL.iter().any(|k| self.is_present(*k))
    }

    pub fn uploaded_kinds(&self) -> Vec<ItemKind> {
        ItemKind::ALL
            .iter()
            .copied()
            .filter(|k| self.is_present(*k))
            .collect()
    }

    pub fn uploaded_at(&self, kind: ItemKind) -> Option<&str> {
        self.timestamps.get(kind.key()).map(String::as_str)
    }

    /// バックエンドが保存した元ファイル名
    pub fn file_name(&self, kind: ItemKind) -> Option<&str> {
        self.get(kind)?.get("filename")?.as_str()
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
