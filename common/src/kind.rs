//! 取り込み項目の種別
//!
//! セッション集約・選択セット・レポートで共通に使うキー。

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// セッションで追跡される5種類の項目
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Barcode,
    Pdf417,
    Checkbook,
    CardFront,
    CardBack,
}

impl ItemKind {
    /// 表示順（UIのリスト・チェックボックス順）
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Barcode,
        ItemKind::Pdf417,
        ItemKind::Checkbook,
        ItemKind::CardFront,
        ItemKind::CardBack,
    ];

    /// バックエンドのJSONキー
    pub fn key(&self) -> &'static str {
        match self {
            ItemKind::Barcode => "barcode",
            ItemKind::Pdf417 => "pdf417",
            ItemKind::Checkbook => "checkbook",
            ItemKind::CardFront => "card_front",
            ItemKind::CardBack => "card_back",
        }
    }

    /// 画面表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Barcode => "Barcode",
            ItemKind::Pdf417 => "PDF417",
            ItemKind::Checkbook => "Checkbook",
            ItemKind::CardFront => "Card Front",
            ItemKind::CardBack => "Card Back",
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "barcode" => Ok(ItemKind::Barcode),
            "pdf417" => Ok(ItemKind::Pdf417),
            "checkbook" => Ok(ItemKind::Checkbook),
            "card_front" | "front" => Ok(ItemKind::CardFront),
            "card_back" | "back" => Ok(ItemKind::CardBack),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match_wire_format() {
        let keys: Vec<&str> = ItemKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys, vec!["barcode", "pdf417", "checkbook", "card_front", "card_back"]);
    }

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!("card-front".parse::<ItemKind>().unwrap(), ItemKind::CardFront);
        assert_eq!("BACK".parse::<ItemKind>().unwrap(), ItemKind::CardBack);
        assert_eq!(" PDF417 ".parse::<ItemKind>().unwrap(), ItemKind::Pdf417);
        assert!("passport".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&ItemKind::CardBack).unwrap();
        assert_eq!(json, "\"card_back\"");
    }
}
