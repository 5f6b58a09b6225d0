//! 結果パネルの表示モデル
//!
//! Web版はこのモデルからビューを組み立て、CLIは `to_text` で文字列化する。

use crate::kind::ItemKind;
use crate::scanner::{BarcodeData, CheckbookData, IdHolder, Pdf417Data, ScanPayload};
use serde_json::Value;

/// 値が無い項目の表示
pub const MISSING: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub fields: Vec<Field>,
}

/// フィールドの並べ方
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// 1項目1行
    Stacked,
    /// `A: x | B: y` の1行
    Inline,
}

/// 成功表示ブロック（見出し + 項目 + 小見出し付きセクション）
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBlock {
    pub heading: String,
    pub fields: Vec<Field>,
    pub layout: FieldLayout,
    pub sections: Vec<Section>,
}

/// 1つのアップロード枠の表示
#[derive(Debug, Clone, PartialEq)]
pub struct SlotView {
    pub target: ItemKind,
    /// カードの「Front」「Back」など。単一枠なら `None`
    pub caption: Option<&'static str>,
    pub file_name: Option<String>,
    pub blocks: Vec<ResultBlock>,
}

pub fn slot_view(target: ItemKind, file_name: Option<&str>, result: Option<&ScanPayload>) -> SlotView {
    let caption = match target {
        ItemKind::CardFront => Some("Front"),
        ItemKind::CardBack => Some("Back"),
        _ => None,
    };

    SlotView {
        target,
        caption,
        file_name: file_name.map(str::to_string),
        blocks: result.map(payload_blocks).unwrap_or_default(),
    }
}

pub fn payload_blocks(payload: &ScanPayload) -> Vec<ResultBlock> {
    match payload {
        ScanPayload::Barcode(data) => barcode_blocks(data),
        ScanPayload::Pdf417(data) => pdf417_blocks(data),
        ScanPayload::Checkbook(data) => vec![checkbook_block(data)],
        ScanPayload::Card(stored) => card_blocks(stored),
    }
}

fn field(label: &'static str, value: impl Into<String>) -> Field {
    Field { label, value: value.into() }
}

/// 空・未設定は `-`
fn or_missing(value: &Option<String>) -> String {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

fn barcode_blocks(data: &BarcodeData) -> Vec<ResultBlock> {
    let fields = data
        .barcodes
        .iter()
        .flat_map(|b| [field("Type", b.symbology.clone()), field("Data", b.data.clone())])
        .collect();

    vec![ResultBlock {
        heading: "Barcode detected!".to_string(),
        fields,
        layout: FieldLayout::Stacked,
        sections: Vec::new(),
    }]
}

fn pdf417_blocks(data: &Pdf417Data) -> Vec<ResultBlock> {
    data.pdf417_data
        .iter()
        .map(|entry| {
            let (fields, sections) = match &entry.parsed {
                None => (vec![field("Data", entry.data.clone())], Vec::new()),
                Some(parsed) => match &parsed.user {
                    Some(user) => (Vec::new(), holder_sections(user)),
                    None => (Vec::new(), Vec::new()),
                },
            };
            ResultBlock {
                heading: format!("PDF417 Detected - {}", entry.format),
                fields,
                layout: FieldLayout::Stacked,
                sections,
            }
        })
        .collect()
}

fn holder_sections(user: &IdHolder) -> Vec<Section> {
    vec![
        Section {
            title: "Personal Information",
            fields: vec![
                field("Last Name", or_missing(&user.last)),
                field("First Name", or_missing(&user.first)),
                field("Date of Birth", or_missing(&user.dob)),
                field("Sex", or_missing(&user.sex)),
            ],
        },
        Section {
            title: "Physical Description",
            fields: vec![
                field("Eye Color", or_missing(&user.eyes)),
                field("Height", or_missing(&user.height)),
                field("Weight", or_missing(&user.weight)),
            ],
        },
        Section {
            title: "Address",
            fields: vec![
                field("Street Address", or_missing(&user.street)),
                field("City", or_missing(&user.city)),
                field("State", or_missing(&user.state)),
                field("Postal Code", or_missing(&user.postal)),
                field("Country", or_missing(&user.country)),
            ],
        },
        Section {
            title: "Document Information",
            fields: vec![
                field("ID Number", or_missing(&user.id)),
                field("Expiration Date", or_missing(&user.expires)),
                field("Issue Date", or_missing(&user.issued)),
                field("Card Revision Date", or_missing(&user.card_revision)),
                field("Country", or_missing(&user.country)),
            ],
        },
    ]
}

fn checkbook_block(data: &CheckbookData) -> ResultBlock {
    let size = match data.size.as_slice() {
        [w, h, ..] => format!("{}x{}", w, h),
        _ => MISSING.to_string(),
    };

    ResultBlock {
        heading: "Checkbook uploaded!".to_string(),
        fields: vec![field("Format", data.format.clone()), field("Size", size)],
        layout: FieldLayout::Inline,
        sections: Vec::new(),
    }
}

fn card_blocks(stored: &Value) -> Vec<ResultBlock> {
    let present = match stored {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    };
    if !present {
        return Vec::new();
    }

    vec![ResultBlock {
        heading: "Uploaded successfully".to_string(),
        fields: Vec::new(),
        layout: FieldLayout::Stacked,
        sections: Vec::new(),
    }]
}

impl SlotView {
    /// 端末表示用のテキスト
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();

        if let Some(caption) = self.caption {
            lines.push(format!("[{}]", caption));
        }
        if let Some(name) = &self.file_name {
            lines.push(format!("File: {}", name));
        }

        for block in &self.blocks {
            lines.push(block.heading.clone());
            match block.layout {
                FieldLayout::Stacked => {
                    for f in &block.fields {
                        lines.push(format!("  {}: {}", f.label, f.value));
                    }
                }
                FieldLayout::Inline if !block.fields.is_empty() => {
                    let joined = block
                        .fields
                        .iter()
                        .map(|f| format!("{}: {}", f.label, f.value))
                        .collect::<Vec<_>>()
                        .join(" | ");
                    lines.push(format!("  {}", joined));
                }
                FieldLayout::Inline => {}
            }
            for section in &block.sections {
                lines.push(format!("  {}", section.title));
                for f in &section.fields {
                    lines.push(format!("    {}: {}", f.label, f.value));
                }
            }
        }

        lines.join("\n")
    }

    pub fn has_result(&self) -> bool {
        !self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{BarcodeEntry, Pdf417Entry, Pdf417Parsed};
    use serde_json::json;

    fn find<'a>(section: &'a Section, label: &str) -> &'a str {
        section
            .fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.as_str())
            .unwrap()
    }

    #[test]
    fn test_barcode_panel() {
        let payload = ScanPayload::Barcode(BarcodeData {
            barcodes: vec![BarcodeEntry {
                symbology: "CODE128".to_string(),
                data: "12345".to_string(),
            }],
        });
        let view = slot_view(ItemKind::Barcode, Some("scan.jpg"), Some(&payload));

        assert_eq!(view.blocks[0].heading, "Barcode detected!");
        assert_eq!(view.blocks[0].fields[0], field("Type", "CODE128"));
        assert_eq!(view.blocks[0].fields[1], field("Data", "12345"));
        assert_eq!(
            view.to_text(),
            "File: scan.jpg\nBarcode detected!\n  Type: CODE128\n  Data: 12345"
        );
    }

    #[test]
    fn test_pdf417_personal_information_with_missing_fields() {
        let data: Pdf417Data = serde_json::from_value(json!({
            "pdf417_data": [{
                "format": "PDF417",
                "parsed": {"user": {"last": "DOE", "first": "JANE", "dob": "01/01/1990"}}
            }]
        }))
        .unwrap();
        let blocks = payload_blocks(&ScanPayload::Pdf417(data));

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].heading, "PDF417 Detected - PDF417");
        let personal = &blocks[0].sections[0];
        assert_eq!(personal.title, "Personal Information");
        assert_eq!(find(personal, "Last Name"), "DOE");
        assert_eq!(find(personal, "First Name"), "JANE");
        assert_eq!(find(personal, "Date of Birth"), "01/01/1990");
        assert_eq!(find(personal, "Sex"), "-");

        let address = &blocks[0].sections[2];
        assert_eq!(find(address, "City"), "-");
    }

    #[test]
    fn test_pdf417_raw_data_when_not_parsed() {
        let payload = ScanPayload::Pdf417(Pdf417Data {
            pdf417_data: vec![Pdf417Entry {
                format: "PDF417".to_string(),
                data: "@ANSI 6360".to_string(),
                parsed: None,
            }],
        });
        let blocks = payload_blocks(&payload);
        assert!(blocks[0].sections.is_empty());
        assert_eq!(blocks[0].fields, vec![field("Data", "@ANSI 6360")]);
    }

    #[test]
    fn test_pdf417_parsed_without_user_shows_heading_only() {
        let payload = ScanPayload::Pdf417(Pdf417Data {
            pdf417_data: vec![Pdf417Entry {
                format: "PDF417".to_string(),
                data: "x".to_string(),
                parsed: Some(Pdf417Parsed { user: None }),
            }],
        });
        let blocks = payload_blocks(&payload);
        assert!(blocks[0].fields.is_empty());
        assert!(blocks[0].sections.is_empty());
    }

    #[test]
    fn test_checkbook_inline() {
        let payload = ScanPayload::Checkbook(CheckbookData {
            format: "PNG".to_string(),
            size: vec![1200, 540],
        });
        let view = slot_view(ItemKind::Checkbook, None, Some(&payload));
        assert_eq!(view.to_text(), "Checkbook uploaded!\n  Format: PNG | Size: 1200x540");
    }

    #[test]
    fn test_card_side_caption() {
        let payload = ScanPayload::Card(json!({"format": "JPEG"}));
        let view = slot_view(ItemKind::CardBack, Some("back.jpg"), Some(&payload));
        assert_eq!(view.to_text(), "[Back]\nFile: back.jpg\nUploaded successfully");

        let empty = slot_view(ItemKind::CardFront, None, Some(&ScanPayload::Card(Value::Null)));
        assert!(!empty.has_result());
    }
}
