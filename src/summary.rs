//! `session` コマンドの表示

use chrono::{DateTime, NaiveDateTime};
use docscan_common::{ItemKind, ReportSection, SessionAggregate};

/// バックエンドの ISO 8601 文字列を表示用に整形（解釈できなければそのまま）
pub fn display_timestamp(raw: &str) -> String {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format(FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// 項目ごとの状態行とボタンの可否
pub fn session_lines(session: &SessionAggregate, report: &ReportSection) -> Vec<String> {
    let mut lines: Vec<String> = ItemKind::ALL
        .iter()
        .map(|kind| {
            if !session.is_present(*kind) {
                return format!("  ・{:<14} 未登録", kind.label());
            }
            let at = session
                .uploaded_at(*kind)
                .map(display_timestamp)
                .unwrap_or_else(|| "-".to_string());
            match session.file_name(*kind) {
                Some(name) => format!("  ✔ {:<14} {} ({})", kind.label(), at, name),
                None => format!("  ✔ {:<14} {}", kind.label(), at),
            }
        })
        .collect();

    lines.push(String::new());
    let state = if report.generate_enabled(false) {
        "生成可能"
    } else {
        "アップロードなし"
    };
    lines.push(format!("レポート: {}", state));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_timestamp_naive_iso() {
        assert_eq!(display_timestamp("2024-05-01T09:30:15.123456"), "2024-05-01 09:30:15");
    }

    #[test]
    fn test_display_timestamp_rfc3339() {
        assert_eq!(display_timestamp("2024-05-01T09:30:15+09:00"), "2024-05-01 09:30:15");
    }

    #[test]
    fn test_display_timestamp_passthrough() {
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_session_lines() {
        let session: SessionAggregate = serde_json::from_value(json!({
            "barcode": {"barcodes": []},
            "card_back": {"filename": "back.jpg"},
            "timestamps": {"card_back": "2024-05-01T09:30:15"}
        }))
        .unwrap();
        let mut report = ReportSection::new();
        report.compute_availability(Some(&session));

        let lines = session_lines(&session, &report);

        assert!(lines[0].starts_with("  ✔"));
        assert!(lines[1].contains("未登録"));
        assert!(lines[4].contains("2024-05-01 09:30:15 (back.jpg)"));
        assert_eq!(lines.last().unwrap(), "レポート: 生成可能");
    }
}
