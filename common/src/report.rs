//! レポートセクションの状態遷移
//!
//! Idle → SelectionOpen → Generating → Idle の3状態。
//! 生成失敗時は直前の状態へ戻る。

use crate::error::{Error, Result};
use crate::kind::ItemKind;
use crate::selection::SelectionSet;
use crate::session::SessionAggregate;

/// `Content-Disposition` が無い・読めない場合のファイル名
pub const DEFAULT_REPORT_NAME: &str = "scan_report.pdf";

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    #[default]
    Idle,
    SelectionOpen,
    /// 生成中。`from_selection` は選択モーダルから開始したか
    Generating { from_selection: bool },
}

/// 発行すべき生成リクエスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportRequest {
    /// `GET /generate-pdf`
    All,
    /// `POST /generate-pdf-selective`
    Selective(SelectionSet),
}

/// サーバが生成したPDF
#[derive(Debug, Clone, PartialEq)]
pub struct PdfReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

impl PdfReport {
    pub fn new(bytes: Vec<u8>, content_disposition: Option<&str>) -> Self {
        Self {
            bytes,
            file_name: filename_from_disposition(content_disposition),
        }
    }
}

/// `Content-Disposition` からファイル名を取り出す
pub fn filename_from_disposition(header: Option<&str>) -> String {
    lazy_static::lazy_static! {
        static ref FILENAME_RE: regex::Regex =
            regex::Regex::new(r#"(?i)filename="?([^";]+)"?"#).unwrap();
    }

    header
        .and_then(|h| FILENAME_RE.captures(h))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_REPORT_NAME.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct ReportSection {
    mode: ReportMode,
    selection: SelectionSet,
    has_uploads: bool,
}

impl ReportSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn selection(&self) -> SelectionSet {
        self.selection
    }

    pub fn has_uploads(&self) -> bool {
        self.has_uploads
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.mode, ReportMode::Generating { .. })
    }

    /// セッション集約から「アップロードあり」を再計算
    ///
    /// 集約が未取得（`None`）ならアップロード無しとして扱う。
    pub fn compute_availability(&mut self, session: Option<&SessionAggregate>) -> bool {
        self.has_uploads = session.is_some_and(SessionAggregate::has_any_uploads);
        self.has_uploads
    }

    /// 「Generate All」「Select & Generate」ボタンが押せるか
    pub fn generate_enabled(&self, resetting: bool) -> bool {
        self.has_uploads && !self.is_generating() && !resetting
    }

    /// 「Reset Session」ボタンが押せるか
    pub fn reset_enabled(&self, resetting: bool) -> bool {
        self.has_uploads && !resetting && !self.is_generating()
    }

    pub fn open_selection(&mut self) -> Result<()> {
        self.expect_mode(ReportMode::Idle, "selection can only be opened from idle")?;
        if !self.has_uploads {
            return Err(Error::InvalidState("no uploads to select from".to_string()));
        }
        self.mode = ReportMode::SelectionOpen;
        Ok(())
    }

    /// キャンセル。通信はせず、選択セットも保持する
    pub fn cancel_selection(&mut self) -> Result<()> {
        self.expect_mode(ReportMode::SelectionOpen, "selection is not open")?;
        self.mode = ReportMode::Idle;
        Ok(())
    }

    pub fn toggle_selection(&mut self, kind: ItemKind) -> Result<()> {
        self.expect_mode(ReportMode::SelectionOpen, "selection is not open")?;
        self.selection.toggle(kind);
        Ok(())
    }

    pub fn begin_generate_all(&mut self) -> Result<ReportRequest> {
        self.expect_mode(ReportMode::Idle, "a report is already in progress")?;
        if !self.has_uploads {
            return Err(Error::InvalidState("no uploads to report".to_string()));
        }
        self.mode = ReportMode::Generating { from_selection: false };
        Ok(ReportRequest::All)
    }

    pub fn begin_generate_selective(&mut self) -> Result<ReportRequest> {
        self.expect_mode(ReportMode::SelectionOpen, "selection is not open")?;
        self.mode = ReportMode::Generating { from_selection: true };
        Ok(ReportRequest::Selective(self.selection))
    }

    /// 生成完了。成功なら Idle、失敗なら開始前の状態へ
    pub fn finish(&mut self, succeeded: bool) -> ReportMode {
        if let ReportMode::Generating { from_selection } = self.mode {
            self.mode = if from_selection && !succeeded {
                ReportMode::SelectionOpen
            } else {
                ReportMode::Idle
            };
        }
        self.mode
    }

    fn expect_mode(&self, expected: ReportMode, message: &str) -> Result<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(Error::InvalidState(message.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session_with_uploads() -> SessionAggregate {
        serde_json::from_value(json!({
            "barcode": {"barcodes": [{"type": "CODE128", "data": "1"}]},
            "card_back": {"format": "JPEG"}
        }))
        .unwrap()
    }

    fn ready() -> ReportSection {
        let mut section = ReportSection::new();
        section.compute_availability(Some(&session_with_uploads()));
        section
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(Some(r#"attachment; filename="report_123.pdf""#)),
            "report_123.pdf"
        );
        assert_eq!(
            filename_from_disposition(Some("attachment; FILENAME=Jane_Doe.pdf; size=10")),
            "Jane_Doe.pdf"
        );
        assert_eq!(filename_from_disposition(Some("attachment")), DEFAULT_REPORT_NAME);
        assert_eq!(filename_from_disposition(Some(r#"filename="""#)), DEFAULT_REPORT_NAME);
        assert_eq!(filename_from_disposition(None), DEFAULT_REPORT_NAME);
    }

    #[test]
    fn test_buttons_disabled_without_uploads() {
        let mut section = ReportSection::new();
        assert!(!section.generate_enabled(false));
        assert!(!section.reset_enabled(false));

        section.compute_availability(Some(&SessionAggregate::default()));
        assert!(!section.generate_enabled(false));
        assert!(section.open_selection().is_err());
        assert!(section.begin_generate_all().is_err());
    }

    #[test]
    fn test_buttons_disabled_while_in_flight() {
        let mut section = ready();
        assert!(section.generate_enabled(false));
        assert!(!section.generate_enabled(true));
        assert!(!section.reset_enabled(true));

        section.begin_generate_all().unwrap();
        assert!(!section.generate_enabled(false));
        assert!(!section.reset_enabled(false));
    }

    #[test]
    fn test_missing_session_means_no_uploads() {
        let mut section = ready();
        assert!(!section.compute_availability(None));
    }

    #[test]
    fn test_cancel_keeps_selection() {
        let mut section = ready();
        section.open_selection().unwrap();
        section.toggle_selection(ItemKind::CardBack).unwrap();
        section.cancel_selection().unwrap();

        assert_eq!(section.mode(), ReportMode::Idle);
        section.open_selection().unwrap();
        assert!(!section.selection().card_back);
        assert!(section.selection().barcode);
    }

    #[test]
    fn test_toggle_requires_open_selection() {
        let mut section = ready();
        assert!(section.toggle_selection(ItemKind::Barcode).is_err());
        assert_eq!(section.selection(), SelectionSet::default());
    }

    #[test]
    fn test_selective_request_carries_current_selection() {
        let mut section = ready();
        section.open_selection().unwrap();
        section.toggle_selection(ItemKind::CardBack).unwrap();

        let request = section.begin_generate_selective().unwrap();
        let ReportRequest::Selective(set) = request else {
            panic!("expected selective request");
        };
        assert!(!set.card_back);
        assert!(set.barcode && set.pdf417 && set.checkbook && set.card_front);
    }

    #[test]
    fn test_selective_success_closes_modal() {
        let mut section = ready();
        section.open_selection().unwrap();
        section.begin_generate_selective().unwrap();
        assert!(section.is_generating());
        assert_eq!(section.finish(true), ReportMode::Idle);
    }

    #[test]
    fn test_failure_returns_to_prior_mode() {
        let mut section = ready();
        section.open_selection().unwrap();
        section.begin_generate_selective().unwrap();
        assert_eq!(section.finish(false), ReportMode::SelectionOpen);

        section.cancel_selection().unwrap();
        section.begin_generate_all().unwrap();
        assert_eq!(section.finish(false), ReportMode::Idle);
        assert!(section.generate_enabled(false));
    }

    #[test]
    fn test_generate_all_not_allowed_while_generating() {
        let mut section = ready();
        section.begin_generate_all().unwrap();
        assert!(section.begin_generate_all().is_err());
        assert!(section.open_selection().is_err());
    }
}
