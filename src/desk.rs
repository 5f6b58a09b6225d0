//! オーケストレータ
//!
//! 4つのスキャナとレポートセクションを束ね、エラーバナー・セッション再取得・
//! リセットを調停する。セッション集約は常に「無効化して再取得」で扱い、
//! クライアント側でマージしない。

use crate::api::{ScanApi, GENERATE_FALLBACK, RESET_FAILED};
use crate::error::{DocscanError, Result};
use crate::input::UploadFile;
use docscan_common::{
    ItemKind, PdfReport, ReportRequest, ReportSection, ResetToken, ScanPayload, ScannerKind,
    ScannerState, SelectionSet, SessionAggregate, SlotOutcome, Ticket,
};
use tracing::{error, info, warn};

pub struct Desk<A: ScanApi> {
    api: A,
    session: Option<SessionAggregate>,
    banner: Option<String>,
    resetting: bool,
    reset_token: ResetToken,
    scanners: Vec<ScannerState>,
    report: ReportSection,
}

impl<A: ScanApi> Desk<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            session: None,
            banner: None,
            resetting: false,
            reset_token: ResetToken::default(),
            scanners: ScannerKind::ALL.iter().map(|k| ScannerState::new(*k)).collect(),
            report: ReportSection::new(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn session(&self) -> Option<&SessionAggregate> {
        self.session.as_ref()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn report(&self) -> &ReportSection {
        &self.report
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting
    }

    pub fn reset_token(&self) -> ResetToken {
        self.reset_token
    }

    pub fn scanner(&self, kind: ScannerKind) -> &ScannerState {
        let index = ScannerKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
        &self.scanners[index]
    }

    fn scanner_mut(&mut self, kind: ScannerKind) -> &mut ScannerState {
        let index = ScannerKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
        &mut self.scanners[index]
    }

    /// セッション集約の取得（ベストエフォート。失敗はログのみ）
    pub async fn load_session(&mut self) {
        match self.api.fetch_session().await {
            Ok(session) => {
                self.report.compute_availability(Some(&session));
                info!(uploaded = ?session.uploaded_kinds(), "セッションを取得");
                self.session = Some(session);
            }
            Err(e) => warn!("セッション取得に失敗: {}", e),
        }
    }

    /// 1ファイルをアップロードして結果を反映
    pub async fn upload(&mut self, target: ItemKind, file: &UploadFile) -> Result<SlotOutcome> {
        let ticket = self.begin_upload(target, &file.file_name)?;
        let outcome = self.api.upload(target, file).await;
        Ok(self.finish_upload(ticket, outcome).await)
    }

    /// 送信開始（表示にファイル名を出し、チケットを発行）
    pub fn begin_upload(&mut self, target: ItemKind, file_name: &str) -> Result<Ticket> {
        self.scanner_mut(ScannerKind::for_item(target))
            .begin(target, file_name)
            .ok_or_else(|| {
                DocscanError::from(docscan_common::Error::UnknownKind(format!(
                    "no upload slot for {}",
                    target
                )))
            })
    }

    /// 応答を反映し、成功ならバナーを消してセッションを再取得。
    /// 表示に反映しない古い応答でも、バックエンドが受理していれば再取得する
    pub async fn finish_upload(&mut self, ticket: Ticket, outcome: Result<ScanPayload>) -> SlotOutcome {
        let kind = ScannerKind::for_item(ticket.target());
        let outcome = outcome.map_err(|e| {
            warn!(item = %ticket.target(), "アップロード失敗: {}", e);
            e.banner_message(kind.fallback_message())
        });

        let applied = self.scanner_mut(kind).complete(ticket, outcome);
        match &applied {
            SlotOutcome::Applied => {
                self.banner = None;
                self.load_session().await;
            }
            SlotOutcome::Failed(message) => self.banner = Some(message.clone()),
            SlotOutcome::Stale { succeeded } => {
                info!(item = %ticket.target(), succeeded, "古い応答を破棄");
                if *succeeded {
                    self.load_session().await;
                }
            }
        }
        applied
    }

    /// レポートセクションの「Reset Session」ボタン
    pub async fn request_reset(&mut self) -> Result<bool> {
        if !self.report.reset_enabled(self.resetting) {
            return Err(docscan_common::Error::InvalidState(
                "reset is disabled while nothing is uploaded".to_string(),
            )
            .into());
        }
        Ok(self.reset().await)
    }

    /// セッションを破棄して全スキャナをクリア。成功したら `true`
    pub async fn reset(&mut self) -> bool {
        self.resetting = true;

        let succeeded = match self.api.reset().await {
            Ok(()) => {
                self.session = None;
                self.banner = None;
                self.report.compute_availability(None);
                self.reset_token = self.reset_token.next();
                let token = self.reset_token;
                for scanner in &mut self.scanners {
                    scanner.observe_reset(token);
                }
                info!("セッションをリセット");
                self.load_session().await;
                true
            }
            Err(e) => {
                warn!("リセットに失敗: {}", e);
                self.banner = Some(RESET_FAILED.to_string());
                false
            }
        };

        self.resetting = false;
        succeeded
    }

    pub fn open_selection(&mut self) -> Result<()> {
        Ok(self.report.open_selection()?)
    }

    pub fn cancel_selection(&mut self) -> Result<()> {
        Ok(self.report.cancel_selection()?)
    }

    pub fn toggle_selection(&mut self, kind: ItemKind) -> Result<()> {
        Ok(self.report.toggle_selection(kind)?)
    }

    /// 開いている選択セットを `desired` に合わせる（差分だけトグル）
    pub fn choose_selection(&mut self, desired: SelectionSet) -> Result<()> {
        let current = self.report.selection();
        for kind in ItemKind::ALL {
            if current.get(kind) != desired.get(kind) {
                self.report.toggle_selection(kind)?;
            }
        }
        Ok(())
    }

    /// 全項目のレポート
    pub async fn generate_all(&mut self) -> Result<PdfReport> {
        if self.resetting {
            return Err(docscan_common::Error::InvalidState("reset in progress".to_string()).into());
        }
        let request = self.report.begin_generate_all()?;
        self.run_generation(request).await
    }

    /// 選択セットでのレポート（成功時はモーダルを閉じる）
    pub async fn generate_selective(&mut self) -> Result<PdfReport> {
        let request = self.report.begin_generate_selective()?;
        self.run_generation(request).await
    }

    async fn run_generation(&mut self, request: ReportRequest) -> Result<PdfReport> {
        match self.api.generate(request).await {
            Ok(report) => {
                self.report.finish(true);
                info!(file = %report.file_name, bytes = report.bytes.len(), "レポート生成");
                Ok(report)
            }
            Err(e) => {
                error!("PDF生成に失敗: {}", e);
                self.banner = Some(e.banner_message(GENERATE_FALLBACK));
                self.report.finish(false);
                Err(e)
            }
        }
    }
}

impl<A: ScanApi> std::fmt::Debug for Desk<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desk")
            .field("session", &self.session)
            .field("banner", &self.banner)
            .field("resetting", &self.resetting)
            .field("report", &self.report)
            .finish()
    }
}
