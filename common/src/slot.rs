//! アップロード枠の状態管理
//!
//! - 送信ごとに単調増加のチケットを発行し、最後に発行したものだけを反映する
//!   （応答順ではなく発行順で勝つ）
//! - リセットトークンが変化したら表示状態を無条件にクリアする

use crate::kind::ItemKind;
use crate::render::{self, SlotView};
use crate::scanner::{ScanPayload, ScannerKind};

/// 親から配られるリセット信号。値が変わったことだけに意味がある
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ResetToken(u64);

impl ResetToken {
    pub fn next(self) -> Self {
        ResetToken(self.0.wrapping_add(1))
    }
}

/// 送信1回分の識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Ticket {
    target: ItemKind,
    seq: u64,
}

impl Ticket {
    pub fn target(&self) -> ItemKind {
        self.target
    }
}

/// 応答を反映した結果
#[derive(Debug, Clone, PartialEq)]
pub enum SlotOutcome {
    /// 結果を置き換えた（親へ成功通知）
    Applied,
    /// 結果をクリアした（親へエラー通知）
    Failed(String),
    /// より新しい送信（またはリセット）があるため表示には反映しない。
    /// `succeeded` はバックエンドが受理したかどうか
    Stale { succeeded: bool },
}

/// 1つのアップロード枠
#[derive(Debug, Clone)]
pub struct UploadSlot<T> {
    result: Option<T>,
    file_name: Option<String>,
    issued: u64,
    in_flight: usize,
}

impl<T> Default for UploadSlot<T> {
    fn default() -> Self {
        Self {
            result: None,
            file_name: None,
            issued: 0,
            in_flight: 0,
        }
    }
}

impl<T> UploadSlot<T> {
    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// 送信開始。ファイル名は即座に表示へ反映する
    pub fn begin(&mut self, file_name: impl Into<String>) -> u64 {
        self.file_name = Some(file_name.into());
        self.issued += 1;
        self.in_flight += 1;
        self.issued
    }

    /// 応答を反映。`seq` が最新でなければ何もしない
    pub fn complete(&mut self, seq: u64, outcome: Result<T, String>) -> SlotOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if seq != self.issued {
            return SlotOutcome::Stale {
                succeeded: outcome.is_ok(),
            };
        }

        match outcome {
            Ok(value) => {
                self.result = Some(value);
                SlotOutcome::Applied
            }
            Err(message) => {
                self.result = None;
                SlotOutcome::Failed(message)
            }
        }
    }

    /// 表示状態をクリアし、進行中の送信を無効化する
    pub fn clear(&mut self) {
        self.result = None;
        self.file_name = None;
        self.issued += 1;
    }
}

/// 1ウィジェット分の状態（カードは表裏2枠）
#[derive(Debug, Clone)]
pub struct ScannerState {
    kind: ScannerKind,
    slots: Vec<UploadSlot<ScanPayload>>,
    seen_token: ResetToken,
}

impl ScannerState {
    pub fn new(kind: ScannerKind) -> Self {
        Self {
            kind,
            slots: kind.targets().iter().map(|_| UploadSlot::default()).collect(),
            seen_token: ResetToken::default(),
        }
    }

    pub fn kind(&self) -> ScannerKind {
        self.kind
    }

    pub fn slot(&self, target: ItemKind) -> Option<&UploadSlot<ScanPayload>> {
        self.index_of(target).map(|i| &self.slots[i])
    }

    pub fn is_loading(&self) -> bool {
        self.slots.iter().any(UploadSlot::is_loading)
    }

    /// `target` がこのウィジェットの枠でなければ `None`
    pub fn begin(&mut self, target: ItemKind, file_name: impl Into<String>) -> Option<Ticket> {
        let index = self.index_of(target)?;
        let seq = self.slots[index].begin(file_name);
        Some(Ticket { target, seq })
    }

    /// 応答（成功ボディの解析結果 or 表示用エラーメッセージ）を反映
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<ScanPayload, String>) -> SlotOutcome {
        let Some(index) = self.index_of(ticket.target) else {
            return SlotOutcome::Stale {
                succeeded: outcome.is_ok(),
            };
        };
        let outcome = match outcome {
            Ok(payload) => match payload.matches(ticket.target) {
                Ok(()) => Ok(payload),
                Err(_) => Err(self.kind.fallback_message().to_string()),
            },
            Err(message) => Err(message),
        };
        self.slots[index].complete(ticket.seq, outcome)
    }

    /// リセットトークンを観測。変化していればクリアして `true`
    pub fn observe_reset(&mut self, token: ResetToken) -> bool {
        if token == self.seen_token {
            return false;
        }
        self.seen_token = token;
        self.slots.iter_mut().for_each(UploadSlot::clear);
        true
    }

    /// 表示用モデル（枠ごと）
    pub fn views(&self) -> Vec<SlotView> {
        self.kind
            .targets()
            .iter()
            .zip(&self.slots)
            .map(|(target, slot)| render::slot_view(*target, slot.file_name(), slot.result()))
            .collect()
    }

    fn index_of(&self, target: ItemKind) -> Option<usize> {
        self.kind.targets().iter().position(|t| *t == target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{BarcodeData, BarcodeEntry, CheckbookData};
    use serde_json::json;

    fn barcode(data: &str) -> ScanPayload {
        ScanPayload::Barcode(BarcodeData {
            barcodes: vec![BarcodeEntry {
                symbology: "CODE128".to_string(),
                data: data.to_string(),
            }],
        })
    }

    #[test]
    fn test_success_replaces_result() {
        let mut state = ScannerState::new(ScannerKind::Barcode);
        let ticket = state.begin(ItemKind::Barcode, "a.jpg").unwrap();
        assert!(state.is_loading());

        assert_eq!(state.complete(ticket, Ok(barcode("1"))), SlotOutcome::Applied);
        assert!(!state.is_loading());

        let ticket = state.begin(ItemKind::Barcode, "b.jpg").unwrap();
        state.complete(ticket, Ok(barcode("2")));

        let slot = state.slot(ItemKind::Barcode).unwrap();
        assert_eq!(slot.result(), Some(&barcode("2")));
        assert_eq!(slot.file_name(), Some("b.jpg"));
    }

    #[test]
    fn test_failure_clears_result_but_keeps_file_name() {
        let mut state = ScannerState::new(ScannerKind::Barcode);
        let ticket = state.begin(ItemKind::Barcode, "a.jpg").unwrap();
        state.complete(ticket, Ok(barcode("1")));

        let ticket = state.begin(ItemKind::Barcode, "blurry.jpg").unwrap();
        let outcome = state.complete(ticket, Err("No barcode found".to_string()));

        assert_eq!(outcome, SlotOutcome::Failed("No barcode found".to_string()));
        let slot = state.slot(ItemKind::Barcode).unwrap();
        assert!(slot.result().is_none());
        assert_eq!(slot.file_name(), Some("blurry.jpg"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_last_issued_wins() {
        let mut state = ScannerState::new(ScannerKind::Barcode);
        let first = state.begin(ItemKind::Barcode, "first.jpg").unwrap();
        let second = state.begin(ItemKind::Barcode, "second.jpg").unwrap();

        // 2件目が先に返り、1件目が後から返る
        assert_eq!(state.complete(second, Ok(barcode("new"))), SlotOutcome::Applied);
        assert!(state.is_loading());
        assert_eq!(
            state.complete(first, Ok(barcode("old"))),
            SlotOutcome::Stale { succeeded: true }
        );
        assert!(!state.is_loading());

        let slot = state.slot(ItemKind::Barcode).unwrap();
        assert_eq!(slot.result(), Some(&barcode("new")));
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut state = ScannerState::new(ScannerKind::Barcode);
        let first = state.begin(ItemKind::Barcode, "first.jpg").unwrap();
        let second = state.begin(ItemKind::Barcode, "second.jpg").unwrap();
        state.complete(second, Ok(barcode("ok")));

        assert_eq!(
            state.complete(first, Err("boom".to_string())),
            SlotOutcome::Stale { succeeded: false }
        );
        assert!(state.slot(ItemKind::Barcode).unwrap().result().is_some());
    }

    #[test]
    fn test_reset_token_change_clears_regardless_of_direction() {
        let mut state = ScannerState::new(ScannerKind::Checkbook);
        let ticket = state.begin(ItemKind::Checkbook, "cheque.png").unwrap();
        state.complete(ticket, Ok(ScanPayload::Checkbook(CheckbookData::default())));

        assert!(!state.observe_reset(ResetToken::default()));
        assert!(state.slot(ItemKind::Checkbook).unwrap().result().is_some());

        let token = ResetToken::default().next();
        assert!(state.observe_reset(token));
        let slot = state.slot(ItemKind::Checkbook).unwrap();
        assert!(slot.result().is_none());
        assert!(slot.file_name().is_none());

        // 元の値へ戻る変化でもクリアされる
        let ticket = state.begin(ItemKind::Checkbook, "again.png").unwrap();
        state.complete(ticket, Ok(ScanPayload::Checkbook(CheckbookData::default())));
        assert!(state.observe_reset(ResetToken::default()));
        assert!(state.slot(ItemKind::Checkbook).unwrap().result().is_none());
    }

    #[test]
    fn test_reset_invalidates_in_flight_upload() {
        let mut state = ScannerState::new(ScannerKind::Barcode);
        let ticket = state.begin(ItemKind::Barcode, "a.jpg").unwrap();
        state.observe_reset(ResetToken::default().next());

        assert_eq!(
            state.complete(ticket, Ok(barcode("late"))),
            SlotOutcome::Stale { succeeded: true }
        );
        assert!(state.slot(ItemKind::Barcode).unwrap().result().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_card_sides_are_independent() {
        let mut state = ScannerState::new(ScannerKind::Card);
        let front = state.begin(ItemKind::CardFront, "front.jpg").unwrap();
        let back = state.begin(ItemKind::CardBack, "back.jpg").unwrap();

        state.complete(front, Ok(ScanPayload::Card(json!({"format": "JPEG"}))));
        state.complete(back, Err("Failed to upload card".to_string()));

        assert!(state.slot(ItemKind::CardFront).unwrap().result().is_some());
        assert!(state.slot(ItemKind::CardBack).unwrap().result().is_none());
        assert_eq!(state.views().len(), 2);
    }

    #[test]
    fn test_foreign_target_is_rejected() {
        let mut state = ScannerState::new(ScannerKind::Pdf417);
        assert!(state.begin(ItemKind::Barcode, "x.jpg").is_none());
    }

    #[test]
    fn test_mismatched_payload_becomes_failure() {
        let mut state = ScannerState::new(ScannerKind::Checkbook);
        let ticket = state.begin(ItemKind::Checkbook, "x.png").unwrap();
        let outcome = state.complete(ticket, Ok(barcode("1")));
        assert_eq!(outcome, SlotOutcome::Failed("Failed to upload checkbook".to_string()));
    }
}
