//! 選択生成用の選択セット

use crate::kind::ItemKind;
use serde::{Deserialize, Serialize};

/// `POST /generate-pdf-selective` のリクエストボディ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    pub barcode: bool,
    pub pdf417: bool,
    pub checkbook: bool,
    pub card_front: bool,
    pub card_back: bool,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self {
            barcode: true,
            pdf417: true,
            checkbook: true,
            card_front: true,
            card_back: true,
        }
    }
}

impl SelectionSet {
    /// 指定した種別のみを含む選択セット
    pub fn only(kinds: &[ItemKind]) -> Self {
        let mut set = Self::none();
        for kind in kinds {
            set.set(*kind, true);
        }
        set
    }

    /// `offered` のうち `chosen` に入っているものだけを含める。
    /// 提示しなかった種別のフラグはそのまま残す
    pub fn with_choice(mut self, offered: &[ItemKind], chosen: &[ItemKind]) -> Self {
        for kind in offered {
            self.set(*kind, chosen.contains(kind));
        }
        self
    }

    pub fn none() -> Self {
        Self {
            barcode: false,
            pdf417: false,
            checkbook: false,
            card_front: false,
            card_back: false,
        }
    }

    pub fn get(&self, kind: ItemKind) -> bool {
        *self.slot(kind)
    }

    pub fn set(&mut self, kind: ItemKind, included: bool) {
        *self.slot_mut(kind) = included;
    }

    pub fn toggle(&mut self, kind: ItemKind) {
        let slot = self.slot_mut(kind);
        *slot = !*slot;
    }

    pub fn included(&self) -> Vec<ItemKind> {
        ItemKind::ALL.iter().copied().filter(|k| self.get(*k)).collect()
    }

    fn slot(&self, kind: ItemKind) -> &bool {
        match kind {
            ItemKind::Barcode => &self.barcode,
            ItemKind::Pdf417 => &self.pdf417,
            ItemKind::Checkbook => &self.checkbook,
            ItemKind::CardFront => &self.card_front,
            ItemKind::CardBack => &self.card_back,
        }
    }

    fn slot_mut(&mut self, kind: ItemKind) -> &mut bool {
        match kind {
            ItemKind::Barcode => &mut self.barcode,
            ItemKind::Pdf417 => &mut self.pdf417,
            ItemKind::Checkbook => &mut self.checkbook,
            ItemKind::CardFront => &mut self.card_front,
            ItemKind::CardBack => &mut self.card_back,
        }
    }
}
