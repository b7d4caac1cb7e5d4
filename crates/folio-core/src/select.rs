//! Multi-select coordinator for the editor canvas.
//!
//! Tracks the selected set plus the anchor used for shift-click range
//! selection. The coordinator never looks at cards directly; callers pass
//! the current display order so range selection follows whatever ordering
//! the canvas shows. Stale ids (cards deleted since the last click) degrade
//! to single-select rather than erroring.

use std::collections::HashSet;

use crate::card::CardId;

/// Selected card set plus the shift-click anchor.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<CardId>,
    anchor: Option<CardId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a canvas click.
    ///
    /// Shift with a live anchor selects the contiguous run between the
    /// anchor and the clicked card in `ordered_ids` (anchor retained, so
    /// repeated shift-clicks re-extend from the same point). Everything
    /// else, including a shift-click whose anchor no longer exists, selects
    /// just the clicked card and re-anchors on it.
    ///
    /// A plain click never toggles membership: clicking the sole selected
    /// card keeps it selected, since a deselected card cannot usefully be
    /// the new anchor. Membership toggling is the separate ctrl-style
    /// [`Selection::toggle`].
    pub fn handle_click(&mut self, ordered_ids: &[CardId], card_id: &CardId, shift: bool) {
        if shift {
            let anchor_pos = self
                .anchor
                .as_ref()
                .and_then(|a| ordered_ids.iter().position(|id| id == a));
            let target_pos = ordered_ids.iter().position(|id| id == card_id);
            if let (Some(a), Some(t)) = (anchor_pos, target_pos) {
                let (lo, hi) = if a <= t { (a, t) } else { (t, a) };
                self.selected = ordered_ids[lo..=hi].iter().cloned().collect();
                return;
            }
            tracing::debug!(card = %card_id, "shift-click without a live anchor, single-selecting");
        }
        self.selected.clear();
        self.selected.insert(card_id.clone());
        self.anchor = Some(card_id.clone());
    }

    /// Ctrl-style toggle: add or remove a single card without clearing the
    /// rest. Toggling on moves the anchor; toggling off drops the anchor if
    /// it pointed at the removed card.
    pub fn toggle(&mut self, card_id: &CardId) {
        if self.selected.remove(card_id) {
            if self.anchor.as_ref() == Some(card_id) {
                self.anchor = None;
            }
        } else {
            self.selected.insert(card_id.clone());
            self.anchor = Some(card_id.clone());
        }
    }

    /// Bulk-replace the selected set (box-select). The anchor is left alone
    /// so a following shift-click still extends from the last clicked card.
    pub fn set_selected(&mut self, ids: impl IntoIterator<Item = CardId>) {
        self.selected = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    pub fn is_selected(&self, card_id: &CardId) -> bool {
        self.selected.contains(card_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn anchor(&self) -> Option<&CardId> {
        self.anchor.as_ref()
    }

    /// Selected ids in the order they appear in `ordered_ids`. Ids that are
    /// no longer on the canvas are skipped.
    pub fn selected_in_order(&self, ordered_ids: &[CardId]) -> Vec<CardId> {
        ordered_ids
            .iter()
            .filter(|id| self.selected.contains(*id))
            .cloned()
            .collect()
    }
}
