//! Editor-side page store.
//!
//! Owns the authoritative page state and funnels every mutation through a
//! method that records an undo snapshot first. Referential mistakes
//! (unknown ids, dead selections) are logged and ignored rather than
//! surfaced as errors; the worst outcome of a bad call is a no-op.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use web_time::Duration;

use crate::card::{epoch_millis, new_card_id, Card, CardId, CardPatch, CardSize, CardType};
use crate::history::History;
use crate::scatter::{self, ScatterPatch, ScatterPosition};
use crate::sortkey;
use crate::theme::{Profile, Theme, ThemeState};

/// Freeform decorative sticker pinned to the page background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub id: SmolStr,
    pub kind: SmolStr,
    pub x: f64,
    pub y: f64,
}

/// Read-only view of the page for persistence and preview sync. Cards are
/// pre-sorted into display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    pub cards: Vec<Card>,
    pub theme: Theme,
    pub selected_card_id: Option<CardId>,
}

/// The authoritative editor-side page state.
#[derive(Debug, Clone)]
pub struct PageStore {
    page_id: SmolStr,
    cards: Vec<Card>,
    theme: Theme,
    theme_state: ThemeState,
    profile: Profile,
    stickers: Vec<Sticker>,
    selected_card_id: Option<CardId>,
    has_changes: bool,
    last_saved_at: Option<u64>,
    history: History,
}

impl PageStore {
    pub fn new(page_id: impl Into<SmolStr>) -> Self {
        Self::with_history(page_id, History::new())
    }

    /// Store with explicit history tunables (depth bound, coalescing window).
    pub fn with_limits(
        page_id: impl Into<SmolStr>,
        max_steps: usize,
        coalesce_window: Duration,
    ) -> Self {
        Self::with_history(page_id, History::with_limits(max_steps, coalesce_window))
    }

    /// Hydrate a store from persisted state. History starts empty and the
    /// store is clean; duplicate or malformed keys from a bad import are
    /// repaired here so later moves start from a correct total order.
    pub fn load(page_id: impl Into<SmolStr>, cards: Vec<Card>, theme: Theme) -> Self {
        let mut store = Self::with_history(page_id, History::new());
        store.cards = cards;
        store.theme = theme;
        let corrupt = sortkey::has_duplicate_keys(&store.cards)
            || store
                .cards
                .iter()
                .any(|c| !sortkey::is_valid_key(&c.sort_key));
        if corrupt {
            tracing::warn!("imported sort keys are corrupt, normalizing");
            store.apply_normalized_keys();
        }
        store.has_changes = false;
        store
    }

    fn with_history(page_id: impl Into<SmolStr>, history: History) -> Self {
        Self {
            page_id: page_id.into(),
            cards: Vec::new(),
            theme: Theme::default(),
            theme_state: ThemeState::default(),
            profile: Profile::default(),
            stickers: Vec::new(),
            selected_card_id: None,
            has_changes: false,
            last_saved_at: None,
            history,
        }
    }

    // === Read access ===

    pub fn page_id(&self) -> &SmolStr {
        &self.page_id
    }

    /// Cards in storage order. Use [`PageStore::snapshot`] for display order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn theme_state(&self) -> &ThemeState {
        &self.theme_state
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    pub fn selected_card_id(&self) -> Option<&CardId> {
        self.selected_card_id.as_ref()
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    pub fn last_saved_at(&self) -> Option<u64> {
        self.last_saved_at
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Display-ordered view for persistence and `STATE_UPDATE` assembly.
    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            cards: sortkey::sorted_cards(&self.cards),
            theme: self.theme.clone(),
            selected_card_id: self.selected_card_id.clone(),
        }
    }

    // === Card mutations (all undoable) ===

    /// Create a card with type defaults at the end of the page and select it.
    pub fn add_card(&mut self, card_type: CardType, size: Option<CardSize>) -> CardId {
        self.history.record(&self.cards);
        let key = match sortkey::append_key(&self.cards) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(%err, "append hit malformed keys, normalizing first");
                self.apply_normalized_keys();
                sortkey::append_key(&self.cards).unwrap_or_else(|_| SmolStr::new_static("a0"))
            }
        };
        let mut card = Card::new(card_type, size, key);
        card.page_id = self.page_id.clone();
        let id = card.id.clone();
        self.cards.push(card);
        self.selected_card_id = Some(id.clone());
        self.has_changes = true;
        id
    }

    /// Merge a partial update into a card. Unknown ids are ignored.
    pub fn update_card(&mut self, id: &str, patch: CardPatch) -> bool {
        if !self.contains(id) {
            tracing::warn!(card = id, "update for unknown card, ignoring");
            return false;
        }
        self.history.record(&self.cards);
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
            card.apply(patch);
            card.updated_at = epoch_millis();
        }
        self.has_changes = true;
        true
    }

    /// Remove a card, clearing the selection if it pointed there.
    pub fn remove_card(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            tracing::warn!(card = id, "remove for unknown card, ignoring");
            return false;
        }
        self.history.record(&self.cards);
        self.cards.retain(|c| c.id != id);
        if self.selected_card_id.as_deref() == Some(id) {
            self.selected_card_id = None;
        }
        self.has_changes = true;
        true
    }

    /// Clone a card under a fresh id, placed immediately after the original
    /// in display order. The duplicate becomes the selection.
    pub fn duplicate_card(&mut self, id: &str) -> Option<CardId> {
        let order = sortkey::sorted_indices(&self.cards);
        let pos = order.iter().position(|&i| self.cards[i].id == id)?;
        let key = match sortkey::insert_key(&self.cards, pos + 1) {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(%err, card = id, "duplicate placement failed");
                return None;
            }
        };
        self.history.record(&self.cards);

        let mut copy = self.cards[order[pos]].clone();
        copy.id = new_card_id();
        copy.sort_key = key;
        let now = epoch_millis();
        copy.created_at = now;
        copy.updated_at = now;
        let new_id = copy.id.clone();
        self.cards.push(copy);
        self.selected_card_id = Some(new_id.clone());
        self.has_changes = true;
        Some(new_id)
    }

    /// Move `active_id` so it lands immediately before `over_id` in the
    /// order with the moved card removed. Symmetric for both drag
    /// directions: in `[A, B, C]`, dragging A onto C gives `[B, A, C]` and
    /// dragging C onto A gives `[C, A, B]`.
    pub fn reorder_cards(&mut self, active_id: &str, over_id: &str) -> bool {
        if active_id == over_id {
            return false;
        }
        if !self.contains(active_id) || !self.contains(over_id) {
            tracing::warn!(active_id, over_id, "reorder references unknown card, ignoring");
            return false;
        }
        // History is recorded only once the move is known to succeed.
        let before = self.cards.clone();
        self.repair_duplicate_keys();

        let target = match self
            .order_excluding(&[active_id])
            .iter()
            .position(|i| self.cards[*i].id == over_id)
        {
            Some(target) => target,
            None => {
                self.cards = before;
                return false;
            }
        };
        match sortkey::move_key(&self.cards, active_id, target) {
            Ok(key) => {
                self.history.record(&before);
                if let Some(card) = self.cards.iter_mut().find(|c| c.id == active_id) {
                    card.sort_key = key;
                    card.updated_at = epoch_millis();
                }
                self.has_changes = true;
                true
            }
            Err(err) => {
                tracing::warn!(%err, active_id, "reorder failed");
                self.cards = before;
                false
            }
        }
    }

    /// Move a set of cards as one contiguous block to `target_index` in the
    /// order with the block removed. The block keeps its document order, not
    /// the order the caller listed the ids in. The index is clamped.
    pub fn reorder_multiple(&mut self, card_ids: &[CardId], target_index: usize) -> bool {
        let block: Vec<CardId> = {
            let order = sortkey::sorted_indices(&self.cards);
            order
                .into_iter()
                .map(|i| self.cards[i].id.clone())
                .filter(|id| card_ids.contains(id))
                .collect()
        };
        if block.is_empty() {
            tracing::warn!("block reorder matched no cards, ignoring");
            return false;
        }
        let before = self.cards.clone();
        self.repair_duplicate_keys();

        let block_refs: Vec<&str> = block.iter().map(|id| id.as_str()).collect();
        let remaining: Vec<SmolStr> = self
            .order_excluding(&block_refs)
            .into_iter()
            .map(|i| self.cards[i].sort_key.clone())
            .collect();
        let target = target_index.min(remaining.len());
        let mut lower = target.checked_sub(1).map(|i| remaining[i].clone());
        let upper = remaining.get(target).cloned();

        // All keys are computed before anything is committed.
        let mut assignment = Vec::with_capacity(block.len());
        for id in &block {
            match sortkey::key_between(lower.as_deref(), upper.as_deref()) {
                Ok(key) => {
                    assignment.push((id.clone(), key.clone()));
                    lower = Some(key);
                }
                Err(err) => {
                    tracing::warn!(%err, card = %id, "block reorder aborted");
                    self.cards = before;
                    return false;
                }
            }
        }

        self.history.record(&before);
        for (id, key) in assignment {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
                card.sort_key = key;
                card.updated_at = epoch_millis();
            }
        }
        self.has_changes = true;
        true
    }

    /// Soft-hide or show a card without removing it.
    pub fn set_card_visibility(&mut self, id: &str, is_visible: bool) -> bool {
        self.update_card(id, CardPatch::visibility(is_visible))
    }

    // === Scatter layout (undoable; layouts live on the cards) ===

    /// Merge a partial position update into one card's layout for one theme.
    /// Layouts for other themes are untouched. A card entering the theme for
    /// the first time starts from its type's default footprint, on top.
    pub fn update_scatter_position(
        &mut self,
        id: &str,
        theme_id: &str,
        patch: ScatterPatch,
    ) -> bool {
        if !self.contains(id) {
            tracing::warn!(card = id, "scatter update for unknown card, ignoring");
            return false;
        }
        self.history.record(&self.cards);
        let base_z = scatter::max_z_index(&self.cards, theme_id);
        if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
            let (width, height) = scatter::default_footprint(card.card_type);
            let entry = card
                .scatter_layouts
                .entry(theme_id.into())
                .or_insert(ScatterPosition {
                    x: 0.0,
                    y: 0.0,
                    width,
                    height,
                    z_index: base_z + 1,
                });
            entry.apply(patch);
            card.updated_at = epoch_millis();
        }
        self.has_changes = true;
        true
    }

    /// Grid-place every card that has no position in `theme_id` yet.
    /// Idempotent: a second call for the same theme is a no-op.
    pub fn init_scatter_layout(&mut self, theme_id: &str) -> usize {
        let placements = scatter::initial_grid_layout(&self.cards, theme_id);
        if placements.is_empty() {
            return 0;
        }
        self.history.record(&self.cards);
        let placed = placements.len();
        for (id, pos) in placements {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
                card.scatter_layouts.insert(theme_id.into(), pos);
            }
        }
        self.has_changes = true;
        placed
    }

    // === Non-undoable state ===

    /// Select a card (or clear with `None`). Unknown ids clear the selection.
    pub fn select_card(&mut self, id: Option<CardId>) {
        self.selected_card_id = match id {
            Some(id) if self.contains(&id) => Some(id),
            Some(id) => {
                tracing::debug!(card = %id, "selecting unknown card, clearing selection");
                None
            }
            None => None,
        };
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.has_changes = true;
    }

    pub fn set_theme_state(&mut self, theme_state: ThemeState) {
        self.theme_state = theme_state;
        self.has_changes = true;
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = profile;
        self.has_changes = true;
    }

    pub fn add_sticker(&mut self, kind: impl Into<SmolStr>, x: f64, y: f64) -> SmolStr {
        let sticker = Sticker {
            id: new_card_id(),
            kind: kind.into(),
            x,
            y,
        };
        let id = sticker.id.clone();
        self.stickers.push(sticker);
        self.has_changes = true;
        id
    }

    /// Move a sticker. Unknown ids are ignored.
    pub fn update_sticker(&mut self, id: &str, x: f64, y: f64) -> bool {
        match self.stickers.iter_mut().find(|s| s.id == id) {
            Some(sticker) => {
                sticker.x = x;
                sticker.y = y;
                self.has_changes = true;
                true
            }
            None => {
                tracing::warn!(sticker = id, "move for unknown sticker, ignoring");
                false
            }
        }
    }

    /// Persistence boundary bookkeeping after a successful save.
    pub fn mark_saved(&mut self) {
        self.has_changes = false;
        self.last_saved_at = Some(epoch_millis());
    }

    // === Undo / redo ===

    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.cards) {
            Some(prev) => {
                self.cards = prev;
                self.reconcile_selection();
                self.has_changes = true;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.cards) {
            Some(next) => {
                self.cards = next;
                self.reconcile_selection();
                self.has_changes = true;
                true
            }
            None => false,
        }
    }

    // === Internals ===

    fn contains(&self, id: &str) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    fn reconcile_selection(&mut self) {
        if let Some(id) = &self.selected_card_id {
            if !self.contains(id) {
                self.selected_card_id = None;
            }
        }
    }

    /// Sorted indices with the named cards filtered out.
    fn order_excluding(&self, ids: &[&str]) -> Vec<usize> {
        sortkey::sorted_indices(&self.cards)
            .into_iter()
            .filter(|&i| !ids.contains(&self.cards[i].id.as_str()))
            .collect()
    }

    fn repair_duplicate_keys(&mut self) {
        if sortkey::has_duplicate_keys(&self.cards) {
            tracing::warn!("duplicate sort keys detected, normalizing");
            self.apply_normalized_keys();
        }
    }

    fn apply_normalized_keys(&mut self) {
        for (id, key) in sortkey::normalize_keys(&self.cards) {
            if let Some(card) = self.cards.iter_mut().find(|c| c.id == id) {
                card.sort_key = key;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PageStore {
        // Zero coalescing so every mutation is its own undo step.
        PageStore::with_limits("page-1", 100, Duration::ZERO)
    }

    fn display_ids(store: &PageStore) -> Vec<SmolStr> {
        store.snapshot().cards.into_iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_add_card_appends_and_selects() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Text, None);
        assert_eq!(display_ids(&store), vec![a.clone(), b.clone()]);
        assert_eq!(store.selected_card_id(), Some(&b));
        assert!(store.has_changes());
        assert_eq!(store.card(&a).map(|c| c.page_id.as_str()), Some("page-1"));
    }

    #[test]
    fn test_add_then_duplicate_places_copy_after_original() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        let dup = store.duplicate_card(&a).unwrap();
        assert_eq!(display_ids(&store), vec![a, dup.clone(), b]);
        assert_eq!(store.selected_card_id(), Some(&dup));

        let copy = store.card(&dup).unwrap();
        assert_eq!(copy.card_type, CardType::Link);
        assert_ne!(copy.id, copy.sort_key);
    }

    #[test]
    fn test_reorder_drag_semantics_both_directions() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        let c = store.add_card(CardType::Link, None);

        // Dragging A down onto C: A lands where C was, C shifts after.
        assert!(store.reorder_cards(&a, &c));
        assert_eq!(display_ids(&store), vec![b.clone(), a.clone(), c.clone()]);

        // Undo, then drag C up onto A.
        assert!(store.undo());
        assert!(store.reorder_cards(&c, &a));
        assert_eq!(display_ids(&store), vec![c, a, b]);
    }

    #[test]
    fn test_reorder_same_or_unknown_is_noop() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let before = display_ids(&store);
        assert!(!store.reorder_cards(&a, &a));
        assert!(!store.reorder_cards(&a, "ghost"));
        assert!(!store.reorder_cards("ghost", &a));
        assert_eq!(display_ids(&store), before);
    }

    #[test]
    fn test_reorder_multiple_keeps_document_order() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        let c = store.add_card(CardType::Link, None);
        let d = store.add_card(CardType::Link, None);

        // Ids listed in click order (d before b); block still moves as [b, d].
        assert!(store.reorder_multiple(&[d.clone(), b.clone()], 0));
        assert_eq!(display_ids(&store), vec![b.clone(), d.clone(), a, c]);
    }

    #[test]
    fn test_reorder_multiple_clamps_target() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        let c = store.add_card(CardType::Link, None);
        assert!(store.reorder_multiple(&[a.clone()], 99));
        assert_eq!(display_ids(&store), vec![b, c, a]);
    }

    #[test]
    fn test_remove_card_clears_selection() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        assert_eq!(store.selected_card_id(), Some(&a));
        assert!(store.remove_card(&a));
        assert!(store.selected_card_id().is_none());
        assert!(store.cards().is_empty());
    }

    #[test]
    fn test_undo_redo_restores_cards_and_selection() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        store.select_card(Some(a.clone()));

        assert!(store.undo());
        assert!(store.cards().is_empty());
        // Selection pointed at a card that no longer exists.
        assert!(store.selected_card_id().is_none());

        assert!(store.redo());
        assert_eq!(display_ids(&store), vec![a]);
        assert!(!store.redo());
    }

    #[test]
    fn test_update_card_bumps_and_merges() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        assert!(store.update_card(&a, CardPatch::title("hello")));
        assert_eq!(store.card(&a).unwrap().title, "hello");
        assert!(!store.update_card("ghost", CardPatch::title("x")));
    }

    #[test]
    fn test_visibility_is_a_soft_hide() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        assert!(store.set_card_visibility(&a, false));
        assert!(!store.card(&a).unwrap().is_visible);
        assert_eq!(store.cards().len(), 1);
    }

    #[test]
    fn test_scatter_updates_are_isolated_per_theme() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        store.update_scatter_position(
            &a,
            "receipt",
            ScatterPatch {
                x: Some(10.0),
                y: Some(20.0),
                ..ScatterPatch::default()
            },
        );
        store.update_scatter_position(
            &a,
            "terminal",
            ScatterPatch {
                x: Some(70.0),
                ..ScatterPatch::default()
            },
        );

        let card = store.card(&a).unwrap();
        assert_eq!(card.scatter_layouts["receipt"].x, 10.0);
        assert_eq!(card.scatter_layouts["receipt"].y, 20.0);
        assert_eq!(card.scatter_layouts["terminal"].x, 70.0);
        // First entry for a theme starts from the type footprint.
        let (w, _) = scatter::default_footprint(CardType::Link);
        assert_eq!(card.scatter_layouts["receipt"].width, w);
    }

    #[test]
    fn test_init_scatter_layout_is_idempotent() {
        let mut store = store();
        store.add_card(CardType::Link, None);
        store.add_card(CardType::Text, None);
        assert_eq!(store.init_scatter_layout("lanyard"), 2);
        assert_eq!(store.init_scatter_layout("lanyard"), 0);

        // A card added later gets placed without moving the others.
        let c = store.add_card(CardType::Mini, None);
        assert_eq!(store.init_scatter_layout("lanyard"), 1);
        assert!(store.card(&c).unwrap().scatter_layouts.contains_key("lanyard"));
    }

    #[test]
    fn test_duplicate_keys_are_repaired_before_reorder() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        let c = store.add_card(CardType::Link, None);
        // Corrupt the keys as an external writer might.
        for id in [&a, &b] {
            if let Some(card) = store.cards.iter_mut().find(|x| &x.id == id) {
                card.sort_key = "a0".into();
            }
        }
        assert!(sortkey::has_duplicate_keys(store.cards()));

        assert!(store.reorder_cards(&c, &a));
        assert!(!sortkey::has_duplicate_keys(store.cards()));
        assert_eq!(display_ids(&store), vec![c, a, b]);
    }

    #[test]
    fn test_select_unknown_card_clears_selection() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        store.select_card(Some("ghost".into()));
        assert!(store.selected_card_id().is_none());
        store.select_card(Some(a.clone()));
        assert_eq!(store.selected_card_id(), Some(&a));
    }

    #[test]
    fn test_mark_saved_clears_dirty_flag() {
        let mut store = store();
        store.add_card(CardType::Link, None);
        assert!(store.has_changes());
        store.mark_saved();
        assert!(!store.has_changes());
        assert!(store.last_saved_at().is_some());

        store.set_theme(Theme::new("terminal", "Terminal"));
        assert!(store.has_changes());
    }

    #[test]
    fn test_stickers_move_and_ignore_unknown_ids() {
        let mut store = store();
        let s = store.add_sticker("star", 5.0, 5.0);
        assert!(store.update_sticker(&s, 42.0, 7.0));
        assert_eq!(store.stickers()[0].x, 42.0);
        assert!(!store.update_sticker("ghost", 0.0, 0.0));
    }

    #[test]
    fn test_failed_mutations_leave_history_untouched() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        store.update_card(&a, CardPatch::title("draft"));
        store.undo();
        assert!(store.can_redo());

        // Corrupt b's key (unique but malformed, sorting after a) so key
        // generation against it fails.
        if let Some(card) = store.cards.iter_mut().find(|c| c.id == b) {
            card.sort_key = "zz!".into();
        }
        let before = store.cards.clone();

        assert!(store.duplicate_card(&a).is_none());
        assert!(!store.reorder_cards(&a, &b));
        assert!(!store.reorder_multiple(&[a.clone()], 1));

        // No spurious undo step, no cleared redo stack, no partial writes.
        assert!(store.can_redo());
        assert_eq!(store.cards, before);
    }

    #[test]
    fn test_load_repairs_malformed_keys() {
        let mut donor = store();
        let a = donor.add_card(CardType::Link, None);
        let b = donor.add_card(CardType::Link, None);
        let mut cards = donor.snapshot().cards;
        // Unique but malformed, as a buggy import might produce.
        cards[1].sort_key = "not a key".into();

        let mut loaded = PageStore::load("page-2", cards, Theme::default());
        assert!(loaded
            .cards()
            .iter()
            .all(|c| sortkey::is_valid_key(&c.sort_key)));

        // Drags work immediately after the corrupt import.
        assert!(loaded.reorder_cards(&b, &a));
        assert_eq!(loaded.snapshot().cards[0].id, b);
    }

    #[test]
    fn test_load_repairs_imported_duplicate_keys() {
        let mut donor = store();
        donor.add_card(CardType::Link, None);
        donor.add_card(CardType::Text, None);
        let mut cards = donor.snapshot().cards;
        for card in &mut cards {
            card.sort_key = "a0".into();
        }

        let loaded = PageStore::load("page-2", cards, Theme::default());
        assert!(!sortkey::has_duplicate_keys(loaded.cards()));
        assert!(!loaded.has_changes());
        assert!(!loaded.can_undo());
        assert_eq!(loaded.cards().len(), 2);
    }

    #[test]
    fn test_snapshot_is_display_ordered() {
        let mut store = store();
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Link, None);
        store.reorder_cards(&b, &a);
        let snap = store.snapshot();
        assert_eq!(snap.cards[0].id, b);
        assert_eq!(snap.cards[1].id, a);
        assert_eq!(snap.selected_card_id, Some(b));
    }
}
