//! Preview-side scatter gesture coordinator.
//!
//! State updates flow editor → preview, but a drag must not wait for that
//! round trip or the card snaps back for a frame. The coordinator keeps two
//! layers: the authoritative positions from the last `STATE_UPDATE`, and a
//! local shadow written synchronously when a gesture ends. Lookups prefer
//! the shadow; the next authoritative update replaces both layers, by which
//! point it already reflects the gesture that wrote the shadow.

use std::collections::HashMap;

use smol_str::SmolStr;

use folio_core::{scatter, Card, CardId, ScatterPatch, ScatterPosition};

/// Two-layer scatter positions for one active theme.
#[derive(Debug, Clone)]
pub struct ScatterCoordinator {
    theme_id: SmolStr,
    authoritative: HashMap<CardId, ScatterPosition>,
    shadow: HashMap<CardId, ScatterPosition>,
    max_z: i64,
}

impl ScatterCoordinator {
    pub fn new(theme_id: impl Into<SmolStr>) -> Self {
        Self {
            theme_id: theme_id.into(),
            authoritative: HashMap::new(),
            shadow: HashMap::new(),
            max_z: 0,
        }
    }

    pub fn theme_id(&self) -> &SmolStr {
        &self.theme_id
    }

    /// Switch to another theme and rebuild from `cards`. The shadow belongs
    /// to the old theme and is discarded.
    pub fn set_theme(&mut self, theme_id: impl Into<SmolStr>, cards: &[Card]) {
        self.theme_id = theme_id.into();
        self.set_authoritative(cards);
    }

    /// Replace the authoritative layer from a fresh state update. The shadow
    /// is cleared: the update supersedes every gesture applied before it.
    pub fn set_authoritative(&mut self, cards: &[Card]) {
        self.authoritative = cards
            .iter()
            .filter_map(|c| {
                c.scatter_layouts
                    .get(self.theme_id.as_str())
                    .map(|pos| (c.id.clone(), *pos))
            })
            .collect();
        self.shadow.clear();
        self.max_z = scatter::max_z_index(cards, &self.theme_id);
    }

    /// Position to render a card at right now (shadow wins).
    pub fn position(&self, card_id: &str) -> Option<ScatterPosition> {
        self.shadow
            .get(card_id)
            .or_else(|| self.authoritative.get(card_id))
            .copied()
    }

    pub fn max_z(&self) -> i64 {
        self.max_z
    }

    /// A drag gesture finished at (`x`, `y`). Writes the shadow and returns
    /// the patch to post to the editor. The card comes to the front.
    pub fn drag_end(&mut self, card_id: &CardId, x: f64, y: f64) -> ScatterPatch {
        self.commit(
            card_id,
            ScatterPatch {
                x: Some(x),
                y: Some(y),
                ..ScatterPatch::default()
            },
        )
    }

    /// A resize gesture finished. Same contract as [`Self::drag_end`].
    pub fn scale_end(&mut self, card_id: &CardId, width: f64, height: f64) -> ScatterPatch {
        self.commit(
            card_id,
            ScatterPatch {
                width: Some(width),
                height: Some(height),
                ..ScatterPatch::default()
            },
        )
    }

    fn commit(&mut self, card_id: &CardId, mut patch: ScatterPatch) -> ScatterPatch {
        // Every completed gesture brings the card to the front.
        self.max_z += 1;
        patch.z_index = Some(self.max_z);

        let mut pos = self.position(card_id).unwrap_or_default();
        pos.apply(patch);
        self.shadow.insert(card_id.clone(), pos);
        patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{CardType, PageStore};

    fn store_with_layout(theme_id: &str) -> (PageStore, CardId, CardId) {
        let mut store = PageStore::new("p1");
        let a = store.add_card(CardType::Link, None);
        let b = store.add_card(CardType::Text, None);
        store.init_scatter_layout(theme_id);
        (store, a, b)
    }

    #[test]
    fn test_shadow_wins_until_authoritative_replaces() {
        let (mut store, a, _) = store_with_layout("receipt");
        let mut coord = ScatterCoordinator::new("receipt");
        coord.set_authoritative(store.cards());
        let before = coord.position(&a).unwrap();

        let patch = coord.drag_end(&a, 55.0, 66.0);
        let shadowed = coord.position(&a).unwrap();
        assert_eq!(shadowed.x, 55.0);
        assert_eq!(shadowed.y, 66.0);
        // Extent untouched by a drag.
        assert_eq!(shadowed.width, before.width);

        // The editor applies the same patch and the next update confirms it.
        store.update_scatter_position(&a, "receipt", patch);
        coord.set_authoritative(&store.snapshot().cards);
        let confirmed = coord.position(&a).unwrap();
        assert_eq!(confirmed.x, 55.0);
        assert_eq!(confirmed.y, 66.0);
    }

    #[test]
    fn test_every_gesture_comes_to_front() {
        let (store, a, b) = store_with_layout("receipt");
        let mut coord = ScatterCoordinator::new("receipt");
        coord.set_authoritative(store.cards());

        coord.drag_end(&a, 1.0, 1.0);
        let za = coord.position(&a).unwrap().z_index;
        assert!(za > coord.position(&b).unwrap().z_index);

        coord.scale_end(&b, 30.0, 30.0);
        let zb = coord.position(&b).unwrap().z_index;
        assert!(zb > za);
    }

    #[test]
    fn test_stale_update_does_not_resurrect_old_position() {
        let (store, a, _) = store_with_layout("receipt");
        let mut coord = ScatterCoordinator::new("receipt");
        coord.set_authoritative(store.cards());
        coord.drag_end(&a, 80.0, 10.0);

        // An authoritative update that already includes the drag fully
        // replaces the shadow; position stays where the user put it.
        let mut confirmed = store.clone();
        confirmed.update_scatter_position(
            &a,
            "receipt",
            ScatterPatch {
                x: Some(80.0),
                y: Some(10.0),
                ..ScatterPatch::default()
            },
        );
        coord.set_authoritative(confirmed.cards());
        assert_eq!(coord.position(&a).unwrap().x, 80.0);
        assert!(!coord.shadow.contains_key(&a));
    }

    #[test]
    fn test_theme_switch_discards_shadow_and_rekeys() {
        let (mut store, a, _) = store_with_layout("receipt");
        store.init_scatter_layout("terminal");
        let mut coord = ScatterCoordinator::new("receipt");
        coord.set_authoritative(store.cards());
        coord.drag_end(&a, 99.0, 99.0);

        coord.set_theme("terminal", store.cards());
        assert_eq!(coord.theme_id(), "terminal");
        // Terminal's own layout, not receipt's shadowed drag.
        assert_ne!(coord.position(&a).unwrap().x, 99.0);
    }

    #[test]
    fn test_gesture_on_unplaced_card_starts_from_origin() {
        let mut coord = ScatterCoordinator::new("receipt");
        let id: CardId = "c1".into();
        let patch = coord.drag_end(&id, 5.0, 6.0);
        assert_eq!(patch.z_index, Some(1));
        let pos = coord.position(&id).unwrap();
        assert_eq!((pos.x, pos.y), (5.0, 6.0));
        assert_eq!(pos.width, 0.0);
    }
}
