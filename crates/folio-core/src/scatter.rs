//! Freeform "scatter" layout geometry.
//!
//! Scatter themes place cards at absolute positions instead of flowing them
//! in the grid. All coordinates and extents are percentages of the frame
//! width (both axes use width as the denominator, so layouts scale
//! uniformly with the frame). Each theme keeps its own layout map on the
//! card; updating one theme never disturbs another.

use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId, CardType};

/// Absolute placement of one card within one scatter theme.
///
/// `z_index` is only meaningful relative to other cards in the same theme;
/// gesture handlers bring a card to front by assigning one past the current
/// maximum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: i64,
}

/// Partial scatter update. `None` fields are left untouched, so a drag can
/// send only `x`/`y` and a resize only `width`/`height`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl ScatterPosition {
    /// Merge a partial update into this position.
    pub fn apply(&mut self, patch: ScatterPatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
    }
}

/// Default footprint (width, height) in width-percent for a card type when
/// it first enters a scatter theme.
pub fn default_footprint(card_type: CardType) -> (f64, f64) {
    match card_type {
        CardType::Hero => (90.0, 32.0),
        CardType::Gallery
        | CardType::Video
        | CardType::Music
        | CardType::Game
        | CardType::Release
        | CardType::EmailCollection => (44.0, 44.0),
        CardType::Square => (26.0, 26.0),
        CardType::Horizontal => (42.0, 20.0),
        CardType::Link => (26.0, 12.0),
        CardType::Mini => (14.0, 14.0),
        CardType::Text => (32.0, 18.0),
        CardType::Audio => (32.0, 14.0),
        CardType::SocialIcons => (32.0, 10.0),
    }
}

/// Highest `z_index` in use for `theme_id` across `cards` (0 when none).
pub fn max_z_index(cards: &[Card], theme_id: &str) -> i64 {
    cards
        .iter()
        .filter_map(|c| c.scatter_layouts.get(theme_id))
        .map(|p| p.z_index)
        .max()
        .unwrap_or(0)
}

/// Grid placements for every card that has no position in `theme_id` yet.
///
/// Cards are laid on a `ceil(sqrt(n))`-column grid in their sorted order,
/// each centered in its cell with the type's default footprint. Cell
/// extents are at least the largest pending footprint, so initial
/// placements never overlap each other (wide layouts run past 100% rather
/// than intersect). Cards that already have a position are skipped, which
/// makes theme initialization idempotent. New cards stack above existing
/// ones.
pub fn initial_grid_layout(cards: &[Card], theme_id: &str) -> Vec<(CardId, ScatterPosition)> {
    let pending: Vec<&Card> = crate::sortkey::sorted_indices(cards)
        .into_iter()
        .map(|i| &cards[i])
        .filter(|c| !c.scatter_layouts.contains_key(theme_id))
        .collect();
    if pending.is_empty() {
        return Vec::new();
    }

    let cols = (pending.len() as f64).sqrt().ceil() as usize;
    let (max_w, max_h) = pending
        .iter()
        .map(|c| default_footprint(c.card_type))
        .fold((0.0f64, 0.0f64), |(w, h), (cw, ch)| (w.max(cw), h.max(ch)));
    let cell_w = (100.0 / cols as f64).max(max_w);
    let cell_h = max_h;
    let base_z = max_z_index(cards, theme_id);

    pending
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let (width, height) = default_footprint(card.card_type);
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            let pos = ScatterPosition {
                x: col * cell_w + (cell_w - width) / 2.0,
                y: row * cell_h,
                width,
                height,
                z_index: base_z + i as i64 + 1,
            };
            (card.id.clone(), pos)
        })
        .collect()
}
