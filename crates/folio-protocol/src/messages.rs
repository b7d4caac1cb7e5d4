//! Message types exchanged between the editor window and the preview iframe.
//!
//! Every message is a `{type, payload}` JSON envelope: SCREAMING_SNAKE_CASE
//! type tags, camelCase payload fields. Delivery is at-most-once and
//! fire-and-forget; `postMessage` gives FIFO per sender and nothing more.
//! The editor therefore never sends deltas: every [`EditorMessage::StateUpdate`]
//! carries the full self-consistent state, so a lost or reordered frame is
//! repaired by the next one (last write wins).
//!
//! By convention the preview announces [`PreviewMessage::PreviewReady`] once
//! after mounting and the editor responds by (re)sending current state.
//! Nothing enforces the convention; a preview that skips it just renders
//! empty until the first state change.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use folio_core::{
    Card, CardId, PageSnapshot, Profile, ScatterPatch, Sticker, Theme, ThemeStatePatch,
};

/// Codec failures. Inbound decode errors are expected in the wild (any
/// window can post anything); callers drop the frame and log.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ProtocolError {
    #[error("message encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("message decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Preview → editor: user intents originating inside the iframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PreviewMessage {
    /// Card clicked (or `None` for a background click clearing selection).
    SelectCard { card_id: Option<CardId> },

    /// Drag-reorder: `active_id` drops onto `over_id`.
    ReorderCards { active_id: CardId, over_id: CardId },

    /// Multi-drag: move `card_ids` as one block to `target_index`.
    ReorderMultipleCards {
        card_ids: Vec<CardId>,
        target_index: usize,
    },

    /// Freeform drag or resize finished in a scatter theme.
    ScatterPositionUpdate {
        card_id: CardId,
        theme_id: SmolStr,
        position: ScatterPatch,
    },

    /// Inline title edit committed.
    UpdateCard { card_id: CardId, title: SmolStr },

    /// Sent once after the preview mounts and can accept state.
    PreviewReady,

    /// An inline editor took focus; the editor pauses shortcuts.
    InlineEditActive,

    /// Inline editing finished; shortcuts resume.
    InlineEditDone,

    /// A background sticker was dragged.
    UpdateSticker { id: SmolStr, x: f64, y: f64 },

    /// The preview asks the editor chrome to open a design panel tab.
    OpenDesignTab { tab: SmolStr },
}

/// Editor → preview: always the whole state, never a delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum EditorMessage {
    StateUpdate(StateUpdatePayload),
}

/// Full page state as rendered by the preview. `cards` arrive pre-sorted in
/// display order. The optional sections are omitted by senders that have
/// nothing to say about them; the preview keeps its previous values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdatePayload {
    pub cards: Vec<Card>,
    pub theme: Theme,
    pub selected_card_id: Option<CardId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_state: Option<ThemeStatePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stickers: Option<Vec<Sticker>>,
}

impl From<PageSnapshot> for StateUpdatePayload {
    fn from(snapshot: PageSnapshot) -> Self {
        Self {
            cards: snapshot.cards,
            theme: snapshot.theme,
            selected_card_id: snapshot.selected_card_id,
            profile: None,
            theme_state: None,
            stickers: None,
        }
    }
}

impl PreviewMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }
}

impl EditorMessage {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }
}
