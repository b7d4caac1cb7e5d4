//! Preview-side state receiver.
//!
//! The preview is a dumb renderer: it holds a read-only copy of the page
//! and replaces it wholesale on every `STATE_UPDATE`. There is no merging
//! and no local editing state to reconcile, so a dropped frame costs one
//! stale render at most.

use folio_core::{Card, CardId, Profile, Sticker, Theme, ThemeState};
use folio_protocol::{EditorMessage, StateUpdatePayload};

use crate::origin::{same_origin, InboundOutcome};

/// The preview's copy of the page, as last told by the editor.
#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    pub cards: Vec<Card>,
    pub theme: Theme,
    pub selected_card_id: Option<CardId>,
    pub profile: Profile,
    pub theme_state: ThemeState,
    pub stickers: Vec<Sticker>,
}

impl PreviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace state from a full update. Cards, theme and selection are
    /// mandatory and swap atomically; the optional sections only overwrite
    /// when present, so a sender with nothing to say leaves them alone.
    pub fn apply(&mut self, payload: StateUpdatePayload) {
        self.cards = payload.cards;
        self.theme = payload.theme;
        self.selected_card_id = payload.selected_card_id;
        if let Some(profile) = payload.profile {
            self.profile = profile;
        }
        if let Some(theme_state) = payload.theme_state {
            self.theme_state = theme_state.resolve();
        }
        if let Some(stickers) = payload.stickers {
            self.stickers = stickers;
        }
    }

    /// Cards in display order that the preview should render.
    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter().filter(|c| c.is_visible)
    }

    pub fn is_selected(&self, card_id: &str) -> bool {
        self.selected_card_id.as_deref() == Some(card_id)
    }
}

/// Gate, decode, and apply one inbound editor frame.
pub fn handle_state_message(
    state: &mut PreviewState,
    own_origin: &str,
    event_origin: &str,
    raw: &str,
) -> InboundOutcome<()> {
    if !same_origin(own_origin, event_origin) {
        tracing::warn!(event_origin, "dropping editor frame from foreign origin");
        return InboundOutcome::IgnoredOrigin;
    }
    let message = match EditorMessage::from_json(raw) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(%err, "dropping malformed editor frame");
            return InboundOutcome::IgnoredMalformed;
        }
    };
    let EditorMessage::StateUpdate(payload) = message;
    state.apply(payload);
    InboundOutcome::Applied(())
}
