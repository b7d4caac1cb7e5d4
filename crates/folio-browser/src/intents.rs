//! Editor-side handling of preview intents.
//!
//! Every user gesture inside the iframe arrives here as a
//! [`PreviewMessage`]; the store mutations are applied directly and the
//! handful of messages that only concern the editor chrome come back as a
//! [`UiEvent`] for the host app to act on.

use smol_str::SmolStr;

use folio_core::{CardPatch, PageStore};
use folio_protocol::PreviewMessage;

use crate::origin::{same_origin, InboundOutcome};

/// Chrome-level events the host app handles itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The preview mounted; resend the current state.
    PreviewReady,
    /// Pause keyboard shortcuts while an inline editor has focus.
    InlineEditStarted,
    InlineEditFinished,
    /// Open the named design panel tab.
    OpenDesignTab(SmolStr),
}

/// Gate, decode, and apply one inbound preview frame.
///
/// Store-level intents mutate `store` (unknown ids inside are the store's
/// business and degrade to no-ops there). Returns the [`UiEvent`] the host
/// still has to handle, if any.
pub fn handle_preview_message(
    store: &mut PageStore,
    own_origin: &str,
    event_origin: &str,
    raw: &str,
) -> InboundOutcome<Option<UiEvent>> {
    if !same_origin(own_origin, event_origin) {
        tracing::warn!(event_origin, "dropping preview frame from foreign origin");
        return InboundOutcome::IgnoredOrigin;
    }
    let message = match PreviewMessage::from_json(raw) {
        Ok(message) => message,
        Err(err) => {
            tracing::warn!(%err, "dropping malformed preview frame");
            return InboundOutcome::IgnoredMalformed;
        }
    };

    let ui = match message {
        PreviewMessage::SelectCard { card_id } => {
            store.select_card(card_id);
            None
        }
        PreviewMessage::ReorderCards { active_id, over_id } => {
            store.reorder_cards(&active_id, &over_id);
            None
        }
        PreviewMessage::ReorderMultipleCards {
            card_ids,
            target_index,
        } => {
            store.reorder_multiple(&card_ids, target_index);
            None
        }
        PreviewMessage::ScatterPositionUpdate {
            card_id,
            theme_id,
            position,
        } => {
            store.update_scatter_position(&card_id, &theme_id, position);
            None
        }
        PreviewMessage::UpdateCard { card_id, title } => {
            store.update_card(&card_id, CardPatch::title(title));
            None
        }
        PreviewMessage::UpdateSticker { id, x, y } => {
            store.update_sticker(&id, x, y);
            None
        }
        PreviewMessage::PreviewReady => Some(UiEvent::PreviewReady),
        PreviewMessage::InlineEditActive => Some(UiEvent::InlineEditStarted),
        PreviewMessage::InlineEditDone => Some(UiEvent::InlineEditFinished),
        PreviewMessage::OpenDesignTab { tab } => Some(UiEvent::OpenDesignTab(tab)),
    };
    InboundOutcome::Applied(ui)
}
