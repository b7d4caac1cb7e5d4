//! End-to-end editor <-> preview loop over the JSON wire, no browser needed.
//!
//! Frames are carried as the strings `postMessage` would deliver; the
//! origin gate and codec are exactly what the wasm bridges use.

use folio_browser::{
    handle_preview_message, handle_state_message, InboundOutcome, PreviewState,
    ScatterCoordinator, UiEvent,
};
use folio_core::{CardType, PageStore, ScatterPatch};
use folio_protocol::{EditorMessage, PreviewMessage};

const ORIGIN: &str = "https://folio.page";
const FOREIGN: &str = "https://evil.example";

fn state_frame(store: &PageStore) -> String {
    EditorMessage::StateUpdate(store.snapshot().into())
        .to_json()
        .unwrap()
}

fn deliver_to_editor(store: &mut PageStore, msg: &PreviewMessage) -> Option<UiEvent> {
    let raw = msg.to_json().unwrap();
    match handle_preview_message(store, ORIGIN, ORIGIN, &raw) {
        InboundOutcome::Applied(ui) => ui,
        other => panic!("frame should apply, got {other:?}"),
    }
}

fn deliver_to_preview(preview: &mut PreviewState, store: &PageStore) {
    let outcome = handle_state_message(preview, ORIGIN, ORIGIN, &state_frame(store));
    assert!(outcome.is_applied());
}

#[test]
fn test_full_editing_session() {
    // Zero coalescing window so each edit is its own undo step.
    let mut store = PageStore::with_limits("page-1", 100, std::time::Duration::ZERO);
    let mut preview = PreviewState::new();

    // Preview mounts and announces; editor answers with current state.
    let ui = deliver_to_editor(&mut store, &PreviewMessage::PreviewReady);
    assert_eq!(ui, Some(UiEvent::PreviewReady));
    deliver_to_preview(&mut preview, &store);
    assert!(preview.cards.is_empty());

    // Editor-side edits flow down.
    let a = store.add_card(CardType::Link, None);
    let b = store.add_card(CardType::Text, None);
    deliver_to_preview(&mut preview, &store);
    assert_eq!(preview.cards.len(), 2);
    assert!(preview.is_selected(&b));

    // Preview-side gestures flow up and come back confirmed.
    deliver_to_editor(
        &mut store,
        &PreviewMessage::ReorderCards {
            active_id: b.clone(),
            over_id: a.clone(),
        },
    );
    deliver_to_editor(
        &mut store,
        &PreviewMessage::UpdateCard {
            card_id: a.clone(),
            title: "My shows".into(),
        },
    );
    deliver_to_preview(&mut preview, &store);
    assert_eq!(preview.cards[0].id, b);
    assert_eq!(preview.cards[1].title, "My shows");

    // Undo on the editor side; the preview just renders the next frame.
    assert!(store.undo());
    deliver_to_preview(&mut preview, &store);
    assert_eq!(preview.cards[1].title, "");
}

#[test]
fn test_inline_edit_handshake() {
    let mut store = PageStore::new("page-1");
    let a = store.add_card(CardType::Link, None);

    assert_eq!(
        deliver_to_editor(&mut store, &PreviewMessage::InlineEditActive),
        Some(UiEvent::InlineEditStarted)
    );
    deliver_to_editor(
        &mut store,
        &PreviewMessage::UpdateCard {
            card_id: a.clone(),
            title: "renamed inline".into(),
        },
    );
    assert_eq!(
        deliver_to_editor(&mut store, &PreviewMessage::InlineEditDone),
        Some(UiEvent::InlineEditFinished)
    );
    assert_eq!(store.card(&a).unwrap().title, "renamed inline");
}

#[test]
fn test_multi_block_drag_over_the_wire() {
    let mut store = PageStore::new("page-1");
    let mut preview = PreviewState::new();
    let a = store.add_card(CardType::Link, None);
    let b = store.add_card(CardType::Link, None);
    let c = store.add_card(CardType::Link, None);
    let d = store.add_card(CardType::Link, None);

    // Click order c-then-a; the block still travels in document order.
    deliver_to_editor(
        &mut store,
        &PreviewMessage::ReorderMultipleCards {
            card_ids: vec![c.clone(), a.clone()],
            target_index: 2,
        },
    );
    deliver_to_preview(&mut preview, &store);
    let ids: Vec<_> = preview.cards.iter().map(|card| card.id.clone()).collect();
    assert_eq!(ids, vec![b, d, a, c]);
}

#[test]
fn test_scatter_gesture_round_trip() {
    let mut store = PageStore::new("page-1");
    let a = store.add_card(CardType::Link, None);
    store.add_card(CardType::Text, None);
    store.init_scatter_layout("receipt");

    let mut coord = ScatterCoordinator::new("receipt");
    coord.set_authoritative(&store.snapshot().cards);

    // Gesture ends: shadow applies instantly, patch travels to the editor.
    let patch = coord.drag_end(&a, 61.0, 7.0);
    assert_eq!(coord.position(&a).map(|p| p.x), Some(61.0));
    deliver_to_editor(
        &mut store,
        &PreviewMessage::ScatterPositionUpdate {
            card_id: a.clone(),
            theme_id: "receipt".into(),
            position: patch,
        },
    );

    // Confirmation frame replaces the shadow with identical data.
    coord.set_authoritative(&store.snapshot().cards);
    let pos = coord.position(&a).unwrap();
    assert_eq!((pos.x, pos.y), (61.0, 7.0));

    // The other theme never saw any of this.
    assert!(!store
        .card(&a)
        .unwrap()
        .scatter_layouts
        .contains_key("terminal"));
}

#[test]
fn test_sticker_drag_over_the_wire() {
    let mut store = PageStore::new("page-1");
    let s = store.add_sticker("star", 1.0, 2.0);
    deliver_to_editor(
        &mut store,
        &PreviewMessage::UpdateSticker {
            id: s.clone(),
            x: 33.0,
            y: 44.0,
        },
    );
    assert_eq!(store.stickers()[0].x, 33.0);
    assert_eq!(store.stickers()[0].y, 44.0);
}

#[test]
fn test_every_preview_message_is_origin_gated() {
    let mut store = PageStore::new("page-1");
    let a = store.add_card(CardType::Link, None);
    let before = store.snapshot();

    let messages = [
        PreviewMessage::SelectCard { card_id: None },
        PreviewMessage::ReorderCards {
            active_id: a.clone(),
            over_id: a.clone(),
        },
        PreviewMessage::ReorderMultipleCards {
            card_ids: vec![a.clone()],
            target_index: 0,
        },
        PreviewMessage::ScatterPositionUpdate {
            card_id: a.clone(),
            theme_id: "receipt".into(),
            position: ScatterPatch {
                x: Some(1.0),
                ..ScatterPatch::default()
            },
        },
        PreviewMessage::UpdateCard {
            card_id: a.clone(),
            title: "hijacked".into(),
        },
        PreviewMessage::PreviewReady,
        PreviewMessage::InlineEditActive,
        PreviewMessage::InlineEditDone,
        PreviewMessage::UpdateSticker {
            id: "s1".into(),
            x: 0.0,
            y: 0.0,
        },
        PreviewMessage::OpenDesignTab { tab: "themes".into() },
    ];
    for msg in &messages {
        let raw = msg.to_json().unwrap();
        let outcome = handle_preview_message(&mut store, ORIGIN, FOREIGN, &raw);
        assert_eq!(outcome, InboundOutcome::IgnoredOrigin, "message {raw}");
    }
    assert_eq!(store.snapshot(), before);

    // Same gate on the way down.
    let mut preview = PreviewState::new();
    let outcome = handle_state_message(&mut preview, ORIGIN, FOREIGN, &state_frame(&store));
    assert_eq!(outcome, InboundOutcome::IgnoredOrigin);
    assert!(preview.cards.is_empty());
}

#[test]
fn test_garbage_frames_never_panic() {
    let mut store = PageStore::new("page-1");
    let mut preview = PreviewState::new();
    for raw in ["", "null", "42", "{}", r#"{"type":"STATE_UPDATE"}"#, "\u{0}\u{1}"] {
        assert_eq!(
            handle_preview_message(&mut store, ORIGIN, ORIGIN, raw),
            InboundOutcome::IgnoredMalformed
        );
        assert_eq!(
            handle_state_message(&mut preview, ORIGIN, ORIGIN, raw),
            InboundOutcome::IgnoredMalformed
        );
    }
}
