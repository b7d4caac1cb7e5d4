//! `postMessage` bridges between the editor window and the preview iframe.
//!
//! Frames cross the boundary as JSON text, so both sides share the codec in
//! `folio-protocol` and the pure handlers in this crate do all the work;
//! the bridges only own the listeners and the posting. Outbound posts
//! always pass our own origin as the target origin, never `"*"`, and
//! inbound frames go through the same origin gate the native tests
//! exercise.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlIFrameElement, MessageEvent, Window};

use folio_core::PageStore;
use folio_protocol::{EditorMessage, PreviewMessage, ProtocolError, StateUpdatePayload};

use crate::intents::{self, UiEvent};
use crate::origin::InboundOutcome;
use crate::receiver::{self, PreviewState};

/// Bridge setup and transmit failures.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum BridgeError {
    #[error("no global window")]
    NoWindow,

    #[error("own origin unavailable")]
    OriginUnavailable,

    #[error("not embedded in a parent window")]
    NoParentWindow,

    #[error("iframe has no content window")]
    NoTargetWindow,

    #[error(transparent)]
    Codec(#[from] ProtocolError),

    #[error("postMessage failed")]
    PostFailed,
}

fn own_window_and_origin() -> Result<(Window, String), BridgeError> {
    let window = web_sys::window().ok_or(BridgeError::NoWindow)?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| BridgeError::OriginUnavailable)?;
    Ok((window, origin))
}

fn post_json(target: &Window, origin: &str, raw: &str) -> Result<(), BridgeError> {
    target
        .post_message(&JsValue::from_str(raw), origin)
        .map_err(|_| BridgeError::PostFailed)
}

/// Editor-window side: pushes state into the iframe, applies preview
/// intents to the shared store, and surfaces chrome events to the host.
pub struct EditorBridge {
    target: Window,
    origin: String,
    _listener: EventListener,
}

impl EditorBridge {
    pub fn mount(
        iframe: &HtmlIFrameElement,
        store: Rc<RefCell<PageStore>>,
        on_ui: impl Fn(UiEvent) + 'static,
    ) -> Result<Self, BridgeError> {
        let (window, origin) = own_window_and_origin()?;
        let target = iframe.content_window().ok_or(BridgeError::NoTargetWindow)?;

        let listener = {
            let origin = origin.clone();
            EventListener::new(&window, "message", move |event| {
                let Some(event) = event.dyn_ref::<MessageEvent>() else {
                    return;
                };
                let Some(raw) = event.data().as_string() else {
                    // Not one of our text frames; some other postMessage user.
                    return;
                };
                let outcome = intents::handle_preview_message(
                    &mut store.borrow_mut(),
                    &origin,
                    &event.origin(),
                    &raw,
                );
                if let InboundOutcome::Applied(Some(ui)) = outcome {
                    on_ui(ui);
                }
            })
        };

        Ok(Self {
            target,
            origin,
            _listener: listener,
        })
    }

    /// Push a full state frame into the preview.
    pub fn send_state(&self, payload: StateUpdatePayload) -> Result<(), BridgeError> {
        let raw = EditorMessage::StateUpdate(payload).to_json()?;
        post_json(&self.target, &self.origin, &raw)
    }
}

/// Iframe side: holds the preview's state copy, announces readiness on
/// mount, and posts user intents up to the editor.
pub struct PreviewBridge {
    state: Rc<RefCell<PreviewState>>,
    parent: Window,
    origin: String,
    _listener: EventListener,
}

impl PreviewBridge {
    /// Attach to the embedding editor. `on_update` fires after every applied
    /// state frame; the `PREVIEW_READY` announcement goes out before this
    /// returns, so the first frame usually arrives right away.
    pub fn mount(on_update: impl Fn(&PreviewState) + 'static) -> Result<Self, BridgeError> {
        let (window, origin) = own_window_and_origin()?;
        let parent = window
            .parent()
            .map_err(|_| BridgeError::NoParentWindow)?
            .ok_or(BridgeError::NoParentWindow)?;
        let state = Rc::new(RefCell::new(PreviewState::new()));

        let listener = {
            let state = Rc::clone(&state);
            let origin = origin.clone();
            EventListener::new(&window, "message", move |event| {
                let Some(event) = event.dyn_ref::<MessageEvent>() else {
                    return;
                };
                let Some(raw) = event.data().as_string() else {
                    return;
                };
                let outcome = receiver::handle_state_message(
                    &mut state.borrow_mut(),
                    &origin,
                    &event.origin(),
                    &raw,
                );
                if outcome.is_applied() {
                    on_update(&state.borrow());
                }
            })
        };

        let bridge = Self {
            state,
            parent,
            origin,
            _listener: listener,
        };
        bridge.post(&PreviewMessage::PreviewReady)?;
        Ok(bridge)
    }

    /// Shared handle to the preview's state copy.
    pub fn state(&self) -> Rc<RefCell<PreviewState>> {
        Rc::clone(&self.state)
    }

    /// Post a user intent up to the editor window.
    pub fn post(&self, message: &PreviewMessage) -> Result<(), BridgeError> {
        let raw = message.to_json()?;
        post_json(&self.parent, &self.origin, &raw)
    }
}
