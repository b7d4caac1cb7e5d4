//! Browser glue for the folio editor and its preview iframe.
//!
//! The state machinery here is pure and tests natively:
//!
//! - [`origin`]: the origin gate every inbound frame passes first
//! - [`receiver`]: the preview's state copy and `STATE_UPDATE` handling
//! - [`intents`]: editor-side application of preview messages
//! - [`shadow`]: optimistic scatter positions during drag gestures
//!
//! The actual `postMessage` wiring lives in the wasm-only bridges
//! ([`PreviewBridge`], [`EditorBridge`]) and is exercised by the
//! `wasm-bindgen-test` suite in `tests/web.rs`.

pub mod intents;
pub mod origin;
pub mod receiver;
pub mod shadow;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
mod bridge;

#[cfg(all(target_family = "wasm", target_os = "unknown"))]
pub use bridge::{BridgeError, EditorBridge, PreviewBridge};

pub use intents::{handle_preview_message, UiEvent};
pub use origin::{same_origin, InboundOutcome};
pub use receiver::{handle_state_message, PreviewState};
pub use shadow::ScatterCoordinator;

// Callers of the glue almost always need the model and wire types too.
pub use folio_core;
pub use folio_protocol;
