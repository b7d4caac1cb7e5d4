//! Wire protocol between the folio editor window and its preview iframe.
//!
//! The transport is `window.postMessage` with JSON payloads; this crate
//! defines the typed envelopes and the codec. The browser glue that
//! actually posts and receives lives in `folio-browser`.

pub mod messages;

pub use messages::{EditorMessage, PreviewMessage, ProtocolError, StateUpdatePayload};
