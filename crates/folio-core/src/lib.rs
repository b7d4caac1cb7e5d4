//! Pure page-builder logic for the folio editor.
//!
//! This crate owns the editor-side state with no DOM or framework
//! dependencies, so everything here unit-tests natively:
//!
//! - [`card`]: the card data model, content payloads, partial updates
//! - [`sortkey`]: fractional sort keys for ordering cards
//! - [`select`]: multi-select with shift-click range semantics
//! - [`store`]: the page store funneling all mutations through undo
//! - [`history`]: bounded snapshot undo/redo with edit coalescing
//! - [`scatter`]: freeform per-theme layout geometry
//! - [`theme`]: theme catalog, theme-wide toggles, page profile
//!
//! The browser glue (postMessage bridges, the preview-side receiver) lives
//! in `folio-browser`; the wire types live in `folio-protocol`.

pub mod card;
pub mod history;
pub mod scatter;
pub mod select;
pub mod sortkey;
pub mod store;
pub mod theme;

pub use card::{
    new_card_id, Card, CardAlign, CardContent, CardId, CardPatch, CardSize, CardType, SocialLink,
};
pub use history::History;
pub use scatter::{ScatterPatch, ScatterPosition};
pub use select::Selection;
pub use sortkey::{key_between, SortKeyError};
pub use store::{PageSnapshot, PageStore, Sticker};
pub use theme::{Profile, Theme, ThemeState, ThemeStatePatch};
