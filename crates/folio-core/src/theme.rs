//! Themes, theme-wide layout state, and the page profile.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// A selectable page theme. Rendering is owned by the host app; the core
/// only tracks which theme is active so per-theme layouts key correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: SmolStr,
    pub name: SmolStr,
}

impl Theme {
    pub fn new(id: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// The shipped theme catalog.
    pub fn builtin() -> Vec<Theme> {
        [
            ("vcr-menu", "VCR Menu"),
            ("ipod-classic", "iPod Classic"),
            ("receipt", "Receipt"),
            ("macintosh", "Macintosh"),
            ("classified", "Classified"),
            ("lanyard", "Lanyard"),
            ("word-art", "Word Art"),
            ("sticker-scrapbook", "Sticker Scrapbook"),
            ("terminal", "Terminal"),
            ("trading-card", "Trading Card"),
            ("notes-app", "Notes App"),
        ]
        .into_iter()
        .map(|(id, name)| Theme::new(id, name))
        .collect()
    }

    /// Look up a builtin theme by id.
    pub fn builtin_by_id(id: &str) -> Option<Theme> {
        Self::builtin().into_iter().find(|t| t.id == id)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::new("vcr-menu", "VCR Menu")
    }
}

/// Theme-wide layout toggles, applied on top of whichever theme is active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeState {
    pub center_cards: bool,
    pub full_width_cards: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<SmolStr>,
}

/// Wire form of [`ThemeState`]: every field optional, so senders that
/// predate a toggle still produce a usable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeStatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_cards: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_width_cards: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<SmolStr>,
}

impl ThemeStatePatch {
    /// Resolve to a concrete state. Missing toggles fall back to `false`,
    /// a missing accent to none.
    pub fn resolve(self) -> ThemeState {
        ThemeState {
            center_cards: self.center_cards.unwrap_or(false),
            full_width_cards: self.full_width_cards.unwrap_or(false),
            accent: self.accent,
        }
    }
}

/// Page owner profile shown in the preview header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub display_name: SmolStr,
    #[serde(default)]
    pub bio: SmolStr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<SmolStr>,
}
