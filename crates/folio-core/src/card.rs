//! Card data model: the single content unit on a folio page.
//!
//! A `Card` is owned exclusively by the editor-side `PageStore`; the preview
//! only ever holds read-only copies synchronized over the message bus. The
//! open `content` payload is a type-tagged union whose shape follows
//! `card_type`, with per-type defaults applied when a card is created.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::scatter::ScatterPosition;

/// Opaque card identifier, generated client-side, stable for the card's lifetime.
pub type CardId = SmolStr;

/// Generate a fresh card id.
pub fn new_card_id() -> CardId {
    SmolStr::from(uuid::Uuid::new_v4().to_string())
}

/// Current wall-clock time as epoch milliseconds (wasm-safe).
pub fn epoch_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Closed set of card types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    Hero,
    Square,
    Horizontal,
    Link,
    Mini,
    Text,
    Gallery,
    Video,
    Audio,
    Music,
    Game,
    Release,
    SocialIcons,
    EmailCollection,
}

impl CardType {
    /// Whether this type always renders at the big size, regardless of the
    /// size a caller asks for.
    pub fn forces_big(&self) -> bool {
        matches!(
            self,
            Self::Hero
                | Self::Gallery
                | Self::Video
                | Self::Music
                | Self::Game
                | Self::Release
                | Self::EmailCollection
        )
    }

    /// The default content payload for a freshly created card of this type.
    pub fn default_content(&self) -> CardContent {
        match self {
            Self::Hero | Self::Square | Self::Horizontal | Self::Link | Self::Mini => {
                CardContent::Link {}
            }
            Self::Text => CardContent::Text {
                body: String::new(),
            },
            Self::Gallery => CardContent::Gallery { images: Vec::new() },
            Self::Video => CardContent::Video { src: None },
            Self::Audio => CardContent::Audio {
                src: None,
                autoplay: false,
                loop_playback: false,
            },
            Self::Music => CardContent::Music { embed_url: None },
            Self::Game => CardContent::Game {
                game: SmolStr::new_static("snake"),
            },
            Self::Release => CardContent::Release {
                release_at: None,
                show_countdown: true,
                notify_on_release: false,
            },
            Self::SocialIcons => CardContent::SocialIcons { links: Vec::new() },
            Self::EmailCollection => CardContent::EmailCollection {
                placeholder: SmolStr::new_static("your@email.com"),
                button_label: SmolStr::new_static("Subscribe"),
            },
        }
    }
}

/// Card display size. Some card types force `Big` (see [`CardType::forces_big`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    #[default]
    Small,
    Big,
}

/// Horizontal alignment hint for small cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A single entry in a social-icons card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub network: SmolStr,
    pub url: SmolStr,
}

/// Type-tagged content payload. The variant is expected to match the card's
/// `card_type` family, but mismatches are tolerated (a type change keeps the
/// old content until the caller patches it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardContent {
    Link {},
    Text {
        body: String,
    },
    Gallery {
        images: Vec<SmolStr>,
    },
    Video {
        src: Option<SmolStr>,
    },
    Audio {
        src: Option<SmolStr>,
        autoplay: bool,
        loop_playback: bool,
    },
    Music {
        embed_url: Option<SmolStr>,
    },
    Game {
        game: SmolStr,
    },
    Release {
        release_at: Option<u64>,
        show_countdown: bool,
        notify_on_release: bool,
    },
    SocialIcons {
        links: Vec<SocialLink>,
    },
    EmailCollection {
        placeholder: SmolStr,
        button_label: SmolStr,
    },
}

/// A single content unit on the page.
///
/// Display order among siblings is the lexicographic order of `sort_key`
/// (see [`crate::sortkey`]). `scatter_layouts` holds the per-theme freeform
/// position, keyed by theme id; themes without an entry flow in the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub page_id: SmolStr,
    pub card_type: CardType,
    #[serde(default)]
    pub title: SmolStr,
    #[serde(default)]
    pub description: SmolStr,
    #[serde(default)]
    pub url: Option<SmolStr>,
    pub content: CardContent,
    pub size: CardSize,
    #[serde(default)]
    pub position: CardAlign,
    #[serde(rename = "sortKey")]
    pub sort_key: SmolStr,
    pub is_visible: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scatter_layouts: HashMap<SmolStr, ScatterPosition>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Card {
    /// Create a card with type defaults and the given sort key.
    ///
    /// `size` is a request; types that force big ignore it.
    pub fn new(card_type: CardType, size: Option<CardSize>, sort_key: SmolStr) -> Self {
        let now = epoch_millis();
        Self {
            id: new_card_id(),
            page_id: SmolStr::default(),
            card_type,
            title: SmolStr::default(),
            description: SmolStr::default(),
            url: None,
            content: card_type.default_content(),
            size: effective_size(card_type, size.unwrap_or_default()),
            position: CardAlign::default(),
            sort_key,
            is_visible: true,
            scatter_layouts: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this card.
    ///
    /// The forced-big invariant holds even when `card_type` changes in the
    /// same patch: the new type is resolved first, then the size request is
    /// applied against it.
    pub fn apply(&mut self, patch: CardPatch) {
        if let Some(card_type) = patch.card_type {
            self.card_type = card_type;
        }
        let requested = patch.size.unwrap_or(self.size);
        self.size = effective_size(self.card_type, requested);

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(is_visible) = patch.is_visible {
            self.is_visible = is_visible;
        }
    }
}

/// Resolve a requested size against the type's constraints.
fn effective_size(card_type: CardType, requested: CardSize) -> CardSize {
    if card_type.forces_big() {
        CardSize::Big
    } else {
        requested
    }
}

/// Partial card update. `None` fields are left untouched.
///
/// `url` is doubly optional so a patch can distinguish "leave the url alone"
/// (`None`) from "clear it" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<SmolStr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<SmolStr>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "double_option"
    )]
    pub url: Option<Option<SmolStr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CardContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CardSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<CardAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl CardPatch {
    /// Patch that only sets the title.
    pub fn title(title: impl Into<SmolStr>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Patch that only sets visibility.
    pub fn visibility(is_visible: bool) -> Self {
        Self {
            is_visible: Some(is_visible),
            ..Self::default()
        }
    }
}

/// Serde helper: serialize `Option<Option<T>>` as the inner option.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Ok(Some(Option::deserialize(deserializer)?))
    }
}
