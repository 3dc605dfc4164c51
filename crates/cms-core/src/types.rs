//! Page document data contracts.
//!
//! These mirror the JSON the CMS endpoint returns. Decoding is deliberately
//! lenient: missing or `null` collections become empty, missing ids become the
//! empty string, and optional text fields holding a non-string value decode as
//! `None` instead of rejecting the whole page.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A full CMS page as returned by `GET {base_url}/{page_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    /// Page title.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Standalone image blocks.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub images: Vec<ImageBlock>,
    /// Standalone text blocks.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub text_blocks: Vec<TextBlock>,
    /// Named lists of image blocks.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub image_block_lists: Vec<ImageBlockList>,
    /// Named lists of text blocks.
    #[serde(default, deserialize_with = "nullable_vec")]
    pub text_block_lists: Vec<TextBlockList>,
}

/// A single piece of text content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Identifier, unique among the page's text blocks.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Text content.
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: Option<String>,
}

/// A single image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBlock {
    /// Identifier, unique among the page's image blocks.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Location of the image.
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    /// Alternative text for accessibility.
    #[serde(default, deserialize_with = "lenient_string")]
    pub alt_text: Option<String>,
    /// Longer description; the CMS sends `null` when cleared.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// A named, ordered group of text blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlockList {
    /// Identifier, unique among the page's text block lists.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Blocks in display order.
    #[serde(
        default,
        rename = "textBlocks",
        alias = "items",
        deserialize_with = "nullable_vec"
    )]
    pub items: Vec<TextBlock>,
}

/// A named, ordered group of image blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlockList {
    /// Identifier, unique among the page's image block lists.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Blocks in display order.
    #[serde(
        default,
        rename = "imageBlocks",
        alias = "items",
        deserialize_with = "nullable_vec"
    )]
    pub items: Vec<ImageBlock>,
}

impl TextBlock {
    /// Create a text block with content.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Some(content.into()),
        }
    }
}

impl ImageBlock {
    /// Create an image block pointing at `image_url`.
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_url: Some(image_url.into()),
            ..Self::default()
        }
    }
}

/// Request lifecycle of the page store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing requested, or reset.
    #[default]
    Idle,
    /// A request for the page id is outstanding.
    Loading(String),
    /// The page id was loaded successfully.
    Loaded(String, std::sync::Arc<PageDocument>),
    /// Loading the page id failed with the given message.
    Failed(String, String),
}

impl LoadStatus {
    /// Page id this status refers to, if any.
    #[must_use]
    pub fn page_id(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Loading(id) | Self::Loaded(id, _) | Self::Failed(id, _) => Some(id),
        }
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}
