//! Card schema shared by compose-extension responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const HERO_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.hero";
pub const THUMBNAIL_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.thumbnail";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardActionType {
    OpenUrl,
    Invoke,
}

/// A tappable action attached to a card or one of its buttons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: CardActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub value: Value,
}

impl CardAction {
    pub fn open_url(title: &str, url: &str) -> Self {
        Self {
            action_type: CardActionType::OpenUrl,
            title: Some(title.to_string()),
            value: Value::String(url.to_string()),
        }
    }

    pub fn invoke(value: Value) -> Self {
        Self {
            action_type: CardActionType::Invoke,
            title: None,
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImage {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Compact card used for previews and selection results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<CardImage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<CardAction>,
}

/// Full card paired with a preview in search results. Only the title is
/// populated in this design; the record detail travels in the preview's tap
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
