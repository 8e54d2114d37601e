//! Outbound compose-extension response payloads.

use serde::{Deserialize, Deserializer, Serialize};

use crate::extension_cards::{
    CardAction, HeroCard, ThumbnailCard, HERO_CARD_CONTENT_TYPE, THUMBNAIL_CARD_CONTENT_TYPE,
};

/// Card payload of an attachment. The sibling `contentType` field is the
/// authoritative discriminator on the wire; the untagged serialization here
/// only flattens the card body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CardContent {
    Hero(HeroCard),
    Thumbnail(ThumbnailCard),
}

/// One entry in a compose-extension result list. Search results pair a full
/// hero card with a tappable thumbnail preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionAttachment {
    pub content_type: String,
    pub content: CardContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<Box<MessagingExtensionAttachment>>,
}

impl<'de> Deserialize<'de> for MessagingExtensionAttachment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct RawAttachment {
            content_type: String,
            content: serde_json::Value,
            #[serde(default)]
            preview: Option<Box<MessagingExtensionAttachment>>,
        }

        let raw = RawAttachment::deserialize(deserializer)?;
        let content = match raw.content_type.as_str() {
            HERO_CARD_CONTENT_TYPE => CardContent::Hero(
                serde_json::from_value(raw.content).map_err(serde::de::Error::custom)?,
            ),
            THUMBNAIL_CARD_CONTENT_TYPE => CardContent::Thumbnail(
                serde_json::from_value(raw.content).map_err(serde::de::Error::custom)?,
            ),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "unsupported attachment content type '{other}'"
                )))
            }
        };
        Ok(Self {
            content_type: raw.content_type,
            content,
            preview: raw.preview,
        })
    }
}

impl MessagingExtensionAttachment {
    pub fn hero(card: HeroCard) -> Self {
        Self {
            content_type: HERO_CARD_CONTENT_TYPE.to_string(),
            content: CardContent::Hero(card),
            preview: None,
        }
    }

    pub fn thumbnail(card: ThumbnailCard) -> Self {
        Self {
            content_type: THUMBNAIL_CARD_CONTENT_TYPE.to_string(),
            content: CardContent::Thumbnail(card),
            preview: None,
        }
    }

    pub fn with_preview(mut self, preview: ThumbnailCard) -> Self {
        self.preview = Some(Box::new(Self::thumbnail(preview)));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessagingExtensionResultKind {
    Result,
    Auth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagingExtensionSuggestedActions {
    pub actions: Vec<CardAction>,
}

/// Tagged compose-extension result: either an ordered attachment list or an
/// authentication request with one suggested sign-in action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResult {
    #[serde(rename = "type")]
    pub result_type: MessagingExtensionResultKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_layout: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<MessagingExtensionAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<MessagingExtensionSuggestedActions>,
}

impl MessagingExtensionResult {
    /// Ordered result list rendered with the `list` attachment layout.
    pub fn result_list(attachments: Vec<MessagingExtensionAttachment>) -> Self {
        Self {
            result_type: MessagingExtensionResultKind::Result,
            attachment_layout: Some("list".to_string()),
            attachments,
            suggested_actions: None,
        }
    }

    pub fn auth(sign_in_action: CardAction) -> Self {
        Self {
            result_type: MessagingExtensionResultKind::Auth,
            attachment_layout: None,
            attachments: Vec::new(),
            suggested_actions: Some(MessagingExtensionSuggestedActions {
                actions: vec![sign_in_action],
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionResponse {
    pub compose_extension: MessagingExtensionResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionActionResponse {
    pub compose_extension: MessagingExtensionResult,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn result_list_serializes_with_platform_field_names() {
        let attachment = MessagingExtensionAttachment::hero(HeroCard {
            title: Some("Newtonsoft.Json".to_string()),
        })
        .with_preview(ThumbnailCard {
            title: Some("Newtonsoft.Json".to_string()),
            ..Default::default()
        });
        let response = MessagingExtensionResponse {
            compose_extension: MessagingExtensionResult::result_list(vec![attachment]),
        };

        let value = serde_json::to_value(&response).expect("serialize response");
        let compose = &value["composeExtension"];
        assert_eq!(compose["type"], json!("result"));
        assert_eq!(compose["attachmentLayout"], json!("list"));
        assert_eq!(
            compose["attachments"][0]["contentType"],
            json!(HERO_CARD_CONTENT_TYPE)
        );
        assert_eq!(
            compose["attachments"][0]["preview"]["contentType"],
            json!(THUMBNAIL_CARD_CONTENT_TYPE)
        );
    }

    #[test]
    fn attachment_content_deserializes_by_content_type() {
        let attachment: MessagingExtensionAttachment = serde_json::from_value(json!({
            "contentType": THUMBNAIL_CARD_CONTENT_TYPE,
            "content": {"title": "Newtonsoft.Json"}
        }))
        .expect("deserialize thumbnail attachment");
        assert!(matches!(attachment.content, CardContent::Thumbnail(_)));

        let attachment: MessagingExtensionAttachment = serde_json::from_value(json!({
            "contentType": HERO_CARD_CONTENT_TYPE,
            "content": {"title": "Newtonsoft.Json"}
        }))
        .expect("deserialize hero attachment");
        assert!(matches!(attachment.content, CardContent::Hero(_)));

        let error = serde_json::from_value::<MessagingExtensionAttachment>(json!({
            "contentType": "application/vnd.microsoft.card.adaptive",
            "content": {}
        }))
        .expect_err("unknown content type rejected");
        assert!(error.to_string().contains("unsupported attachment content type"));
    }

    #[test]
    fn auth_result_carries_one_suggested_action_and_no_attachments() {
        let result =
            MessagingExtensionResult::auth(CardAction::open_url("Sign in", "https://example.org"));
        let value = serde_json::to_value(&result).expect("serialize auth result");
        assert_eq!(value["type"], json!("auth"));
        assert!(value.get("attachments").is_none());
        assert!(value.get("attachmentLayout").is_none());
        assert_eq!(
            value["suggestedActions"]["actions"][0]["value"],
            json!("https://example.org")
        );
    }
}
