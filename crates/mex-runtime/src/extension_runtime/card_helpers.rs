//! Card-composition helpers for compose-extension responses. All pure.

use mex_contract::{
    CardAction, CardImage, HeroCard, MessagingExtensionAttachment, MessagingExtensionResult,
    PackageSelectionPayload, ThumbnailCard,
};
use mex_registry::PackageRecord;
use serde_json::json;

const ICON_ALT_TEXT: &str = "Icon";
const PROJECT_BUTTON_TITLE: &str = "Project";
const SIGN_IN_ACTION_TITLE: &str = "Sign in to this app";

fn icon_images(icon_url: &str) -> Vec<CardImage> {
    if icon_url.is_empty() {
        Vec::new()
    } else {
        vec![CardImage {
            url: icon_url.to_string(),
            alt: Some(ICON_ALT_TEXT.to_string()),
        }]
    }
}

pub(super) fn selection_payload_for_record(record: &PackageRecord) -> PackageSelectionPayload {
    PackageSelectionPayload::for_fields([
        record.name.clone(),
        record.version.clone(),
        record.description.clone(),
        record.project_url.clone(),
        record.icon_url.clone(),
    ])
}

pub(super) fn record_from_selection(payload: &PackageSelectionPayload) -> PackageRecord {
    PackageRecord {
        name: payload.data[0].clone(),
        version: payload.data[1].clone(),
        description: payload.data[2].clone(),
        project_url: payload.data[3].clone(),
        icon_url: payload.data[4].clone(),
    }
}

/// One search result: a hero card carrying only the title, previewed by a
/// thumbnail whose invoke tap embeds the whole record for selection time.
pub(super) fn build_search_result_attachment(
    record: &PackageRecord,
) -> MessagingExtensionAttachment {
    let tap = CardAction::invoke(json!(selection_payload_for_record(record)));
    let preview = ThumbnailCard {
        title: Some(record.name.clone()),
        images: icon_images(&record.icon_url),
        tap: Some(tap),
        ..Default::default()
    };
    MessagingExtensionAttachment::hero(HeroCard {
        title: Some(record.name.clone()),
    })
    .with_preview(preview)
}

/// Detail card shown after the user selects a preview.
pub(super) fn build_selected_package_attachment(
    record: &PackageRecord,
) -> MessagingExtensionAttachment {
    MessagingExtensionAttachment::thumbnail(ThumbnailCard {
        title: Some(record.name.clone()),
        subtitle: Some(record.description.clone()),
        images: icon_images(&record.icon_url),
        buttons: vec![CardAction::open_url(
            PROJECT_BUTTON_TITLE,
            &record.project_url,
        )],
        tap: None,
    })
}

pub(super) fn build_logged_in_attachment(display_name: &str) -> MessagingExtensionAttachment {
    MessagingExtensionAttachment::thumbnail(ThumbnailCard {
        title: Some(format!("Insight added by {display_name}")),
        ..Default::default()
    })
}

pub(super) fn build_auth_result(sign_in_url: &str) -> MessagingExtensionResult {
    MessagingExtensionResult::auth(CardAction::open_url(SIGN_IN_ACTION_TITLE, sign_in_url))
}
