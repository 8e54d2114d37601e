//! Wire contract for the package-search messaging extension.
//!
//! Defines the inbound compose-extension events, card schema, and outbound
//! response payloads exchanged with the hosting chat platform. All types here
//! are plain serde data with no I/O.

pub mod extension_cards;
pub mod extension_events;
pub mod extension_responses;

pub use extension_cards::{
    CardAction, CardActionType, CardImage, HeroCard, ThumbnailCard, HERO_CARD_CONTENT_TYPE,
    THUMBNAIL_CARD_CONTENT_TYPE,
};
pub use extension_events::{
    ActionSender, ActionValue, MessagingExtensionAction, MessagingExtensionParameter,
    MessagingExtensionQuery, PackageSelectionPayload, SelectionPayloadError,
    SELECTION_FIELD_COUNT, SELECTION_PAYLOAD_VERSION,
};
pub use extension_responses::{
    CardContent, MessagingExtensionActionResponse, MessagingExtensionAttachment,
    MessagingExtensionResponse, MessagingExtensionResult, MessagingExtensionResultKind,
    MessagingExtensionSuggestedActions,
};
