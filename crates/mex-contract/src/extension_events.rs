//! Inbound compose-extension events dispatched by the hosting platform.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current version tag carried in preview tap payloads.
pub const SELECTION_PAYLOAD_VERSION: u32 = 1;
/// Positional fields in a selection payload: name, version, description,
/// project URL, icon URL.
pub const SELECTION_FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingExtensionParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Free-text search request. A missing or empty parameter list is treated as
/// an empty query, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagingExtensionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<MessagingExtensionParameter>,
}

impl MessagingExtensionQuery {
    pub fn text(&self) -> &str {
        self.parameters
            .first()
            .map(|parameter| parameter.value.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSender {
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionValue {
    #[serde(default)]
    pub state: Option<String>,
}

/// Submit-action event carrying an optional login-state payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingExtensionAction {
    #[serde(default)]
    pub sender: Option<ActionSender>,
    #[serde(default)]
    pub value: ActionValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionPayloadError {
    #[error("selection payload is not an object with a string-array 'data' field")]
    MalformedShape,
    #[error("selection payload version {found} is unsupported (expected {SELECTION_PAYLOAD_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("selection payload carried {found} fields (expected {SELECTION_FIELD_COUNT})")]
    WrongFieldCount { found: usize },
}

/// Structured record embedded in a preview card's tap action so a select-item
/// event can rebuild the package record without a second registry call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSelectionPayload {
    #[serde(default = "default_selection_version")]
    pub version: u32,
    pub data: Vec<String>,
}

fn default_selection_version() -> u32 {
    SELECTION_PAYLOAD_VERSION
}

impl PackageSelectionPayload {
    pub fn for_fields(fields: [String; SELECTION_FIELD_COUNT]) -> Self {
        Self {
            version: SELECTION_PAYLOAD_VERSION,
            data: fields.to_vec(),
        }
    }

    /// Validates an inbound select-item value. Anything that is not a
    /// version-1 payload with exactly five string fields is rejected instead
    /// of being interpreted loosely.
    pub fn parse(value: &Value) -> Result<Self, SelectionPayloadError> {
        let payload: Self = serde_json::from_value(value.clone())
            .map_err(|_| SelectionPayloadError::MalformedShape)?;
        if payload.version != SELECTION_PAYLOAD_VERSION {
            return Err(SelectionPayloadError::UnsupportedVersion {
                found: payload.version,
            });
        }
        if payload.data.len() != SELECTION_FIELD_COUNT {
            return Err(SelectionPayloadError::WrongFieldCount {
                found: payload.data.len(),
            });
        }
        Ok(payload)
    }
}
