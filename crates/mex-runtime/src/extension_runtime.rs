//! Extension request handler that dispatches query, select-item, and
//! submit-action events.

use std::sync::Arc;

use anyhow::Result;
use mex_contract::{
    MessagingExtensionAction, MessagingExtensionActionResponse, MessagingExtensionQuery,
    MessagingExtensionResponse, MessagingExtensionResult, PackageSelectionPayload,
    SelectionPayloadError,
};
use mex_registry::{RegistrySearchClient, RegistrySearchError};
use serde_json::Value;
use thiserror::Error;

mod card_helpers;
mod login_state_store;

use card_helpers::{
    build_auth_result, build_logged_in_attachment, build_search_result_attachment,
    build_selected_package_attachment, record_from_selection,
};
pub use login_state_store::{InMemoryLoginStateStore, LoginStateStore};

/// Runtime configuration for the compose-extension handler.
#[derive(Debug, Clone)]
pub struct ExtensionRuntimeConfig {
    pub registry_api_base: String,
    pub request_timeout_ms: u64,
    pub sign_in_url: String,
}

/// Handler failure taxonomy. Benign absences (missing parameters, empty
/// optional URLs) never error; they default.
#[derive(Debug, Error)]
pub enum ExtensionHandlerError {
    #[error("package search is unavailable")]
    SearchUnavailable(#[from] RegistrySearchError),
    #[error("malformed selection payload")]
    MalformedSelection(#[from] SelectionPayloadError),
}

/// Root component: one instance serves every concurrently dispatched inbound
/// event. Holds no mutable state of its own; login state lives behind the
/// injected store.
pub struct ExtensionRequestHandler {
    search_client: RegistrySearchClient,
    login_state: Arc<dyn LoginStateStore>,
    sign_in_url: String,
}

impl ExtensionRequestHandler {
    pub fn new(
        config: &ExtensionRuntimeConfig,
        login_state: Arc<dyn LoginStateStore>,
    ) -> Result<Self> {
        let search_client =
            RegistrySearchClient::new(&config.registry_api_base, config.request_timeout_ms)?;
        Ok(Self {
            search_client,
            login_state,
            sign_in_url: config.sign_in_url.clone(),
        })
    }

    /// Searches the registry with the query's free text (empty when no
    /// parameter was supplied) and builds one full/preview attachment pair per
    /// record, preserving registry order. A failed search propagates
    /// untransformed; the platform layer owns the user-visible error surface.
    pub async fn on_query(
        &self,
        query: &MessagingExtensionQuery,
    ) -> Result<MessagingExtensionResponse, ExtensionHandlerError> {
        let records = self.search_client.search(query.text()).await?;
        let attachments = records
            .iter()
            .map(build_search_result_attachment)
            .collect::<Vec<_>>();
        Ok(MessagingExtensionResponse {
            compose_extension: MessagingExtensionResult::result_list(attachments),
        })
    }

    /// Rebuilds the package record embedded in a preview tap payload and
    /// returns a single detail card. Pure: no network or state access.
    pub fn on_select_item(
        &self,
        value: &Value,
    ) -> Result<MessagingExtensionResponse, ExtensionHandlerError> {
        let payload = PackageSelectionPayload::parse(value)?;
        let record = record_from_selection(&payload);
        Ok(MessagingExtensionResponse {
            compose_extension: MessagingExtensionResult::result_list(vec![
                build_selected_package_attachment(&record),
            ]),
        })
    }

    /// Captures a login-state payload when present, then answers with either
    /// an auth request or a logged-in card. Per-user state is two-valued:
    /// anonymous until a submit-action carries a state value, named for the
    /// rest of the process afterwards. There is no sign-out transition.
    pub fn on_submit_action(
        &self,
        action: &MessagingExtensionAction,
    ) -> MessagingExtensionActionResponse {
        let user_id = action
            .sender
            .as_ref()
            .and_then(|sender| sender.user_id.as_deref())
            .filter(|id| !id.is_empty());

        // Sole write path into the store. The submitted state value doubles
        // as the display name; nothing verifies a real session key.
        if let (Some(user_id), Some(state)) = (user_id, action.value.state.as_deref()) {
            self.login_state.put(user_id, state);
        }

        let compose_extension = match user_id.and_then(|id| self.login_state.get(id)) {
            Some(display_name) => MessagingExtensionResult::result_list(vec![
                build_logged_in_attachment(&display_name),
            ]),
            None => build_auth_result(&self.sign_in_url),
        };
        MessagingExtensionActionResponse { compose_extension }
    }
}
