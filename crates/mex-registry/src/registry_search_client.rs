//! Registry search client used by the query handler.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Normalized search result row. Produced only by [`RegistrySearchClient`];
/// optional registry fields default to empty strings, never null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub description: String,
    pub project_url: String,
    pub icon_url: String,
}

/// Search failure taxonomy. All variants mean the registry is unavailable for
/// this call; there are no retries and no partial results.
#[derive(Debug, Error)]
pub enum RegistrySearchError {
    #[error("registry search request failed")]
    Transport(#[source] reqwest::Error),
    #[error("registry search returned status {status}")]
    Status { status: u16 },
    #[error("registry search returned a malformed body")]
    MalformedBody(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistrySearchItem {
    id: String,
    version: String,
    description: String,
    #[serde(default)]
    project_url: String,
    #[serde(default)]
    icon_url: String,
}

impl From<RegistrySearchItem> for PackageRecord {
    fn from(item: RegistrySearchItem) -> Self {
        Self {
            name: item.id,
            version: item.version,
            description: item.description,
            project_url: item.project_url,
            icon_url: item.icon_url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RegistrySearchBody {
    data: Vec<RegistrySearchItem>,
}

#[derive(Clone)]
pub struct RegistrySearchClient {
    http: reqwest::Client,
    api_base: String,
}

impl RegistrySearchClient {
    pub fn new(api_base: &str, request_timeout_ms: u64) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("mex-package-search"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .context("failed to create registry search client")?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Issues exactly one `GET {api_base}/query?q=id:{query_text}&prerelease=true`
    /// request. The query text is passed through reqwest's query encoding, so
    /// user input cannot rewrite the request URL. Result order is the registry
    /// response order.
    pub async fn search(&self, query_text: &str) -> Result<Vec<PackageRecord>, RegistrySearchError> {
        let response = self
            .http
            .get(format!("{}/query", self.api_base))
            .query(&[
                ("q", format!("id:{query_text}")),
                ("prerelease", "true".to_string()),
            ])
            .send()
            .await
            .map_err(|error| {
                tracing::warn!(%error, "registry search request failed");
                RegistrySearchError::Transport(error)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                "registry search returned non-success status"
            );
            return Err(RegistrySearchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|error| {
            tracing::warn!(%error, "registry search response body read failed");
            RegistrySearchError::Transport(error)
        })?;
        let parsed: RegistrySearchBody = serde_json::from_str(&body).map_err(|error| {
            tracing::warn!(%error, "registry search returned a malformed body");
            RegistrySearchError::MalformedBody(error)
        })?;
        Ok(parsed.data.into_iter().map(PackageRecord::from).collect())
    }
}
