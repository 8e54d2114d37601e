//! Tests for registry search normalization and failure classification.

use httpmock::prelude::*;
use serde_json::json;

use super::{PackageRecord, RegistrySearchClient, RegistrySearchError};

fn test_client(base_url: &str) -> RegistrySearchClient {
    RegistrySearchClient::new(base_url, 3_000).expect("build registry search client")
}

#[tokio::test]
async fn search_maps_registry_rows_in_response_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/query")
                .query_param("q", "id:Newtonsoft")
                .query_param("prerelease", "true");
            then.status(200).json_body(json!({
                "totalHits": 2,
                "data": [
                    {
                        "id": "Newtonsoft.Json",
                        "version": "13.0.1",
                        "description": "Json.NET",
                        "projectUrl": "https://www.newtonsoft.com/json",
                        "iconUrl": "https://example.org/icon.png"
                    },
                    {
                        "id": "Newtonsoft.Json.Bson",
                        "version": "1.0.2",
                        "description": "BSON support"
                    }
                ]
            }));
        })
        .await;

    let records = test_client(&server.base_url())
        .search("Newtonsoft")
        .await
        .expect("search succeeds");
    mock.assert_async().await;

    assert_eq!(
        records,
        vec![
            PackageRecord {
                name: "Newtonsoft.Json".to_string(),
                version: "13.0.1".to_string(),
                description: "Json.NET".to_string(),
                project_url: "https://www.newtonsoft.com/json".to_string(),
                icon_url: "https://example.org/icon.png".to_string(),
            },
            PackageRecord {
                name: "Newtonsoft.Json.Bson".to_string(),
                version: "1.0.2".to_string(),
                description: "BSON support".to_string(),
                project_url: String::new(),
                icon_url: String::new(),
            },
        ]
    );
}

#[tokio::test]
async fn search_url_encodes_the_query_text() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/query")
                .query_param("q", "id:json & co?")
                .query_param("prerelease", "true");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let records = test_client(&server.base_url())
        .search("json & co?")
        .await
        .expect("search succeeds");
    mock.assert_async().await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn search_passes_empty_query_through_unspecialized() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/query").query_param("q", "id:");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    test_client(&server.base_url())
        .search("")
        .await
        .expect("empty query searches");
    mock.assert_async().await;
}

#[tokio::test]
async fn search_classifies_non_success_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query");
            then.status(503).body("registry down");
        })
        .await;

    let error = test_client(&server.base_url())
        .search("Newtonsoft")
        .await
        .expect_err("search fails");
    assert!(matches!(
        error,
        RegistrySearchError::Status { status: 503 }
    ));
}

#[tokio::test]
async fn search_classifies_unparsable_bodies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let error = test_client(&server.base_url())
        .search("Newtonsoft")
        .await
        .expect_err("search fails");
    assert!(matches!(error, RegistrySearchError::MalformedBody(_)));
}

#[tokio::test]
async fn search_rejects_rows_missing_required_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/query");
            then.status(200)
                .json_body(json!({"data": [{"id": "NoVersion"}]}));
        })
        .await;

    let error = test_client(&server.base_url())
        .search("NoVersion")
        .await
        .expect_err("search fails");
    assert!(matches!(error, RegistrySearchError::MalformedBody(_)));
}

#[tokio::test]
async fn search_classifies_transport_failures() {
    let error = test_client("http://127.0.0.1:9")
        .search("Newtonsoft")
        .await
        .expect_err("search fails");
    assert!(matches!(error, RegistrySearchError::Transport(_)));
}
