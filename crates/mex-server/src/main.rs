//! Activity endpoint binary for the package-search messaging extension.
//!
//! Receives Bot-Framework-style invoke activities on `POST /api/messages`,
//! dispatches them to the extension request handler, and maps handler failures
//! to HTTP statuses. Everything conversational lives in `mex-runtime`; this
//! binary is wiring only.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use clap::Parser;
use mex_contract::{ActionSender, ActionValue, MessagingExtensionAction, MessagingExtensionQuery};
use mex_runtime::{
    ExtensionHandlerError, ExtensionRequestHandler, ExtensionRuntimeConfig,
    InMemoryLoginStateStore,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;


const MESSAGES_ENDPOINT: &str = "/api/messages";
const INVOKE_ACTIVITY_TYPE: &str = "invoke";
const QUERY_INVOKE_NAME: &str = "composeExtension/query";
const SELECT_ITEM_INVOKE_NAME: &str = "composeExtension/selectItem";
const SUBMIT_ACTION_INVOKE_NAME: &str = "composeExtension/submitAction";

#[derive(Debug, Parser)]
#[command(name = "mex-server", about = "Package-search messaging extension server")]
struct ServerArgs {
    /// Address the activity endpoint binds to.
    #[arg(long, default_value = "127.0.0.1:3978")]
    bind: String,
    /// Base URL of the package registry search service.
    #[arg(long, default_value = "https://azuresearch-usnc.nuget.org")]
    registry_api_base: String,
    /// Sign-in page offered to anonymous users on submit-action.
    #[arg(long, default_value = "https://127.0.0.1:3978/login.html")]
    sign_in_url: String,
    /// Outbound registry request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    request_timeout_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ActivityAccount {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InboundActivity {
    #[serde(rename = "type")]
    activity_type: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    from: Option<ActivityAccount>,
}

struct ServerState {
    handler: ExtensionRequestHandler,
}

fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = ServerArgs::parse();
    run_server(args).await
}

async fn run_server(args: ServerArgs) -> Result<()> {
    let bind_addr = args
        .bind
        .parse::<SocketAddr>()
        .with_context(|| format!("invalid --bind '{}'", args.bind))?;

    let config = ExtensionRuntimeConfig {
        registry_api_base: args.registry_api_base,
        request_timeout_ms: args.request_timeout_ms,
        sign_in_url: args.sign_in_url,
    };
    let handler =
        ExtensionRequestHandler::new(&config, Arc::new(InMemoryLoginStateStore::new()))?;

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind messaging extension server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve bound server address")?;
    tracing::info!(
        endpoint = MESSAGES_ENDPOINT,
        addr = %local_addr,
        registry = %config.registry_api_base,
        "messaging extension server listening"
    );

    let app = build_router(Arc::new(ServerState { handler }));
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("messaging extension server exited unexpectedly")
}

fn build_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(MESSAGES_ENDPOINT, post(handle_messages))
        .with_state(state)
}

async fn handle_messages(
    State(state): State<Arc<ServerState>>,
    Json(activity): Json<InboundActivity>,
) -> Response {
    if activity.activity_type != INVOKE_ACTIVITY_TYPE {
        return StatusCode::OK.into_response();
    }

    match activity.name.as_deref() {
        Some(QUERY_INVOKE_NAME) => {
            let query: MessagingExtensionQuery =
                serde_json::from_value(activity.value).unwrap_or_default();
            match state.handler.on_query(&query).await {
                Ok(response) => Json(response).into_response(),
                Err(error) => handler_error_response(&error),
            }
        }
        Some(SELECT_ITEM_INVOKE_NAME) => match state.handler.on_select_item(&activity.value) {
            Ok(response) => Json(response).into_response(),
            Err(error) => handler_error_response(&error),
        },
        Some(SUBMIT_ACTION_INVOKE_NAME) => {
            let action = MessagingExtensionAction {
                sender: activity
                    .from
                    .map(|account| ActionSender { user_id: account.id }),
                value: serde_json::from_value::<ActionValue>(activity.value).unwrap_or_default(),
            };
            Json(state.handler.on_submit_action(&action)).into_response()
        }
        other => {
            tracing::warn!(name = other.unwrap_or(""), "unsupported invoke name");
            (
                StatusCode::NOT_IMPLEMENTED,
                Json(json!({
                    "error": format!("unsupported invoke name '{}'", other.unwrap_or(""))
                })),
            )
                .into_response()
        }
    }
}

fn handler_error_response(error: &ExtensionHandlerError) -> Response {
    let status = match error {
        ExtensionHandlerError::MalformedSelection(_) => StatusCode::BAD_REQUEST,
        ExtensionHandlerError::SearchUnavailable(_) => StatusCode::BAD_GATEWAY,
    };
    tracing::warn!(%error, "extension invoke failed");
    (status, Json(json!({"error": error.to_string()}))).into_response()
}
