//! Chat relay service
//!
//! Stateless HTTP intermediary between the advisor clients and the
//! upstream chat-completions API. The relay holds the upstream bearer
//! credential; clients authenticate nothing. When a request declares
//! the `web_search` tool, the relay rewrites the system message with
//! search-simulation instructions and drops the tool declaration before
//! forwarding - it never performs a real search, and callers must not
//! assume one occurred.

#![warn(missing_docs)]
#![warn(clippy::all)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Appended to the system message when simulating web search
const SEARCH_SIMULATION_INSTRUCTIONS: &str = "\n\nIMPORTANT: You have access to \
current information about beauty products, trends, and skincare routines. When \
providing information, include recent developments, current product availability, \
and cite sources when possible. Format any web sources you reference as:\n\n\
Source: [Website Name] - [Brief Description]\nURL: [URL if available]\n\nFocus on \
providing the most current and accurate information about beauty products, \
application techniques, and beauty advice.";

/// Model pinned onto search-simulated requests
const SEARCH_MODEL: &str = "gpt-4o";

/// Relay configuration and the shared upstream client
pub struct RelayState {
    upstream_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl RelayState {
    /// Create relay state for the given upstream endpoint and credential
    pub fn new(upstream_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            upstream_url: upstream_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
        }
    }
}

/// Build the relay router: `POST /` with permissive CORS. Preflight
/// `OPTIONS` is answered by the CORS layer; other methods get 405.
pub fn router(state: Arc<RelayState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);
    Router::new()
        .route("/", post(relay))
        .layer(cors)
        .with_state(state)
}

/// True when the payload declares the `web_search` function tool
pub fn has_web_search(payload: &Value) -> bool {
    payload
        .get("tools")
        .and_then(Value::as_array)
        .map(|tools| {
            tools.iter().any(|tool| {
                tool.get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(Value::as_str)
                    == Some("web_search")
            })
        })
        .unwrap_or(false)
}

/// Rewrite a search-declaring payload for the upstream API: append the
/// simulation instructions to every system message, drop the tool
/// declarations, and pin the model.
pub fn rewrite_for_search(mut payload: Value) -> Value {
    if let Some(messages) = payload.get_mut("messages").and_then(Value::as_array_mut) {
        for message in messages.iter_mut() {
            if message.get("role").and_then(Value::as_str) == Some("system") {
                if let Some(content) = message.get("content").and_then(Value::as_str) {
                    let augmented = format!("{}{}", content, SEARCH_SIMULATION_INSTRUCTIONS);
                    message["content"] = Value::String(augmented);
                }
            }
        }
    }
    if let Some(obj) = payload.as_object_mut() {
        obj.remove("tools");
        obj.insert("model".to_string(), Value::String(SEARCH_MODEL.to_string()));
    }
    payload
}

/// Number of entries in the payload's `messages` list, 0 when absent.
/// Kept out of the logging macro: `tracing` brings its own `Value` trait
/// into the expansion scope, which shadows `serde_json::Value` there.
fn message_count(payload: &Value) -> usize {
    payload
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

async fn relay(State(state): State<Arc<RelayState>>, Json(payload): Json<Value>) -> Response {
    let simulate = has_web_search(&payload);
    let outbound = if simulate {
        rewrite_for_search(payload)
    } else {
        payload
    };
    info!(
        "Forwarding chat request: search_simulation={} messages={}",
        simulate,
        message_count(&outbound)
    );

    let upstream = state
        .client
        .post(&state.upstream_url)
        .bearer_auth(&state.api_key)
        .json(&outbound)
        .send()
        .await;

    match upstream {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => (
                StatusCode::OK,
                [(axum::http::header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => internal_error(&format!("reading upstream body: {}", e)),
        },
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Upstream API error: status={} body={}", status, body);
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "Upstream error",
                    "message": format!("upstream returned status {}", status),
                })),
            )
                .into_response()
        }
        Err(e) => internal_error(&format!("upstream request failed: {}", e)),
    }
}

fn internal_error(detail: &str) -> Response {
    error!("Relay error: {}", detail);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "message": "relay request failed",
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_payload() -> Value {
        json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "You are a beauty expert."},
                {"role": "user", "content": "Best SPF?"}
            ],
            "max_tokens": 600,
            "temperature": 0.7,
            "tools": [
                {"type": "function", "function": {"name": "web_search",
                 "description": "Search the web",
                 "parameters": {"type": "object", "properties": {}, "required": ["query"]}}}
            ]
        })
    }

    #[test]
    fn detects_web_search_declaration() {
        assert!(has_web_search(&search_payload()));
        assert!(!has_web_search(&json!({"messages": []})));
        assert!(!has_web_search(&json!({
            "tools": [{"type": "function", "function": {"name": "calculator"}}]
        })));
    }

    #[test]
    fn rewrite_augments_system_and_strips_tools() {
        let rewritten = rewrite_for_search(search_payload());
        assert!(rewritten.get("tools").is_none());
        assert_eq!(rewritten["model"], SEARCH_MODEL);

        let system = rewritten["messages"][0]["content"].as_str().unwrap();
        assert!(system.starts_with("You are a beauty expert."));
        assert!(system.contains("Source: [Website Name]"));

        // User messages are untouched
        assert_eq!(rewritten["messages"][1]["content"], "Best SPF?");
    }

    #[test]
    fn message_count_tolerates_missing_or_malformed_lists() {
        assert_eq!(message_count(&search_payload()), 2);
        assert_eq!(message_count(&json!({})), 0);
        assert_eq!(message_count(&json!({"messages": "not a list"})), 0);
    }

    #[test]
    fn rewrite_without_system_message_still_strips_tools() {
        let payload = json!({
            "messages": [{"role": "user", "content": "hi"}],
            "tools": []
        });
        let rewritten = rewrite_for_search(payload);
        assert!(rewritten.get("tools").is_none());
        assert_eq!(rewritten["messages"][0]["content"], "hi");
    }
}
