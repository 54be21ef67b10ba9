//! Relay HTTP client
//!
//! Speaks the chat relay's wire contract: a single POST carrying
//! `{model, messages, max_tokens, temperature, tools?}`, answered with
//! the upstream completion JSON (`choices[0].message.content`) or a
//! JSON error body on a non-2xx status. The relay holds the upstream
//! credential; the client sends none.

#![warn(missing_docs)]
#![warn(clippy::all)]

use async_trait::async_trait;
use lumiere_core::{ChatProvider, ChatRequest, LumiereError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, error};

/// Shared HTTP client for connection pooling across relay calls
static HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

/// Default bound on a single relay call
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn get_http_client() -> Arc<Client> {
    HTTP_CLIENT
        .get_or_init(|| {
            Arc::new(
                Client::builder()
                    .pool_max_idle_per_host(10)
                    .connect_timeout(Duration::from_secs(10))
                    .build()
                    .unwrap_or_else(|e| {
                        panic!(
                            "Failed to create HTTP client: {}. This is a configuration error.",
                            e
                        )
                    }),
            )
        })
        .clone()
}

/// Successful completion body; only the first choice's text is read
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Error body returned by the relay on failure
#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the chat relay endpoint
pub struct RelayClient {
    client: Arc<Client>,
    endpoint: String,
    timeout: Duration,
}

impl RelayClient {
    /// Create a client for the given relay endpoint with the default
    /// 30 second request bound
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: get_http_client(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Parse a completion body into its first choice's text
    fn extract_content(body: &str) -> Result<String> {
        let parsed: CompletionResponse = serde_json::from_str(body)
            .map_err(|e| LumiereError::relay(format!("unreadable completion body: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LumiereError::relay("completion body had no choices"))
    }

    /// Summarize an error body without ever surfacing it to the user
    fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<RelayErrorBody>(body) {
            Ok(parsed) => format!(
                "status {}: {}",
                status,
                parsed
                    .message
                    .or(parsed.error)
                    .unwrap_or_else(|| "no detail".to_string())
            ),
            Err(_) => format!("status {} with non-JSON body", status),
        }
    }
}

#[async_trait]
impl ChatProvider for RelayClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        debug!(
            "Relay call: model={} messages={} max_tokens={} tools={}",
            request.model,
            request.messages.len(),
            request.max_tokens,
            request.tools.is_some()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let detail = Self::describe_error(status, &body);
            error!("Relay call failed: {}", detail);
            return Err(LumiereError::relay(detail));
        }
        Self::extract_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_core::{ChatMessage, ChatRole};

    #[test]
    fn extracts_first_choice_content() {
        let body = r#"{"choices":[{"message":{"content":"Apply serum nightly."}}]}"#;
        assert_eq!(
            RelayClient::extract_content(body).unwrap(),
            "Apply serum nightly."
        );
    }

    #[test]
    fn tolerates_extra_upstream_fields() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}
            ],
            "usage": {"total_tokens": 12}
        }"#;
        assert_eq!(RelayClient::extract_content(body).unwrap(), "ok");
    }

    #[test]
    fn empty_choices_is_a_relay_error() {
        let body = r#"{"choices":[]}"#;
        match RelayClient::extract_content(body) {
            Err(LumiereError::Relay(msg)) => assert!(msg.contains("no choices")),
            other => panic!("expected relay error, got {:?}", other),
        }
    }

    #[test]
    fn error_bodies_are_summarized_not_echoed() {
        let detail = RelayClient::describe_error(
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"Internal server error","message":"upstream exploded"}"#,
        );
        assert!(detail.contains("500"));
        assert!(detail.contains("upstream exploded"));

        let fallback =
            RelayClient::describe_error(reqwest::StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(fallback.contains("non-JSON"));
    }

    #[test]
    fn outbound_payload_matches_wire_contract() {
        let request = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![
                ChatMessage::new(ChatRole::System, "persona"),
                ChatMessage::new(ChatRole::User, "question"),
            ],
            max_tokens: 600,
            temperature: 0.7,
            tools: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["messages"][1]["content"], "question");
        assert_eq!(json["max_tokens"], 600);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }
}
