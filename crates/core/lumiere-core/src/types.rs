//! Core data types shared across the Lumiere crates

use serde::{Deserialize, Serialize};

/// A catalog product. Immutable once loaded; the catalog owns the
/// authoritative copies and the selection stores snapshots of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: u32,
    /// Display name
    pub name: String,
    /// Brand name
    pub brand: String,
    /// Category tag, one of the catalog's fixed set (e.g. "skincare",
    /// "makeup", "haircare", "fragrance"). Kept as data rather than an
    /// enum so an extended catalog file does not fail the whole load.
    pub category: String,
    /// Marketing description
    pub description: String,
    /// Image reference
    pub image: String,
}

/// Chat message role on the relay wire and in the conversation log.
///
/// Informational markers (routine-generation notes, locale notices) are
/// recorded with the `System` role so the upstream model sees them as
/// context rather than dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// System prompt or informational note
    System,
    /// End-user message
    User,
    /// Model reply
    Assistant,
}

/// One entry in the append-only conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Who produced the entry
    pub role: ChatRole,
    /// Entry text
    pub content: String,
}

impl ConversationEntry {
    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Create an assistant entry
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Create a system-note entry
    pub fn note(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// A single message on the relay wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: ChatRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ConversationEntry> for ChatMessage {
    fn from(entry: &ConversationEntry) -> Self {
        Self {
            role: entry.role,
            content: entry.content.clone(),
        }
    }
}

/// JSON-schema parameters of a declared tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    /// Schema type, always "object"
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Property declarations
    pub properties: serde_json::Value,
    /// Required property names
    pub required: Vec<String>,
}

/// A callable function declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionSpec {
    /// Function name
    pub name: String,
    /// Human-readable purpose
    pub description: String,
    /// Parameter schema
    pub parameters: ToolParameters,
}

/// A tool declaration in the outbound payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool kind, always "function"
    #[serde(rename = "type")]
    pub tool_type: String,
    /// The declared function
    pub function: FunctionSpec,
}

impl ToolSpec {
    /// Declare the `web_search` capability. The relay is permitted to
    /// simulate the search instead of executing it; callers must not
    /// assume a real search occurred.
    pub fn web_search(description: impl Into<String>) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionSpec {
                name: "web_search".to_string(),
                description: description.into(),
                parameters: ToolParameters {
                    schema_type: "object".to_string(),
                    properties: serde_json::json!({
                        "query": {
                            "type": "string",
                            "description": "The search query"
                        }
                    }),
                    required: vec!["query".to_string()],
                },
            },
        }
    }
}

/// Outbound request to the chat relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name
    pub model: String,
    /// System prompt, history window, and the new user message
    pub messages: Vec<ChatMessage>,
    /// Output size bound
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Optional tool declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolSpec>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(serde_json::to_string(&ChatRole::System).unwrap(), "\"system\"");
    }

    #[test]
    fn request_omits_absent_tools() {
        let req = ChatRequest {
            model: "gpt-4o".to_string(),
            messages: vec![ChatMessage::new(ChatRole::User, "hi")],
            max_tokens: 600,
            temperature: 0.7,
            tools: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("tools").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn web_search_tool_shape() {
        let tool = ToolSpec::web_search("Search the web for current information");
        let json = serde_json::to_value(&tool).unwrap();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "web_search");
        assert_eq!(json["function"]["parameters"]["required"][0], "query");
    }
}
