//! Wire types for schema-constrained chat completions
//!
//! These mirror the OpenAI chat completions request shape closely enough that a
//! `CompletionRequest` serializes directly into the request body, which is also
//! what gets written to the run log.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default model; the first snapshot with structured output support
pub const DEFAULT_MODEL: &str = "gpt-4o-2024-08-06";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions
    System,
    /// Input
    User,
    /// Model output
    Assistant,
}

/// One message of a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// User message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Named JSON Schema envelope expected by the completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSchemaFormat {
    /// Schema name (the primary type's name)
    pub name: String,

    /// Strict mode: the endpoint guarantees conformance
    pub strict: bool,

    /// Primary type body with a nested `definitions` bucket
    pub schema: Value,
}

/// `response_format` of a completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Constrain the answer to a JSON Schema
    JsonSchema {
        /// The schema envelope
        json_schema: JsonSchemaFormat,
    },
}

/// A structured completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,

    /// Conversation, system message first
    pub messages: Vec<ChatMessage>,

    /// Output constraint
    pub response_format: ResponseFormat,
}

impl CompletionRequest {
    /// Request with one system and one user message, bound to `schema`
    pub fn structured(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema: JsonSchemaFormat,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            response_format: ResponseFormat::JsonSchema {
                json_schema: schema,
            },
        }
    }

    /// Content of the user message, if any
    pub fn user_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// Result of a structured completion call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedCompletion {
    /// First choice's parsed payload; `None` when the model declined or
    /// returned no content
    pub parsed: Option<Value>,

    /// Refusal text, when the model refused
    pub refusal: Option<String>,
}

impl ParsedCompletion {
    /// Completion carrying a parsed payload
    pub fn parsed(value: Value) -> Self {
        Self {
            parsed: Some(value),
            refusal: None,
        }
    }

    /// Completion with no payload
    pub fn empty() -> Self {
        Self::default()
    }
}
