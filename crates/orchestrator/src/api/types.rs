//! OpenAI-compatible request and response types
//!
//! Only the fields this pipeline actually honors are modeled; unknown
//! request fields are ignored by deserialization.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

fn default_max_tokens() -> u32 {
    10_000
}

/// `POST /v1/chat/completions` request body
#[derive(Debug, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// Upper bound on generated tokens, forwarded to the launcher
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// One turn of conversation history.
///
/// `role` stays a free string: anything other than system/user/assistant is
/// silently dropped during prompt assembly rather than rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// Fixed-shape chat completion envelope
#[derive(Debug, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: u64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Usage,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ChatMessageResponse,
    pub finish_reason: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ChatMessageResponse {
    pub role: &'static str,
    pub content: String,
}

/// Token accounting.
///
/// Nothing in this pipeline counts tokens, so every field is a hard zero —
/// a documented limitation, never an estimate.
#[derive(Debug, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn zero() -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
        }
    }
}

impl ChatCompletionResponse {
    /// Wrap normalized generation output in the response envelope.
    pub fn completion(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: format!("chatcmpl-{}", uuid::Uuid::new_v4()),
            object: "chat.completion",
            created: timestamp_now(),
            model: model.into(),
            choices: vec![ChatCompletionChoice {
                index: 0,
                message: ChatMessageResponse {
                    role: "assistant",
                    content: content.into(),
                },
                finish_reason: "stop",
            }],
            usage: Usage::zero(),
        }
    }
}

/// Seconds since the Unix epoch
pub fn timestamp_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
