//! Prompt assembly
//!
//! Flattens an ordered chat history into the single linear transcript the
//! generation engine consumes. The formatting is a compatibility contract:
//! role labels are literal, unknown roles are dropped, and the result is
//! trimmed exactly once at the end.

use crate::api::types::ChatMessage;
use shardchat_common::{Result, ShardChatError};

/// Hard ceiling on assembled prompt size, in characters.
///
/// A prompt over this limit is a terminal input error, not a truncation.
pub const MAX_PROMPT_CHARS: usize = 600_000;

/// Assemble the ordered message history into one prompt string.
pub fn assemble(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();

    for msg in messages {
        match msg.role.as_str() {
            "system" => {
                prompt.push_str("System: ");
                prompt.push_str(&msg.content);
                prompt.push_str("\n\n");
            }
            "user" => {
                if !prompt.is_empty() && !prompt.ends_with("\n\n") {
                    prompt.push_str("\n\n");
                }
                prompt.push_str("User: ");
                prompt.push_str(&msg.content);
            }
            "assistant" => {
                prompt.push_str("\n\nAssistant: ");
                prompt.push_str(&msg.content);
            }
            // unknown roles are dropped, not an error
            _ => {}
        }
    }

    prompt.trim().to_string()
}

/// Reject prompts over [`MAX_PROMPT_CHARS`] before anything is spawned.
pub fn enforce_ceiling(prompt: &str) -> Result<()> {
    let len = prompt.chars().count();
    if len > MAX_PROMPT_CHARS {
        return Err(ShardChatError::PromptTooLarge {
            len,
            max: MAX_PROMPT_CHARS,
        });
    }
    Ok(())
}
