//! Chat-completion handler
//!
//! One request becomes exactly one distributed run: assemble the prompt,
//! gate on the size ceiling, plan and execute the launch, normalize rank-0
//! stdout, wrap it in the response envelope.

use axum::extract::State;
use axum::Json;
use shardchat_common::{Result, ShardChatError, METRICS};
use tracing::{debug, error};

use super::error::ApiError;
use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use super::AppState;
use crate::{executor, output, prompt};

pub async fn create_chat_completion(
    State(state): State<AppState>,
    Json(req): Json<ChatCompletionRequest>,
) -> std::result::Result<Json<ChatCompletionResponse>, ApiError> {
    METRICS.requests.requests_total.inc();
    METRICS.requests.active_requests.inc();
    let timer = METRICS.requests.request_duration.start_timer();

    let result = handle(&state, req).await;

    timer.observe_duration();
    METRICS.requests.active_requests.dec();
    match &result {
        Ok(_) => METRICS.requests.requests_success.inc(),
        Err(_) => METRICS.requests.requests_failed.inc(),
    }

    result.map(Json).map_err(ApiError::from)
}

async fn handle(state: &AppState, req: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
    let prompt = prompt::assemble(&req.messages);
    let prompt_len = prompt.chars().count();
    METRICS.requests.prompt_chars.observe(prompt_len as f64);

    if prompt_len < 200 {
        debug!(chars = prompt_len, max_tokens = req.max_tokens, prompt = %prompt, "processing prompt");
    } else if prompt_len < 10_000 {
        let preview: String = prompt.chars().take(200).collect();
        debug!(chars = prompt_len, max_tokens = req.max_tokens, preview = %preview, "processing prompt");
    } else {
        debug!(
            chars = prompt_len,
            max_tokens = req.max_tokens,
            "processing large prompt (preview disabled)"
        );
    }

    // rejected before anything is spawned
    prompt::enforce_ceiling(&prompt)?;

    let spec = state.planner.plan(&prompt, req.max_tokens);
    let run = executor::run(&spec).await?;

    if !run.success() {
        error!(exit_code = run.exit_code, stderr = %run.stderr, "generation run failed");
        return Err(ShardChatError::generation(run.stderr));
    }

    let content = output::normalize(&run.stdout);
    debug!(content_chars = content.chars().count(), "returning completion");

    Ok(ChatCompletionResponse::completion(
        state.model_id.clone(),
        content,
    ))
}
