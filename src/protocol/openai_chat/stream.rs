use crate::config::StreamConfig;
use crate::error::AdapterError;
use crate::protocol::canonical::Chunk;
use crate::protocol::robustness::robustness_content;

use super::{ChatStreamChoice, ChatStreamErrorResponse, ChatStreamResponse, CompletionResponse};

const FINISH_REASON_LENGTH: &str = "length";
const CANNOT_PARSE_COMPLETION: &str = "cannot parse completion response";
const CANNOT_PARSE_CHAT: &str = "cannot parse chat completion response";

/// One decoded stream line. Never outlives the processing of that line.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    ChatDelta(ChatStreamResponse),
    Completion(CompletionResponse),
    ProviderError(ChatStreamErrorResponse),
    Undecodable,
}

impl StreamEvent {
    /// Decode `data` into the first shape that fits.
    ///
    /// Only JSON objects decode. Completion mode tries only the legacy
    /// completion shape. Chat mode tries the chat delta shape, then the
    /// provider error envelope.
    #[must_use]
    pub fn decode(data: &str, is_completion: bool) -> Self {
        // serde also fills structs from JSON arrays; reject those up front.
        if !data.trim_start().starts_with('{') {
            return StreamEvent::Undecodable;
        }

        if is_completion {
            return match serde_json::from_str::<CompletionResponse>(data) {
                Ok(form) => StreamEvent::Completion(form),
                Err(_) => StreamEvent::Undecodable,
            };
        }

        if let Ok(form) = serde_json::from_str::<ChatStreamResponse>(data) {
            return StreamEvent::ChatDelta(form);
        }
        if let Ok(form) = serde_json::from_str::<ChatStreamErrorResponse>(data) {
            return StreamEvent::ProviderError(form);
        }
        StreamEvent::Undecodable
    }
}

/// Normalizes provider stream lines into [`Chunk`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineParser {
    robustness_fallback: bool,
}

impl LineParser {
    #[must_use]
    pub fn new(config: &StreamConfig) -> Self {
        Self {
            robustness_fallback: config.robustness_fallback,
        }
    }

    #[must_use]
    pub fn with_robustness_fallback(mut self, enabled: bool) -> Self {
        self.robustness_fallback = enabled;
        self
    }

    /// Parse one line payload (SSE framing already removed).
    ///
    /// # Errors
    ///
    /// - [`AdapterError::Parse`] when the line matches no known shape.
    /// - [`AdapterError::Provider`] when the line is a provider error envelope.
    /// - [`AdapterError::ReasoningExhausted`] when the model ran out of tokens
    ///   before producing any visible output.
    pub fn process_line(&self, data: &str, is_completion: bool) -> Result<Chunk, AdapterError> {
        match StreamEvent::decode(data, is_completion) {
            StreamEvent::Completion(form) => Ok(Chunk::text(completion_text(form))),
            StreamEvent::ChatDelta(form) => chunk_from_choices(form.choices),
            StreamEvent::ProviderError(form) => Err(AdapterError::Provider {
                message: form.error.message.unwrap_or_default(),
                error_type: form.error.type_.unwrap_or_default(),
            }),
            StreamEvent::Undecodable if is_completion => {
                tracing::warn!("openai error: {CANNOT_PARSE_COMPLETION}: {data}");
                Err(AdapterError::Parse(CANNOT_PARSE_COMPLETION.to_string()))
            }
            StreamEvent::Undecodable => {
                if self.robustness_fallback {
                    let recovered = robustness_content(data);
                    if !recovered.is_empty() {
                        tracing::warn!("openai warning: recovered content from malformed line: {data}");
                        return Ok(Chunk::text(recovered));
                    }
                }
                tracing::warn!("openai error: {CANNOT_PARSE_CHAT}: {data}");
                Err(AdapterError::Parse(CANNOT_PARSE_CHAT.to_string()))
            }
        }
    }
}

/// Parse one line with the default parser (no robustness fallback).
///
/// # Errors
///
/// See [`LineParser::process_line`].
pub fn process_line(data: &str, is_completion: bool) -> Result<Chunk, AdapterError> {
    LineParser::default().process_line(data, is_completion)
}

fn completion_text(form: CompletionResponse) -> String {
    form.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.text)
        .unwrap_or_default()
}

fn chunk_from_choices(choices: Vec<ChatStreamChoice>) -> Result<Chunk, AdapterError> {
    // Only the first choice is surfaced.
    let Some(choice) = choices.into_iter().next() else {
        return Ok(Chunk::empty());
    };

    let delta = choice.delta;
    let content = delta.content.unwrap_or_default();
    if choice.finish_reason.as_deref() == Some(FINISH_REASON_LENGTH)
        && content.is_empty()
        && delta.tool_calls.is_none()
        && delta.function_call.is_none()
    {
        return Err(AdapterError::ReasoningExhausted);
    }

    Ok(Chunk {
        content,
        tool_call: delta.tool_calls,
        function_call: delta.function_call,
    })
}
