use serde::Serialize;

use crate::protocol::canonical::{Chunk, FunctionCall, ToolCall};

/// The complete response assembled from a stream of chunks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccumulatedResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    pub chunks: usize,
    pub skipped_lines: usize,
}

/// Folds chunks into an [`AccumulatedResponse`].
///
/// Tool-call deltas are merged by `index`: id, type and name are taken from the
/// first delta that carries them, arguments are appended.
#[derive(Debug, Clone, Default)]
pub struct ChunkAccumulator {
    response: AccumulatedResponse,
}

impl ChunkAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &Chunk) {
        self.response.chunks += 1;
        self.response.content.push_str(&chunk.content);

        if let Some(calls) = &chunk.tool_call {
            for call in calls {
                self.merge_tool_call(call);
            }
        }
        if let Some(delta) = &chunk.function_call {
            let merged = self
                .response
                .function_call
                .get_or_insert_with(FunctionCall::default);
            merge_function(merged, delta);
        }
    }

    pub fn record_skipped(&mut self) {
        self.response.skipped_lines += 1;
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.response.content
    }

    #[must_use]
    pub fn finish(self) -> AccumulatedResponse {
        self.response
    }

    fn merge_tool_call(&mut self, delta: &ToolCall) {
        let index = delta
            .index
            .unwrap_or_else(|| u32::try_from(self.response.tool_calls.len()).unwrap_or(u32::MAX));
        let existing = self
            .response
            .tool_calls
            .iter_mut()
            .find(|call| call.index == Some(index));

        let Some(existing) = existing else {
            let mut call = delta.clone();
            call.index = Some(index);
            self.response.tool_calls.push(call);
            return;
        };

        if existing.id.is_none() {
            existing.id.clone_from(&delta.id);
        }
        if existing.type_.is_none() {
            existing.type_.clone_from(&delta.type_);
        }
        if let Some(function) = &delta.function {
            let merged = existing.function.get_or_insert_with(FunctionCall::default);
            merge_function(merged, function);
        }
    }
}

fn merge_function(merged: &mut FunctionCall, delta: &FunctionCall) {
    if merged.name.is_none() {
        merged.name.clone_from(&delta.name);
    }
    if let Some(args) = &delta.arguments {
        merged.arguments.get_or_insert_with(String::new).push_str(args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_delta(index: u32, id: Option<&str>, name: Option<&str>, args: &str) -> Chunk {
        Chunk {
            content: String::new(),
            tool_call: Some(vec![ToolCall {
                index: Some(index),
                id: id.map(str::to_string),
                type_: id.map(|_| "function".to_string()),
                function: Some(FunctionCall {
                    name: name.map(str::to_string),
                    arguments: Some(args.to_string()),
                }),
            }]),
            function_call: None,
        }
    }

    #[test]
    fn test_content_concatenates() {
        let mut acc = ChunkAccumulator::new();
        acc.push(&Chunk::text("Hel"));
        acc.push(&Chunk::text("lo"));
        acc.push(&Chunk::empty());
        let response = acc.finish();
        assert_eq!(response.content, "Hello");
        assert_eq!(response.chunks, 3);
    }

    #[test]
    fn test_tool_calls_merge_by_index() {
        let mut acc = ChunkAccumulator::new();
        acc.push(&tool_delta(0, Some("call_a"), Some("weather"), ""));
        acc.push(&tool_delta(1, Some("call_b"), Some("time"), "{}"));
        acc.push(&tool_delta(0, None, None, "{\"city\":"));
        acc.push(&tool_delta(0, None, None, "\"SF\"}"));
        let response = acc.finish();

        assert_eq!(response.tool_calls.len(), 2);
        let first = &response.tool_calls[0];
        assert_eq!(first.id.as_deref(), Some("call_a"));
        let function = first.function.as_ref().unwrap();
        assert_eq!(function.name.as_deref(), Some("weather"));
        assert_eq!(function.arguments.as_deref(), Some("{\"city\":\"SF\"}"));
        assert_eq!(
            response.tool_calls[1]
                .function
                .as_ref()
                .and_then(|f| f.arguments.as_deref()),
            Some("{}")
        );
    }

    #[test]
    fn test_function_call_merges() {
        let mut acc = ChunkAccumulator::new();
        for (name, args) in [(Some("lookup"), "{\"q\""), (None, ":1}")] {
            acc.push(&Chunk {
                content: String::new(),
                tool_call: None,
                function_call: Some(FunctionCall {
                    name: name.map(str::to_string),
                    arguments: Some(args.to_string()),
                }),
            });
        }
        let function = acc.finish().function_call.unwrap();
        assert_eq!(function.name.as_deref(), Some("lookup"));
        assert_eq!(function.arguments.as_deref(), Some("{\"q\":1}"));
    }
}
