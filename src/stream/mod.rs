mod accumulator;

pub use accumulator::{AccumulatedResponse, ChunkAccumulator};

use crate::error::AdapterError;
use crate::protocol::canonical::Chunk;
use crate::protocol::openai_chat::stream::LineParser;
use crate::util::extract_sse_data_payload;

/// Drives one provider stream through the line parser.
///
/// Lines are processed strictly in order. Parse failures lose only their own
/// line; provider errors and reasoning exhaustion end the stream.
#[derive(Debug, Clone)]
pub struct StreamProcessor {
    parser: LineParser,
    is_completion: bool,
    accumulator: ChunkAccumulator,
}

impl StreamProcessor {
    #[must_use]
    pub fn new(parser: LineParser, is_completion: bool) -> Self {
        Self {
            parser,
            is_completion,
            accumulator: ChunkAccumulator::new(),
        }
    }

    /// Feed one raw transport line.
    ///
    /// Returns `Ok(None)` for SSE framing that carries no payload.
    ///
    /// # Errors
    ///
    /// Returns the parser error for this line. Non-terminal errors are also
    /// counted as skipped lines.
    pub fn feed_line(&mut self, raw: &str) -> Result<Option<Chunk>, AdapterError> {
        let Some(data) = extract_sse_data_payload(raw) else {
            return Ok(None);
        };

        match self.parser.process_line(data, self.is_completion) {
            Ok(chunk) => {
                self.accumulator.push(&chunk);
                Ok(Some(chunk))
            }
            Err(err) => {
                if !err.is_terminal() {
                    self.accumulator.record_skipped();
                }
                Err(err)
            }
        }
    }

    /// Content accumulated so far.
    #[must_use]
    pub fn content(&self) -> &str {
        self.accumulator.content()
    }

    #[must_use]
    pub fn finish(self) -> AccumulatedResponse {
        self.accumulator.finish()
    }

    /// Process every line, stopping at the first terminal error.
    ///
    /// # Errors
    ///
    /// Returns the first [`AdapterError`] for which
    /// [`AdapterError::is_terminal`] holds.
    pub fn process_lines<I, S>(mut self, lines: I) -> Result<AccumulatedResponse, AdapterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            match self.feed_line(line.as_ref()) {
                Ok(_) => {}
                Err(err) if err.is_terminal() => return Err(err),
                Err(err) => tracing::debug!(error = %err, "skipping undecodable stream line"),
            }
        }
        Ok(self.finish())
    }
}
