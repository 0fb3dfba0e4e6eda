/// Error type shared by the formatter, the line parser and the image collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    #[error("parser error: {0}")]
    Parse(String),
    #[error("openai error: {message} (type: {error_type})")]
    Provider { message: String, error_type: String },
    #[error(
        "reasoning model exhausted token limit during thinking phase, please increase max_tokens setting"
    )]
    ReasoningExhausted,
    #[error("image error: {0}")]
    Image(String),
}

/// Broad error kind used by stream consumers to pick a propagation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    StructuredDecodeFailure,
    ProviderReported,
    ReasoningExhaustion,
    ImageResolution,
}

impl AdapterError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdapterError::Parse(_) => ErrorKind::StructuredDecodeFailure,
            AdapterError::Provider { .. } => ErrorKind::ProviderReported,
            AdapterError::ReasoningExhausted => ErrorKind::ReasoningExhaustion,
            AdapterError::Image(_) => ErrorKind::ImageResolution,
        }
    }

    /// Whether the stream this error came from should stop.
    ///
    /// Provider-reported errors and reasoning exhaustion end the response;
    /// an undecodable line only loses that line.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::ProviderReported | ErrorKind::ReasoningExhaustion
        )
    }
}
