pub mod config;
pub mod directive;
pub mod error;
pub mod image;
pub mod models;
pub mod observability;
pub mod protocol;
pub mod stream;

mod util;

pub use directive::{
    apply_directive, extract_directive, extract_directive_from_conversation, Directive,
};
pub use error::{AdapterError, ErrorKind};
pub use protocol::canonical::{ChatProps, Chunk, FunctionCall, Message, Role, ToolCall};
pub use protocol::openai_chat::encoder::{
    build_chat_request, build_completion_request, MessageFormatter,
};
pub use protocol::openai_chat::stream::{process_line, LineParser, StreamEvent};
pub use protocol::robustness::robustness_content;
pub use stream::{AccumulatedResponse, ChunkAccumulator, StreamProcessor};
