use smallvec::SmallVec;

use crate::config::ImagesConfig;
use crate::directive::{apply_directive, extract_directive_from_conversation};
use crate::image::{extract_images, ImageBuffer, ImageResolver};
use crate::models::ModelCatalog;
use crate::protocol::canonical::{ChatProps, Message, Role};
use crate::util::excerpt;

use super::{
    CompletionRequest, ImageUrl, MessageContent, OpenAiChatRequest, OpenAiContent, OpenAiMessage,
};

const EXCERPT_ELLIPSIS: &str = "...";

/// Builds `OpenAI` wire messages from internal messages.
///
/// For vision models, user text is split into `image_url` segments followed by
/// a single trailing `text` segment. Images that fail to resolve are logged and
/// left out; formatting itself never fails.
pub struct MessageFormatter<'a> {
    catalog: &'a ModelCatalog,
    resolver: &'a dyn ImageResolver,
    include_base64: bool,
    excerpt_len: usize,
}

impl<'a> MessageFormatter<'a> {
    #[must_use]
    pub fn new(catalog: &'a ModelCatalog, resolver: &'a dyn ImageResolver) -> Self {
        let images = ImagesConfig::default();
        Self {
            catalog,
            resolver,
            include_base64: images.include_base64,
            excerpt_len: images.excerpt_len,
        }
    }

    #[must_use]
    pub fn with_images_config(mut self, images: &ImagesConfig) -> Self {
        self.include_base64 = images.include_base64;
        self.excerpt_len = images.excerpt_len;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        self.catalog
    }

    /// Format `messages` for `model`, registering every included image with `buffer`.
    pub fn format_messages(
        &self,
        messages: &[Message],
        model: &str,
        buffer: &mut dyn ImageBuffer,
    ) -> Vec<OpenAiMessage> {
        if !self.catalog.is_vision_model(model) {
            return messages.iter().map(encode_plain_message).collect();
        }

        let mut out = Vec::with_capacity(messages.len());
        for message in messages {
            let encoded = if message.role == Role::User {
                self.encode_vision_user_message(message, buffer)
            } else {
                encode_message_with(
                    message,
                    OpenAiContent::Parts(SmallVec::from_elem(
                        MessageContent::Text {
                            text: message.content.clone(),
                        },
                        1,
                    )),
                )
            };
            out.push(encoded);
        }
        out
    }

    fn encode_vision_user_message(
        &self,
        message: &Message,
        buffer: &mut dyn ImageBuffer,
    ) -> OpenAiMessage {
        let (text, urls) = extract_images(&message.content, self.include_base64);

        let mut parts: SmallVec<[MessageContent; 2]> = SmallVec::with_capacity(urls.len() + 1);
        for url in urls {
            match self.resolver.resolve(&url) {
                Ok(image) => {
                    buffer.register_image(image);
                    parts.push(MessageContent::ImageUrl {
                        image_url: ImageUrl { url },
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        "cannot process image: {err} (source: {})",
                        excerpt(&url, self.excerpt_len, EXCERPT_ELLIPSIS)
                    );
                }
            }
        }
        parts.push(MessageContent::Text { text });

        encode_message_with(message, OpenAiContent::Parts(parts))
    }
}

fn encode_plain_message(message: &Message) -> OpenAiMessage {
    encode_message_with(message, OpenAiContent::Text(message.content.clone()))
}

fn encode_message_with(message: &Message, content: OpenAiContent) -> OpenAiMessage {
    OpenAiMessage {
        role: message.role.as_str().to_string(),
        content,
        name: message.name.clone(),
        function_call: message.function_call.clone(),
        tool_calls: message.tool_calls.clone(),
        tool_call_id: message.tool_call_id.clone(),
    }
}

/// Build a chat completion request from `props`.
///
/// Directive tokens are stripped from every message and the surviving
/// directive is re-applied in canonical form before formatting.
pub fn build_chat_request(
    formatter: &MessageFormatter<'_>,
    props: &ChatProps,
    buffer: &mut dyn ImageBuffer,
) -> OpenAiChatRequest {
    let mut messages = props.messages.clone();
    let directive = extract_directive_from_conversation(&mut messages);
    apply_directive(&mut messages, directive);
    if let Some(directive) = directive {
        tracing::debug!(model = %props.model, ?directive, "applied reasoning directive");
    }

    OpenAiChatRequest {
        model: props.model.clone(),
        messages: formatter.format_messages(&messages, &props.model, buffer),
        max_tokens: props.max_tokens,
        temperature: props.temperature,
        top_p: props.top_p,
        presence_penalty: props.presence_penalty,
        frequency_penalty: props.frequency_penalty,
        tools: props.tools.clone(),
        tool_choice: props.tool_choice.clone(),
        stream: props.stream,
    }
}

/// Build a legacy completion request from `props`.
#[must_use]
pub fn build_completion_request(props: &ChatProps) -> CompletionRequest {
    CompletionRequest {
        model: props.model.clone(),
        prompt: completion_prompt(&props.messages),
        max_tokens: props.max_tokens,
        temperature: props.temperature,
        stream: props.stream,
    }
}

/// Flatten a conversation into a `role: content` prompt, one line per message.
#[must_use]
pub fn completion_prompt(messages: &[Message]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str(message.role.as_str());
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }
    prompt
}
