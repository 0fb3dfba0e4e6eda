//! Inline reasoning-mode directives (`/think`, `/no_think`) carried in message text.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::protocol::canonical::{Message, Role};

pub const THINK_TOKEN: &str = "/think";
pub const NO_THINK_TOKEN: &str = "/no_think";

static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(?:no[_-]?think|think)\b").expect("directive pattern compiles")
});

/// Reasoning-mode instruction. Absence is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Enabled,
    Disabled,
}

impl Directive {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        matches!(self, Directive::Enabled)
    }

    /// Canonical token emitted into message text.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Directive::Enabled => THINK_TOKEN,
            Directive::Disabled => NO_THINK_TOKEN,
        }
    }
}

impl From<bool> for Directive {
    fn from(enabled: bool) -> Self {
        if enabled {
            Directive::Enabled
        } else {
            Directive::Disabled
        }
    }
}

/// Strip every directive token from `content`.
///
/// Returns the trimmed remainder and the directive of the last token found,
/// or `None` when the text carries no token.
#[must_use]
pub fn extract_directive(content: &str) -> (String, Option<Directive>) {
    if content.is_empty() {
        return (String::new(), None);
    }

    let mut directive = None;
    let mut sanitized = String::with_capacity(content.len());
    let mut last_end = 0;
    for m in DIRECTIVE_PATTERN.find_iter(content) {
        sanitized.push_str(&content[last_end..m.start()]);
        last_end = m.end();
        let disabled = m.as_str().to_ascii_lowercase().contains("no");
        directive = Some(Directive::from(!disabled));
    }

    if directive.is_none() {
        return (content.trim().to_string(), None);
    }
    sanitized.push_str(&content[last_end..]);
    (sanitized.trim().to_string(), directive)
}

/// Strip directives from every message, in order.
///
/// Later messages override earlier ones; the result is the last directive seen.
pub fn extract_directive_from_conversation(messages: &mut [Message]) -> Option<Directive> {
    let mut directive = None;
    for message in messages.iter_mut() {
        let (content, found) = extract_directive(&message.content);
        if found.is_some() {
            directive = found;
        }
        message.content = content;
    }
    directive
}

/// Re-inject `directive` as a canonical token on the last user or system message.
///
/// No-op when there is no directive, no messages, or no user/system message.
pub fn apply_directive(messages: &mut [Message], directive: Option<Directive>) {
    let Some(directive) = directive else {
        return;
    };
    let Some(target) = messages
        .iter_mut()
        .rev()
        .find(|m| matches!(m.role, Role::User | Role::System))
    else {
        return;
    };

    let token = directive.token();
    let content = target.content.trim();
    target.content = if content.is_empty() {
        token.to_string()
    } else {
        format!("{content}\n{token}")
    };
}
