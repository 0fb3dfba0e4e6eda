//! Best-effort recovery of `"content":"..."` values from lines that did not
//! decode as JSON. Output is never authoritative.

use std::sync::LazyLock;

use memchr::memmem;
use regex_lite::Regex;

static CONTENT_KEY_FINDER: LazyLock<memmem::Finder<'static>> =
    LazyLock::new(|| memmem::Finder::new(br#""content""#));

// `None` when the pattern fails to compile; callers then treat every fragment as unrecoverable.
static CONTENT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#""content"\s*:\s*"((?:[^"\\]|\\.)*)""#).ok());

/// Recover the first `"content":"..."` value in `fragment`, unescaped.
///
/// Returns an empty string when nothing is recoverable.
#[must_use]
pub fn robustness_content(fragment: &str) -> String {
    if CONTENT_KEY_FINDER.find(fragment.as_bytes()).is_none() {
        return String::new();
    }
    let Some(pattern) = CONTENT_PATTERN.as_ref() else {
        return String::new();
    };

    pattern
        .captures(fragment)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape_content(m.as_str()))
        .unwrap_or_default()
}

/// Undo JSON string escaping on a raw captured value.
///
/// Uses `serde_json` when the capture is a valid JSON string body and falls back
/// to replacing the common escapes one by one when it is not (e.g. a `\u` escape
/// cut in half).
#[must_use]
pub fn unescape_content(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    quoted.push_str(raw);
    quoted.push('"');
    if let Ok(value) = serde_json::from_str::<String>(&quoted) {
        return value;
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
