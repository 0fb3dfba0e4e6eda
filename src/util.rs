/// Strip SSE framing from a raw stream line.
///
/// Returns `None` for blank lines, `:` comments, `event:` lines and `[DONE]`.
/// `data:` is accepted with or without a following space; lines without the
/// prefix are passed through as bare JSON.
#[inline]
pub(crate) fn extract_sse_data_payload(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') || trimmed.starts_with("event:") {
        return None;
    }

    let payload = if let Some(rest) = trimmed.strip_prefix("data:") {
        rest.trim()
    } else {
        trimmed
    };

    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }
    Some(payload)
}

/// Shorten `value` to at most `max_chars` characters, appending `ellipsis` when cut.
#[must_use]
pub(crate) fn excerpt(value: &str, max_chars: usize, ellipsis: &str) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ellipsis.len());
            out.push_str(&value[..cut]);
            out.push_str(ellipsis);
            out
        }
        None => value.to_string(),
    }
}
