//! Image collaborators used by the vision formatter: URL extraction from text,
//! resolution of a URL into an [`ImageObject`], and the caller-owned buffer that
//! collects resolved images.

use std::sync::{Arc, LazyLock};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use parking_lot::Mutex;
use regex_lite::Regex;

use crate::error::AdapterError;

static IMAGE_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)https?://[^\s()<>\[\]"']+\.(?:png|jpe?g|gif|webp|heic|heif)\b(?:\?[^\s()<>\[\]"']*)?"#,
    )
    .expect("image url pattern compiles")
});

static BASE64_IMAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"data:image/[A-Za-z0-9.+-]+;base64,[A-Za-z0-9+/=]+")
        .expect("base64 image pattern compiles")
});

/// Split `content` into residual text and the image URLs it references.
///
/// Recognizes http(s) URLs ending in a common image extension and, when
/// `include_base64` is set, inline `data:image/...;base64,` URLs. URLs are
/// returned in reading order. The matched spans are cut from the text and the
/// remainder is trimmed.
#[must_use]
pub fn extract_images(content: &str, include_base64: bool) -> (String, Vec<String>) {
    let mut spans: Vec<(usize, usize)> = IMAGE_URL_PATTERN
        .find_iter(content)
        .map(|m| (m.start(), m.end()))
        .collect();
    if include_base64 {
        spans.extend(
            BASE64_IMAGE_PATTERN
                .find_iter(content)
                .map(|m| (m.start(), m.end())),
        );
        spans.sort_unstable();
    }

    let mut urls = Vec::with_capacity(spans.len());
    let mut text = String::with_capacity(content.len());
    let mut last_end = 0;
    for (start, end) in spans {
        // Overlapping matches keep the earlier one.
        if start < last_end {
            continue;
        }
        text.push_str(&content[last_end..start]);
        urls.push(content[start..end].to_string());
        last_end = end;
    }
    text.push_str(&content[last_end..]);

    (text.trim().to_string(), urls)
}

/// A resolved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageObject {
    pub url: String,
    pub mime_type: Option<String>,
    /// Decoded bytes when the image was available locally.
    pub data: Option<Bytes>,
}

impl ImageObject {
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.data.is_some()
    }
}

/// Resolves an image URL into an [`ImageObject`].
pub trait ImageResolver {
    /// # Errors
    ///
    /// Returns [`AdapterError::Image`] when the URL cannot be resolved.
    fn resolve(&self, url: &str) -> Result<ImageObject, AdapterError>;
}

impl<F> ImageResolver for F
where
    F: Fn(&str) -> Result<ImageObject, AdapterError>,
{
    fn resolve(&self, url: &str) -> Result<ImageObject, AdapterError> {
        self(url)
    }
}

/// Network-free resolver: decodes `data:` URLs and accepts http(s) URLs as
/// remote references.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlResolver;

impl ImageResolver for DataUrlResolver {
    fn resolve(&self, url: &str) -> Result<ImageObject, AdapterError> {
        if let Some(rest) = url.strip_prefix("data:") {
            return decode_data_url(url, rest);
        }

        let parsed = url::Url::parse(url)
            .map_err(|e| AdapterError::Image(format!("invalid image url: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(ImageObject {
                url: url.to_string(),
                mime_type: mime_from_path(parsed.path()).map(str::to_string),
                data: None,
            }),
            other => Err(AdapterError::Image(format!(
                "unsupported image url scheme: {other}"
            ))),
        }
    }
}

fn decode_data_url(url: &str, rest: &str) -> Result<ImageObject, AdapterError> {
    let Some((meta, payload)) = rest.split_once(',') else {
        return Err(AdapterError::Image("malformed data url".to_string()));
    };
    let Some(mime) = meta.strip_suffix(";base64") else {
        return Err(AdapterError::Image(
            "data url is not base64 encoded".to_string(),
        ));
    };
    if !mime.starts_with("image/") {
        return Err(AdapterError::Image(format!(
            "data url is not an image: {mime}"
        )));
    }
    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| AdapterError::Image(format!("invalid base64 image data: {e}")))?;

    Ok(ImageObject {
        url: url.to_string(),
        mime_type: Some(mime.to_string()),
        data: Some(Bytes::from(decoded)),
    })
}

fn mime_from_path(path: &str) -> Option<&'static str> {
    let ext = path.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Caller-owned collector for resolved images. The formatter only appends.
pub trait ImageBuffer {
    fn register_image(&mut self, image: ImageObject);
}

impl ImageBuffer for Vec<ImageObject> {
    fn register_image(&mut self, image: ImageObject) {
        self.push(image);
    }
}

/// Image buffer that can be cloned and shared across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedImageBuffer {
    inner: Arc<Mutex<Vec<ImageObject>>>,
}

impl SharedImageBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Take every registered image, leaving the buffer empty.
    #[must_use]
    pub fn drain(&self) -> Vec<ImageObject> {
        std::mem::take(&mut *self.inner.lock())
    }
}

impl ImageBuffer for SharedImageBuffer {
    fn register_image(&mut self, image: ImageObject) {
        self.inner.lock().push(image);
    }
}
