pub mod content;
pub mod images;
pub mod links;
pub mod videos;

#[cfg(test)]
mod tests;

pub use content::extract_content;
pub use images::extract_images;
pub use links::extract_links;
pub use videos::extract_videos;

use crate::document::Page;
use crate::error::{ExtractionCause, ExtractionError, Pass};
use scraper::{ElementRef, Selector};
use url::Url;

/// Compiles a CSS selector, attributing a failure to `pass`
pub(crate) fn selector(pass: Pass, page: &Page, css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| {
        ExtractionError::new(
            pass,
            page.url(),
            ExtractionCause::Selector {
                selector: css.to_string(),
                reason: e.to_string(),
            },
        )
    })
}

/// Concatenated text of an element and its descendants, trimmed
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collapses every whitespace run into a single space
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for inline `data:` payloads and `javascript:` pseudo-links
pub(crate) fn is_inline_or_script(reference: &str) -> bool {
    let reference = reference.trim_start();
    ["data:", "javascript:"].iter().any(|scheme| {
        reference
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Resolved URLs are only kept when they carry both a scheme and a host.
///
/// The scheme is checked again after parsing: the URL parser drops tabs,
/// newlines and leading control characters, so `java\nscript:` only shows
/// its real scheme once resolved.
pub(crate) fn is_remote_url(url: &Url) -> bool {
    !matches!(url.scheme(), "" | "data" | "javascript")
        && url.host_str().is_some_and(|host| !host.is_empty())
}

/// Last path segment of `url`, or `fallback` when it has no extension
pub(crate) fn filename_from_url(url: &Url, fallback: &str) -> String {
    match url.path().rsplit('/').next() {
        Some(name) if name.contains('.') => name.to_string(),
        _ => fallback.to_string(),
    }
}
