use crate::document::Page;
use crate::error::{ExtractionError, Pass};
use crate::extractors::{filename_from_url, is_inline_or_script, is_remote_url, selector};
use crate::results::{ImageOrigin, ImageRef};
use crate::taxonomy;
use regex::Regex;
use url::Url;

/// `background-image: url(...)` with optional single or double quotes
const BACKGROUND_IMAGE_PATTERN: &str = r#"background-image:\s*url\(["']?([^"')\s]+)["']?\)"#;

const DEFAULT_DIMENSION: &str = "auto";
const DEFAULT_FILENAME: &str = "image.jpg";

/// Collects `<img>` sources followed by CSS background images.
///
/// Foreground entries are indexed by their position among all `<img>`
/// elements; background entries continue after the last `<img>` position.
pub fn extract_images(page: &Page) -> Result<Vec<ImageRef>, ExtractionError> {
    ::log::debug!("Extracting images from {}", page.url());

    let img = selector(Pass::Images, page, "img")?;
    let styled = selector(Pass::Images, page, "[style]")?;
    let background = Regex::new(BACKGROUND_IMAGE_PATTERN)
        .map_err(|e| ExtractionError::new(Pass::Images, page.url(), e))?;

    let mut images = Vec::new();
    let mut img_count = 0;

    for (position, element) in page.html().select(&img).enumerate() {
        img_count = position + 1;

        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let Some(url) = resolve_image(page, src) else {
            ::log::trace!("Skipping image source {:?}", src);
            continue;
        };

        let attr_or = |name: &str, default: String| {
            element
                .value()
                .attr(name)
                .map(str::to_string)
                .unwrap_or(default)
        };

        images.push(ImageRef {
            index: position,
            filename: filename_from_url(&url, DEFAULT_FILENAME),
            url: url.to_string(),
            alt: attr_or("alt", format!("Image {}", position + 1)),
            width: attr_or("width", DEFAULT_DIMENSION.to_string()),
            height: attr_or("height", DEFAULT_DIMENSION.to_string()),
            origin: ImageOrigin::Foreground,
        });
    }

    let mut next_index = img_count;
    for (position, element) in page.html().select(&styled).enumerate() {
        let style = element.value().attr("style").unwrap_or_default();

        for capture in background.captures_iter(style) {
            let Some(url) = capture.get(1).and_then(|m| resolve_image(page, m.as_str())) else {
                continue;
            };

            images.push(ImageRef {
                index: next_index,
                filename: filename_from_url(&url, DEFAULT_FILENAME),
                url: url.to_string(),
                alt: format!("Background Image {}", position + 1),
                width: DEFAULT_DIMENSION.to_string(),
                height: DEFAULT_DIMENSION.to_string(),
                origin: ImageOrigin::Background,
            });
            next_index += 1;
        }
    }

    ::log::debug!("Found {} images on {}", images.len(), page.url());
    Ok(images)
}

/// Resolves an image reference, rejecting blanks, inline data and scripts,
/// and anything that does not end up with a scheme and host.
fn resolve_image(page: &Page, src: &str) -> Option<Url> {
    if src.trim().is_empty() || is_inline_or_script(src) {
        return None;
    }

    let url = page.resolve(src)?;
    if !is_remote_url(&url) {
        return None;
    }
    if !taxonomy::has_image_extension(&url) {
        ::log::trace!("Accepting extensionless image URL {}", url);
    }
    Some(url)
}
