use crate::document::Page;
use crate::error::{ExtractionError, Pass};
use crate::extractors::{filename_from_url, is_remote_url, selector};
use crate::results::{VideoKind, VideoRef, VideoSource};
use crate::taxonomy;
use scraper::ElementRef;

const DEFAULT_MIME_TYPE: &str = "video/mp4";
const DEFAULT_FILENAME: &str = "video.mp4";
const EMBED_MIME_TYPE: &str = "iframe";
const EMBED_WIDTH: &str = "560";
const EMBED_HEIGHT: &str = "315";

/// Collects native `<video>` elements followed by recognized player iframes.
///
/// Native entries are indexed by their `<video>` position; embeds continue
/// after the last `<video>` position.
pub fn extract_videos(page: &Page) -> Result<Vec<VideoRef>, ExtractionError> {
    ::log::debug!("Extracting videos from {}", page.url());

    let video = selector(Pass::Videos, page, "video")?;
    let source = selector(Pass::Videos, page, "source")?;
    let iframe = selector(Pass::Videos, page, "iframe")?;

    let mut videos = Vec::new();
    let mut video_count = 0;

    for (position, element) in page.html().select(&video).enumerate() {
        video_count = position + 1;

        let own = element
            .value()
            .attr("src")
            .map(|src| (src, element.value().attr("type")));
        let nested = element
            .select(&source)
            .filter_map(|s| s.value().attr("src").map(|src| (src, s.value().attr("type"))));

        let resolved = own
            .into_iter()
            .chain(nested)
            .filter(|(src, _)| !src.trim().is_empty())
            .filter_map(|(src, mime_type)| {
                let mime_type = mime_type.unwrap_or(DEFAULT_MIME_TYPE).to_string();
                page.resolve(src).map(|url| (url, mime_type))
            })
            .collect::<Vec<_>>();

        let Some((primary, _)) = resolved.first() else {
            ::log::trace!("Dropping <video> {} without sources", position);
            continue;
        };
        let url = primary.to_string();
        let filename = filename_from_url(primary, DEFAULT_FILENAME);

        let sources = resolved
            .into_iter()
            .map(|(url, mime_type)| VideoSource {
                url: url.to_string(),
                mime_type,
            })
            .collect();

        videos.push(VideoRef {
            index: position,
            url,
            poster: element
                .value()
                .attr("poster")
                .filter(|poster| !poster.trim().is_empty())
                .and_then(|poster| page.resolve(poster))
                .map(|url| url.to_string()),
            controls: element.value().attr("controls").is_some(),
            autoplay: element.value().attr("autoplay").is_some(),
            width: dimension(&element, "width", "auto"),
            height: dimension(&element, "height", "auto"),
            kind: VideoKind::Native,
            platform: None,
            filename,
            sources,
        });
    }

    let mut next_index = video_count;
    for (position, element) in page.html().select(&iframe).enumerate() {
        let Some(url) = element
            .value()
            .attr("src")
            .filter(|src| !src.trim().is_empty())
            .and_then(|src| page.resolve(src))
        else {
            continue;
        };
        if !is_remote_url(&url) {
            continue;
        }
        let Some(platform) = taxonomy::video_platform(&url) else {
            ::log::trace!("Ignoring non-video iframe {}", url);
            continue;
        };

        videos.push(VideoRef {
            index: next_index,
            url: url.to_string(),
            sources: vec![VideoSource {
                url: url.to_string(),
                mime_type: EMBED_MIME_TYPE.to_string(),
            }],
            poster: None,
            controls: true,
            autoplay: false,
            width: dimension(&element, "width", EMBED_WIDTH),
            height: dimension(&element, "height", EMBED_HEIGHT),
            kind: VideoKind::Embedded,
            platform: Some(platform),
            filename: format!("video_iframe_{position}.html"),
        });
        next_index += 1;
    }

    ::log::debug!("Found {} videos on {}", videos.len(), page.url());
    Ok(videos)
}

fn dimension(element: &ElementRef<'_>, name: &str, default: &str) -> String {
    element.value().attr(name).unwrap_or(default).to_string()
}
