//! Lookup tables used to classify links and embeds.
//!
//! Each table is ordered: the first matching entry wins unless a function
//! documents otherwise.

use crate::results::VideoPlatform;
use url::Url;

/// Extensions that make a link a downloadable file
pub const FILE_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", //
    // archives
    "zip", "rar", "tar", "gz", "7z", //
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", //
    // video
    "mp4", "avi", "mov", "wmv", "flv", "webm", //
    // audio
    "mp3", "wav", "ogg", "m4a", //
    // text and data
    "txt", "csv", "json", "xml",
];

/// Extensions that mark a URL as an image. Advisory only.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico"];

/// Social platform domains and their display names
pub const SOCIAL_PLATFORMS: &[(&str, &str)] = &[
    ("facebook.com", "Facebook"),
    ("twitter.com", "Twitter"),
    ("instagram.com", "Instagram"),
    ("linkedin.com", "LinkedIn"),
    ("youtube.com", "YouTube"),
    ("tiktok.com", "TikTok"),
    ("snapchat.com", "Snapchat"),
    ("pinterest.com", "Pinterest"),
    ("reddit.com", "Reddit"),
    ("tumblr.com", "Tumblr"),
    ("discord.com", "Discord"),
    ("telegram.org", "Telegram"),
    ("whatsapp.com", "WhatsApp"),
    ("github.com", "GitHub"),
    ("gitlab.com", "GitLab"),
];

/// A video host, optionally restricted to player paths
pub struct VideoHost {
    pub domain: &'static str,
    /// Empty means any path on the domain
    pub path_prefixes: &'static [&'static str],
    pub platform: VideoPlatform,
}

pub const VIDEO_HOSTS: &[VideoHost] = &[
    VideoHost {
        domain: "youtube.com",
        path_prefixes: &[],
        platform: VideoPlatform::YouTube,
    },
    VideoHost {
        domain: "youtube-nocookie.com",
        path_prefixes: &[],
        platform: VideoPlatform::YouTube,
    },
    VideoHost {
        domain: "youtu.be",
        path_prefixes: &[],
        platform: VideoPlatform::YouTube,
    },
    VideoHost {
        domain: "vimeo.com",
        path_prefixes: &[],
        platform: VideoPlatform::Vimeo,
    },
    VideoHost {
        domain: "dailymotion.com",
        path_prefixes: &[],
        platform: VideoPlatform::Dailymotion,
    },
    VideoHost {
        domain: "dai.ly",
        path_prefixes: &[],
        platform: VideoPlatform::Dailymotion,
    },
    VideoHost {
        domain: "twitch.tv",
        path_prefixes: &[],
        platform: VideoPlatform::Twitch,
    },
    VideoHost {
        domain: "facebook.com",
        path_prefixes: &["/video", "/plugins/video", "/watch"],
        platform: VideoPlatform::Facebook,
    },
    VideoHost {
        domain: "instagram.com",
        path_prefixes: &[],
        platform: VideoPlatform::Instagram,
    },
];

/// True when `host` is `domain` or one of its subdomains
pub fn host_matches(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    let Some(dot) = host.len().checked_sub(domain.len() + 1) else {
        return false;
    };
    host.get(dot..dot + 1) == Some(".")
        && host
            .get(dot + 1..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(domain))
}

/// Lower-cased extension of `path` when it is one of [`FILE_EXTENSIONS`]
pub fn file_extension(path: &str) -> Option<String> {
    let extension = path_extension(path)?;
    FILE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// True when the URL path ends with a known image extension
pub fn has_image_extension(url: &Url) -> bool {
    path_extension(url.path())
        .is_some_and(|extension| IMAGE_EXTENSIONS.contains(&extension.as_str()))
}

fn path_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next()?;
    let (_, extension) = last_segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Display name of the first social platform whose domain matches `host`
pub fn social_platform(host: &str) -> Option<&'static str> {
    SOCIAL_PLATFORMS
        .iter()
        .find(|(domain, _)| host_matches(host, domain))
        .map(|(_, name)| *name)
}

/// Platform of an embed URL. When several hosts match, the longest domain wins.
pub fn video_platform(url: &Url) -> Option<VideoPlatform> {
    let host = url.host_str()?;
    let path = url.path();

    VIDEO_HOSTS
        .iter()
        .filter(|entry| host_matches(host, entry.domain))
        .filter(|entry| {
            entry.path_prefixes.is_empty()
                || entry
                    .path_prefixes
                    .iter()
                    .any(|prefix| path.starts_with(prefix))
        })
        .max_by_key(|entry| entry.domain.len())
        .map(|entry| entry.platform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_matches() {
        assert!(host_matches("github.com", "github.com"));
        assert!(host_matches("gist.github.com", "github.com"));
        assert!(host_matches("WWW.GitHub.com", "github.com"));
        assert!(!host_matches("notgithub.com", "github.com"));
        assert!(!host_matches("github.com.evil.net", "github.com"));
        assert!(!host_matches("com", "github.com"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("/docs/Report.PDF"), Some("pdf".to_string()));
        assert_eq!(file_extension("/backup.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("/page.html"), None);
        assert_eq!(file_extension("/v1.2/page"), None);
        assert_eq!(file_extension("/"), None);
    }

    #[test]
    fn test_image_extension_is_advisory() {
        let url = Url::parse("https://cdn.example.com/a/photo.WEBP").unwrap();
        assert!(has_image_extension(&url));
        let url = Url::parse("https://cdn.example.com/render?id=4").unwrap();
        assert!(!has_image_extension(&url));
    }

    #[test]
    fn test_social_platform_first_match() {
        assert_eq!(social_platform("www.linkedin.com"), Some("LinkedIn"));
        assert_eq!(social_platform("m.facebook.com"), Some("Facebook"));
        assert_eq!(social_platform("example.com"), None);
    }

    #[test]
    fn test_video_platform() {
        let cases = [
            ("https://www.youtube.com/embed/xyz", Some(VideoPlatform::YouTube)),
            ("https://www.youtube-nocookie.com/embed/xyz", Some(VideoPlatform::YouTube)),
            ("https://youtu.be/xyz", Some(VideoPlatform::YouTube)),
            ("https://player.vimeo.com/video/1", Some(VideoPlatform::Vimeo)),
            ("https://www.dailymotion.com/embed/video/x", Some(VideoPlatform::Dailymotion)),
            ("https://player.twitch.tv/?channel=a", Some(VideoPlatform::Twitch)),
            ("https://www.facebook.com/plugins/video.php?href=x", Some(VideoPlatform::Facebook)),
            ("https://www.facebook.com/plugins/like.php", None),
            ("https://www.instagram.com/p/abc/embed", Some(VideoPlatform::Instagram)),
            ("https://example.com/ad", None),
        ];

        for (raw, expected) in cases {
            let url = Url::parse(raw).unwrap();
            assert_eq!(video_platform(&url), expected, "{raw}");
        }
    }
}
