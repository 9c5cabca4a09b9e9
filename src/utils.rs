use chrono::{DateTime, Local};
use url::Url;

const MAX_FILENAME_LEN: usize = 100;
const TRUNCATED_STEM_LEN: usize = 90;

/// Timestamp format used in generated file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Builds a filesystem-safe name for a download of `url`.
///
/// The last path segment is used when it has an extension; otherwise the
/// name is `{default_stem}_{timestamp}.{default_ext}`. Only ASCII
/// alphanumerics, `.`, `_` and `-` survive, and names longer than 100
/// characters are cut down while keeping the extension.
pub fn safe_filename(
    url: &str,
    default_stem: &str,
    default_ext: &str,
    now: DateTime<Local>,
) -> String {
    let generated = || {
        format!(
            "{}_{}.{}",
            default_stem,
            now.format(TIMESTAMP_FORMAT),
            default_ext
        )
    };

    let name = Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| segment.contains('.'))
        .unwrap_or_else(generated);

    let mut name = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect::<String>();

    if name.is_empty() {
        name = generated();
    }

    if name.len() > MAX_FILENAME_LEN {
        name = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                format!("{}.{}", &stem[..stem.len().min(TRUNCATED_STEM_LEN)], ext)
            }
            _ => name[..MAX_FILENAME_LEN].to_string(),
        };
    }

    name
}
