use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A heading found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Ordered => f.write_str("Ordered"),
            ListKind::Unordered => f.write_str("Unordered"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextList {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    /// True when the table contains any `<th>` cell
    pub has_header: bool,
}

/// Textual view of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResult {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<Heading>,
    pub paragraphs: Vec<String>,
    pub lists: Vec<TextList>,
    pub tables: Vec<Table>,
    pub full_text: String,
    /// Always the whitespace token count of `full_text`
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageOrigin {
    /// Referenced by an `<img>` element
    Foreground,
    /// Referenced by a CSS `background-image` declaration
    Background,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub index: usize,
    pub url: String,
    pub alt: String,
    pub width: String,
    pub height: String,
    #[serde(rename = "type")]
    pub origin: ImageOrigin,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoKind {
    Native,
    Embedded,
}

/// Hosting platform of an embedded player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoPlatform {
    YouTube,
    Vimeo,
    Dailymotion,
    Twitch,
    Facebook,
    Instagram,
}

impl fmt::Display for VideoPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub index: usize,
    /// First entry of `sources`
    pub url: String,
    pub sources: Vec<VideoSource>,
    pub poster: Option<String>,
    pub controls: bool,
    pub autoplay: bool,
    pub width: String,
    pub height: String,
    pub kind: VideoKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<VideoPlatform>,
    pub filename: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkCategory {
    Internal,
    External,
    Email,
    Tel,
    File,
    Social,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 6] = [
        LinkCategory::Internal,
        LinkCategory::External,
        LinkCategory::Email,
        LinkCategory::Tel,
        LinkCategory::File,
        LinkCategory::Social,
    ];
}

impl fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkCategory::Internal => "internal",
            LinkCategory::External => "external",
            LinkCategory::Email => "email",
            LinkCategory::Tel => "tel",
            LinkCategory::File => "file",
            LinkCategory::Social => "social",
        };
        f.write_str(name)
    }
}

/// Category of a link together with its category-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum LinkKind {
    Internal,
    External,
    Email { email: String },
    Tel { phone: String },
    File { file_type: String },
    Social { platform: String },
}

impl LinkKind {
    pub fn category(&self) -> LinkCategory {
        match self {
            LinkKind::Internal => LinkCategory::Internal,
            LinkKind::External => LinkCategory::External,
            LinkKind::Email { .. } => LinkCategory::Email,
            LinkKind::Tel { .. } => LinkCategory::Tel,
            LinkKind::File { .. } => LinkCategory::File,
            LinkKind::Social { .. } => LinkCategory::Social,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub index: usize,
    pub url: String,
    pub text: String,
    pub title: String,
    pub original_href: String,
    #[serde(flatten)]
    pub kind: LinkKind,
}

impl LinkRef {
    pub fn category(&self) -> LinkCategory {
        self.kind.category()
    }
}

/// Per-category link counts. Derived from a [`LinkReport`], never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlTotals {
    pub internal: usize,
    pub external: usize,
    pub email: usize,
    pub tel: usize,
    pub file: usize,
    pub social: usize,
    pub total: usize,
}

/// Links of one page partitioned by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LinkReport {
    #[serde(default)]
    pub internal_links: Vec<LinkRef>,
    #[serde(default)]
    pub external_links: Vec<LinkRef>,
    #[serde(default)]
    pub email_links: Vec<LinkRef>,
    #[serde(default)]
    pub tel_links: Vec<LinkRef>,
    #[serde(default)]
    pub file_links: Vec<LinkRef>,
    #[serde(default)]
    pub social_links: Vec<LinkRef>,
}

impl LinkReport {
    /// Files a link under its category
    pub fn push(&mut self, link: LinkRef) {
        self.bucket_mut(link.category()).push(link);
    }

    pub fn links(&self, category: LinkCategory) -> &[LinkRef] {
        match category {
            LinkCategory::Internal => &self.internal_links,
            LinkCategory::External => &self.external_links,
            LinkCategory::Email => &self.email_links,
            LinkCategory::Tel => &self.tel_links,
            LinkCategory::File => &self.file_links,
            LinkCategory::Social => &self.social_links,
        }
    }

    fn bucket_mut(&mut self, category: LinkCategory) -> &mut Vec<LinkRef> {
        match category {
            LinkCategory::Internal => &mut self.internal_links,
            LinkCategory::External => &mut self.external_links,
            LinkCategory::Email => &mut self.email_links,
            LinkCategory::Tel => &mut self.tel_links,
            LinkCategory::File => &mut self.file_links,
            LinkCategory::Social => &mut self.social_links,
        }
    }

    /// All links in category order
    pub fn iter(&self) -> impl Iterator<Item = &LinkRef> {
        LinkCategory::ALL
            .into_iter()
            .flat_map(move |category| self.links(category).iter())
    }

    pub fn totals(&self) -> UrlTotals {
        let internal = self.internal_links.len();
        let external = self.external_links.len();
        let email = self.email_links.len();
        let tel = self.tel_links.len();
        let file = self.file_links.len();
        let social = self.social_links.len();

        UrlTotals {
            internal,
            external,
            email,
            tel,
            file,
            social,
            total: internal + external + email + tel + file + social,
        }
    }
}

impl Serialize for LinkReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            internal_links: &'a [LinkRef],
            external_links: &'a [LinkRef],
            email_links: &'a [LinkRef],
            tel_links: &'a [LinkRef],
            file_links: &'a [LinkRef],
            social_links: &'a [LinkRef],
            totals: UrlTotals,
        }

        Wire {
            internal_links: &self.internal_links,
            external_links: &self.external_links,
            email_links: &self.email_links,
            tel_links: &self.tel_links,
            file_links: &self.file_links,
            social_links: &self.social_links,
            totals: self.totals(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(index: usize, kind: LinkKind) -> LinkRef {
        LinkRef {
            index,
            url: format!("https://example.com/{index}"),
            text: String::new(),
            title: String::new(),
            original_href: format!("/{index}"),
            kind,
        }
    }

    #[test]
    fn test_totals_follow_the_link_set() {
        let mut report = LinkReport::default();
        report.push(link(0, LinkKind::Internal));
        report.push(link(1, LinkKind::Internal));
        report.push(link(2, LinkKind::Email { email: "a@b.c".into() }));

        let totals = report.totals();
        assert_eq!(totals.internal, 2);
        assert_eq!(totals.email, 1);
        assert_eq!(totals.total, 3);

        report.push(link(3, LinkKind::External));
        assert_eq!(report.totals().total, 4);
        assert_eq!(report.iter().count(), 4);
    }

    #[test]
    fn test_link_serializes_flat_with_category() {
        let value = serde_json::to_value(link(
            7,
            LinkKind::File {
                file_type: "pdf".into(),
            },
        ))
        .unwrap();
        assert_eq!(value["category"], "file");
        assert_eq!(value["file_type"], "pdf");
        assert_eq!(value["index"], 7);
    }

    #[test]
    fn test_report_serializes_totals() {
        let mut report = LinkReport::default();
        report.push(link(0, LinkKind::Tel { phone: "123".into() }));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totals"]["tel"], 1);
        assert_eq!(value["totals"]["total"], 1);
        assert_eq!(value["tel_links"][0]["phone"], "123");

        let back: LinkReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
