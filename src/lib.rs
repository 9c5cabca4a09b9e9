pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod extractors;
pub mod fetchers;
pub mod results;
pub mod taxonomy;
pub mod transfer;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use document::Page;
pub use error::{ExtractionError, FetchError, HarvestError, ParseError, Pass, TransferError};
pub use extractors::{extract_content, extract_images, extract_links, extract_videos};
pub use fetchers::{Fetcher, HttpFetcher};
pub use results::{ContentResult, ImageRef, LinkReport, VideoRef};
pub use transfer::{Downloader, MediaKind};

use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;

/// Outcome of one pass; `None` when the pass was not requested
pub type PassOutcome<T> = Option<Result<T, ExtractionError>>;

/// Everything extracted from one page
#[derive(Debug)]
pub struct Harvest {
    pub url: String,
    pub content: PassOutcome<ContentResult>,
    pub images: PassOutcome<Vec<ImageRef>>,
    pub videos: PassOutcome<Vec<VideoRef>>,
    pub links: PassOutcome<LinkReport>,
}

impl Harvest {
    /// JSON object keyed by pass name. A failed pass is reported as
    /// `{"error": ...}` next to the passes that succeeded.
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert("url".into(), Value::String(self.url.clone()));
        insert_outcome(&mut out, Pass::Content, &self.content);
        insert_outcome(&mut out, Pass::Images, &self.images);
        insert_outcome(&mut out, Pass::Videos, &self.videos);
        insert_outcome(&mut out, Pass::Links, &self.links);
        Value::Object(out)
    }

    /// Passes that were requested but failed
    pub fn failures(&self) -> Vec<&ExtractionError> {
        [
            self.content.as_ref().and_then(|r| r.as_ref().err()),
            self.images.as_ref().and_then(|r| r.as_ref().err()),
            self.videos.as_ref().and_then(|r| r.as_ref().err()),
            self.links.as_ref().and_then(|r| r.as_ref().err()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn insert_outcome<T: Serialize>(
    out: &mut serde_json::Map<String, Value>,
    pass: Pass,
    outcome: &PassOutcome<T>,
) {
    let value = match outcome {
        None => return,
        Some(Ok(result)) => serde_json::to_value(result)
            .unwrap_or_else(|e| json!({ "error": e.to_string() })),
        Some(Err(e)) => json!({ "error": e.to_string() }),
    };
    out.insert(pass.to_string(), value);
}

/// Main builder: fetch one page, parse it once, run the requested passes
pub struct Harvester {
    url: String,
    views: Vec<Pass>,
    config: HarvestConfig,
}

impl Harvester {
    /// Create a new Harvester for `url`, running every pass by default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            views: Pass::ALL.to_vec(),
            config: HarvestConfig::default(),
        }
    }

    /// Restrict the run to these passes
    pub fn with_views(mut self, views: &[Pass]) -> Self {
        self.views = Pass::ALL
            .into_iter()
            .filter(|pass| views.contains(pass))
            .collect();
        self
    }

    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        self,
        path: impl AsRef<Path>,
    ) -> Result<Self, config::ConfigError> {
        let config = HarvestConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Override the page timeout setting
    pub fn with_page_timeout(mut self, seconds: u64) -> Self {
        self.config.page_timeout_secs = seconds;
        self
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Fetch over HTTP with the configured identity and timeout
    pub async fn run(&self) -> Result<Harvest, HarvestError> {
        let fetcher = HttpFetcher::from_config(&self.config)?;
        self.run_with(&fetcher).await
    }

    /// Fetch through `fetcher`, then run each requested pass against the
    /// shared tree. A failing pass does not stop the others.
    pub async fn run_with<F: Fetcher>(&self, fetcher: &F) -> Result<Harvest, HarvestError> {
        let raw = fetcher.fetch(&self.url).await?;
        let page = Page::parse(&raw.body, &raw.url)?;

        let wants = |pass: Pass| self.views.contains(&pass);
        let harvest = Harvest {
            url: page.url().to_string(),
            content: wants(Pass::Content).then(|| extract_content(&page)),
            images: wants(Pass::Images).then(|| extract_images(&page)),
            videos: wants(Pass::Videos).then(|| extract_videos(&page)),
            links: wants(Pass::Links).then(|| extract_links(&page)),
        };

        for failure in harvest.failures() {
            ::log::warn!("{}", failure);
        }
        ::log::info!(
            "Harvested {} ({} of {} passes succeeded)",
            harvest.url,
            self.views.len() - harvest.failures().len(),
            self.views.len()
        );

        Ok(harvest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::RawPage;

    const PAGE: &str = r#"<html><head><title>Harvest</title></head><body>
        <p>This paragraph is certainly long enough to keep.</p>
        <img src="/a.png" alt="a">
        <a href="mailto:team@example.com">Mail</a>
        </body></html>"#;

    struct StaticFetcher;

    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
            Ok(RawPage {
                url: url.to_string(),
                final_url: url.to_string(),
                status: 200,
                content_type: Some("text/html".into()),
                body: PAGE.as_bytes().to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_runs_only_requested_views() {
        let harvest = Harvester::new("https://example.com/")
            .with_views(&[Pass::Images, Pass::Links])
            .run_with(&StaticFetcher)
            .await
            .unwrap();

        assert!(harvest.content.is_none());
        assert!(harvest.videos.is_none());
        assert_eq!(harvest.images.unwrap().unwrap().len(), 1);
        assert_eq!(harvest.links.unwrap().unwrap().totals().email, 1);
    }

    #[tokio::test]
    async fn test_json_keys_follow_views() {
        let harvest = Harvester::new("https://example.com/")
            .with_views(&[Pass::Content])
            .run_with(&StaticFetcher)
            .await
            .unwrap();

        let json = harvest.to_json();
        assert_eq!(json["url"], "https://example.com/");
        assert_eq!(json["content"]["title"], "Harvest");
        assert!(json.get("images").is_none());
        assert!(harvest.failures().is_empty());
    }

    #[tokio::test]
    async fn test_relative_url_is_a_fetch_error() {
        let err = Harvester::new("/relative")
            .run()
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::Fetch(FetchError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_run_over_http() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(PAGE)
            .create_async()
            .await;

        let harvest = Harvester::new(format!("{}/", server.url()))
            .with_page_timeout(5)
            .run()
            .await
            .unwrap();

        let content = harvest.content.unwrap().unwrap();
        assert_eq!(content.title, "Harvest");
        assert_eq!(content.paragraphs.len(), 1);
    }

    #[test]
    fn test_failed_pass_is_reported_beside_others() {
        let page = Page::from_html(PAGE, "https://example.com/").unwrap();
        let harvest = Harvest {
            url: "https://example.com/".into(),
            content: Some(extract_content(&page)),
            images: Some(Err(ExtractionError::new(
                Pass::Images,
                page.url(),
                error::ExtractionCause::Selector {
                    selector: "img[".into(),
                    reason: "unexpected end".into(),
                },
            ))),
            videos: None,
            links: None,
        };

        let json = harvest.to_json();
        assert_eq!(json["content"]["title"], "Harvest");
        assert!(
            json["images"]["error"]
                .as_str()
                .unwrap()
                .starts_with("images extraction failed")
        );
        assert_eq!(harvest.failures().len(), 1);
    }
}
