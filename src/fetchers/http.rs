use crate::config::HarvestConfig;
use crate::error::FetchError;
use crate::fetchers::{Fetcher, RawPage};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use url::Url;

/// HTTP fetcher with a fixed identity and timeout.
///
/// Built once and passed to whoever needs it; the configuration never
/// changes after construction.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
        })
    }

    /// Fetcher for page passes, using the configured page timeout
    pub fn from_config(config: &HarvestConfig) -> Result<Self, FetchError> {
        Self::new(&config.user_agent, config.page_timeout())
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        let target = parse_http_url(url)?;
        ::log::info!("Fetching {}", target);

        let response = send(self.client.get(target), url).await?;

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| request_error(url, e))?
            .to_vec();

        ::log::debug!("Fetched {} bytes from {} (HTTP {})", body.len(), final_url, status);

        Ok(RawPage {
            url: url.to_string(),
            final_url,
            status,
            content_type,
            body,
        })
    }
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(FetchError::Client)
}

/// Accepts only absolute http(s) URLs
pub(crate) fn parse_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

/// Sends a prepared request and turns non-2xx statuses into errors
pub(crate) async fn send(
    request: reqwest::RequestBuilder,
    url: &str,
) -> Result<reqwest::Response, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| request_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        ::log::warn!("{} returned HTTP {}", url, status);
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

pub(crate) fn request_error(url: &str, source: reqwest::Error) -> FetchError {
    if source.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(DEFAULT_USER_AGENT, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_identity() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", DEFAULT_USER_AGENT)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body("<html><body>hi</body></html>")
            .create_async()
            .await;

        let url = format!("{}/page", server.url());
        let page = fetcher().fetch(&url).await.unwrap();
        mock.assert_async().await;

        assert_eq!(page.status, 200);
        assert_eq!(page.url, url);
        assert_eq!(page.content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(page.body, b"<html><body>hi</body></html>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let err = fetcher()
            .fetch(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        for url in ["not a url", "/relative", "ftp://example.com/file"] {
            let err = fetcher().fetch(url).await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidUrl { .. }), "{url}");
        }
    }
}
