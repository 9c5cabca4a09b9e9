pub mod http;

pub use http::HttpFetcher;

use crate::error::FetchError;
use std::future::Future;

/// Bytes and response metadata for one fetched page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// URL that was requested
    pub url: String,
    /// URL after redirects
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Source of page bytes. One call, one request; retrying is up to the caller.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<RawPage, FetchError>> + Send;
}
