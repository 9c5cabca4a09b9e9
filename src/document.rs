use crate::error::ParseError;
use scraper::{Html, Selector};
use url::Url;

/// A fetched page parsed once and shared read-only by every extraction pass
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    html: Html,
}

impl Page {
    /// Parses raw response bytes. Invalid UTF-8 sequences are replaced rather
    /// than rejected; html5ever itself never fails on malformed markup.
    pub fn parse(bytes: &[u8], origin_url: &str) -> Result<Self, ParseError> {
        let text = String::from_utf8_lossy(bytes);
        Self::from_html(&text, origin_url)
    }

    /// Parses an HTML string fetched from `origin_url`
    pub fn from_html(html: &str, origin_url: &str) -> Result<Self, ParseError> {
        let url = Url::parse(origin_url).map_err(|source| ParseError::InvalidBaseUrl {
            url: origin_url.to_string(),
            source,
        })?;

        Ok(Self {
            url,
            html: Html::parse_document(html),
        })
    }

    /// URL the page was fetched from; relative references resolve against it
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Resolves `reference` against the page URL
    pub fn resolve(&self, reference: &str) -> Option<Url> {
        self.url.join(reference).ok()
    }

    /// Returns a copy of the tree with every subtree matching `selector` detached.
    ///
    /// Detached nodes stay in the tree's storage and `Html::select` still
    /// visits them; walk from `root_element()` to see only what is attached.
    pub fn without(&self, selector: &Selector) -> Html {
        let mut html = self.html.clone();
        let ids = html.select(selector).map(|el| el.id()).collect::<Vec<_>>();
        for id in ids {
            if let Some(mut node) = html.tree.get_mut(id) {
                node.detach();
            }
        }
        html
    }
}
