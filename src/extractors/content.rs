use crate::document::Page;
use crate::error::{ExtractionError, Pass};
use crate::extractors::{collapse_whitespace, element_text, selector};
use crate::results::{ContentResult, Heading, ListKind, Table, TextList};
use regex::Regex;
use scraper::{ElementRef, Html};

/// Subtrees that never contribute text
const NON_CONTENT: &str = "script, style, nav, footer, header, aside";

const NO_TITLE: &str = "No title found";

/// Paragraphs at or below this many characters are dropped
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Class names that mark a `<div>` as the main content container
const CONTENT_CLASS_PATTERN: &str = "content|main|body";

/// Extracts the textual view of a page.
///
/// Navigation, script and other boilerplate subtrees are removed first, so
/// none of the fields below can contain their text.
pub fn extract_content(page: &Page) -> Result<ContentResult, ExtractionError> {
    ::log::debug!("Extracting content from {}", page.url());

    let doc = page.without(&selector(Pass::Content, page, NON_CONTENT)?);
    let extractor = ContentExtractor { page, doc: &doc };

    let title = extractor.title()?;
    let meta_description = extractor.meta_description()?;
    let headings = extractor.headings()?;
    let paragraphs = extractor.paragraphs()?;
    let lists = extractor.lists()?;
    let tables = extractor.tables()?;
    let full_text = extractor.full_text()?;
    let word_count = full_text.split_whitespace().count();

    ::log::debug!(
        "Content of {}: {} headings, {} paragraphs, {} lists, {} tables, {} words",
        page.url(),
        headings.len(),
        paragraphs.len(),
        lists.len(),
        tables.len(),
        word_count
    );

    Ok(ContentResult {
        url: page.url().to_string(),
        title,
        meta_description,
        headings,
        paragraphs,
        lists,
        tables,
        full_text,
        word_count,
    })
}

struct ContentExtractor<'a> {
    page: &'a Page,
    doc: &'a Html,
}

impl<'a> ContentExtractor<'a> {
    fn select_first(&self, css: &str) -> Result<Option<ElementRef<'a>>, ExtractionError> {
        let sel = selector(Pass::Content, self.page, css)?;
        Ok(self.doc.root_element().select(&sel).next())
    }

    fn select_all(&self, css: &str) -> Result<Vec<ElementRef<'a>>, ExtractionError> {
        let sel = selector(Pass::Content, self.page, css)?;
        Ok(self.doc.root_element().select(&sel).collect())
    }

    /// `<title>`, then the first `<h1>`, then a placeholder. Only a missing
    /// element falls through; an empty `<title>` yields an empty title.
    fn title(&self) -> Result<String, ExtractionError> {
        for css in ["title", "h1"] {
            if let Some(element) = self.select_first(css)? {
                return Ok(element_text(&element));
            }
        }
        Ok(NO_TITLE.to_string())
    }

    /// `meta[name=description]`, falling back to the Open Graph description
    /// only when the plain tag is missing altogether
    fn meta_description(&self) -> Result<String, ExtractionError> {
        for css in [
            r#"meta[name="description"]"#,
            r#"meta[property="og:description"]"#,
        ] {
            if let Some(meta) = self.select_first(css)? {
                let content = meta.value().attr("content").unwrap_or_default();
                return Ok(content.trim().to_string());
            }
        }
        Ok(String::new())
    }

    /// Grouped by level first, then document order within a level
    fn headings(&self) -> Result<Vec<Heading>, ExtractionError> {
        let mut headings = Vec::new();
        for level in 1..=6u8 {
            for heading in self.select_all(&format!("h{level}"))? {
                let text = element_text(&heading);
                if !text.is_empty() {
                    headings.push(Heading { level, text });
                }
            }
        }
        Ok(headings)
    }

    fn paragraphs(&self) -> Result<Vec<String>, ExtractionError> {
        Ok(self
            .select_all("p")?
            .iter()
            .map(element_text)
            .filter(|text| text.chars().count() > MIN_PARAGRAPH_CHARS)
            .collect())
    }

    /// All unordered lists, then all ordered lists
    fn lists(&self) -> Result<Vec<TextList>, ExtractionError> {
        let li = selector(Pass::Content, self.page, "li")?;
        let mut lists = Vec::new();

        for (css, kind) in [("ul", ListKind::Unordered), ("ol", ListKind::Ordered)] {
            for list in self.select_all(css)? {
                let items = list
                    .select(&li)
                    .map(|item| element_text(&item))
                    .collect::<Vec<_>>();
                if !items.is_empty() {
                    lists.push(TextList { kind, items });
                }
            }
        }

        Ok(lists)
    }

    fn tables(&self) -> Result<Vec<Table>, ExtractionError> {
        let tr = selector(Pass::Content, self.page, "tr")?;
        let cell = selector(Pass::Content, self.page, "th, td")?;
        let th = selector(Pass::Content, self.page, "th")?;

        let mut tables = Vec::new();
        for table in self.select_all("table")? {
            let rows = table
                .select(&tr)
                .map(|row| {
                    row.select(&cell)
                        .map(|c| element_text(&c))
                        .collect::<Vec<_>>()
                })
                .filter(|cells| !cells.is_empty())
                .collect::<Vec<_>>();

            if !rows.is_empty() {
                tables.push(Table {
                    rows,
                    has_header: table.select(&th).next().is_some(),
                });
            }
        }

        Ok(tables)
    }

    /// Text of the main content container, or of the whole document
    fn full_text(&self) -> Result<String, ExtractionError> {
        let container = match self.select_first("main")? {
            Some(main) => Some(main),
            None => match self.select_first("article")? {
                Some(article) => Some(article),
                None => self.content_div()?,
            },
        };

        let raw = match container {
            Some(element) => element.text().collect::<String>(),
            None => self.doc.root_element().text().collect::<String>(),
        };

        Ok(collapse_whitespace(&raw))
    }

    fn content_div(&self) -> Result<Option<ElementRef<'a>>, ExtractionError> {
        let pattern = Regex::new(CONTENT_CLASS_PATTERN)
            .map_err(|e| ExtractionError::new(Pass::Content, self.page.url(), e))?;

        Ok(self
            .select_all("div[class]")?
            .into_iter()
            .find(|div| div.value().classes().any(|class| pattern.is_match(class))))
    }
}
