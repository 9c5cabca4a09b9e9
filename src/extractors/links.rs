use crate::document::Page;
use crate::error::{ExtractionError, Pass};
use crate::extractors::{element_text, selector};
use crate::results::{LinkKind, LinkRef, LinkReport};
use crate::taxonomy;
use url::Url;

/// What a classification rule gets to look at
pub struct LinkContext<'a> {
    /// The raw `href` attribute
    pub href: &'a str,
    /// `href` resolved against the page, when resolvable
    pub resolved: Option<&'a Url>,
    /// The page the link was found on
    pub page_url: &'a Url,
}

/// A classification rule: returns the link kind when it applies
pub type Rule = fn(&LinkContext<'_>) -> Option<LinkKind>;

/// Classification rules in precedence order. The first rule that applies
/// decides the category, so categories never overlap.
pub const PRECEDENCE: [Rule; 6] = [email, tel, file, social, internal, external];

/// Classifies one link
pub fn classify(context: &LinkContext<'_>) -> LinkKind {
    PRECEDENCE
        .iter()
        .find_map(|rule| rule(context))
        .unwrap_or(LinkKind::External)
}

/// Collects every anchor with a non-empty `href` and files it under exactly
/// one category.
pub fn extract_links(page: &Page) -> Result<LinkReport, ExtractionError> {
    ::log::debug!("Extracting links from {}", page.url());

    let anchor = selector(Pass::Links, page, "a[href]")?;
    let mut report = LinkReport::default();

    for (index, element) in page.html().select(&anchor).enumerate() {
        let href = element.value().attr("href").unwrap_or_default();
        if href.is_empty() {
            continue;
        }

        let resolved = page.resolve(href);
        let kind = classify(&LinkContext {
            href,
            resolved: resolved.as_ref(),
            page_url: page.url(),
        });

        report.push(LinkRef {
            index,
            url: resolved
                .as_ref()
                .map(Url::to_string)
                .unwrap_or_else(|| href.to_string()),
            text: element_text(&element),
            title: element.value().attr("title").unwrap_or_default().to_string(),
            original_href: href.to_string(),
            kind,
        });
    }

    let totals = report.totals();
    ::log::debug!(
        "Classified {} links on {} ({} internal, {} external, {} email, {} tel, {} file, {} social)",
        totals.total,
        page.url(),
        totals.internal,
        totals.external,
        totals.email,
        totals.tel,
        totals.file,
        totals.social
    );

    Ok(report)
}

/// Strips `scheme` from the front of `href`, ignoring ASCII case
fn strip_scheme<'a>(href: &'a str, scheme: &str) -> Option<&'a str> {
    let trimmed = href.trim_start();
    trimmed
        .get(..scheme.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .map(|_| &trimmed[scheme.len()..])
}

fn email(context: &LinkContext<'_>) -> Option<LinkKind> {
    let rest = strip_scheme(context.href, "mailto:")?;
    let address = rest.split('?').next().unwrap_or_default();
    Some(LinkKind::Email {
        email: address.to_string(),
    })
}

fn tel(context: &LinkContext<'_>) -> Option<LinkKind> {
    let number = strip_scheme(context.href, "tel:")?;
    Some(LinkKind::Tel {
        phone: number.to_string(),
    })
}

fn file(context: &LinkContext<'_>) -> Option<LinkKind> {
    let path = match context.resolved {
        Some(url) => url.path(),
        None => context.href.split(['?', '#']).next().unwrap_or_default(),
    };
    taxonomy::file_extension(path).map(|file_type| LinkKind::File { file_type })
}

fn social(context: &LinkContext<'_>) -> Option<LinkKind> {
    let host = context.resolved?.host_str()?;
    taxonomy::social_platform(host).map(|platform| LinkKind::Social {
        platform: platform.to_string(),
    })
}

/// Same host and explicit port as the page, or no host at all
fn internal(context: &LinkContext<'_>) -> Option<LinkKind> {
    let same_site = match context.resolved.and_then(|url| url.host_str().map(|host| (url, host))) {
        None => true,
        Some((url, host)) => {
            context.page_url.host_str() == Some(host) && context.page_url.port() == url.port()
        }
    };
    same_site.then_some(LinkKind::Internal)
}

fn external(_context: &LinkContext<'_>) -> Option<LinkKind> {
    Some(LinkKind::External)
}
