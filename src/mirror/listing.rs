//! Listing-page retrieval and anchor extraction.
//!
//! A listing page is plain HTML whose anchors point at files and subfolders.
//! Extraction is a pure function over the page body; fetching goes through
//! the shared [`HttpClient`].

use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::client::HttpClient;
use super::error::MirrorError;

/// Anchors are the only structure we read from a listing page.
#[allow(clippy::expect_used)]
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// One anchor from a listing page.
///
/// Ephemeral: exists only while a single listing pass runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink {
    /// The raw `href` attribute value, possibly relative.
    pub href: String,
    /// The filename the href names: last path segment, query-stripped,
    /// percent-decoded.
    pub filename: String,
}

/// Fetches a listing page and returns its anchors in document order.
///
/// Anchors without an `href` never reach this point (the selector skips
/// them); they are filtered, not an error.
///
/// # Errors
///
/// Returns [`MirrorError::Network`] on transport failure and
/// [`MirrorError::HttpStatus`] on a non-success response. Neither is
/// retried.
pub async fn fetch_links(client: &HttpClient, url: &Url) -> Result<Vec<ListingLink>, MirrorError> {
    let body = client.fetch_text(url).await?;
    let links = extract_links(&body);
    debug!(url = %url, links = links.len(), "listing fetched");
    Ok(links)
}

/// Extracts every `href`-bearing anchor from a listing page body.
///
/// Returns a finite list in document order. Pure function: no network, no
/// filesystem.
#[must_use]
pub fn extract_links(html: &str) -> Vec<ListingLink> {
    let document = Html::parse_document(html);
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(|href| ListingLink {
            href: href.to_string(),
            filename: filename_from_href(href),
        })
        .collect()
}

/// Derives the filename an href points at.
///
/// Absolute hrefs go through URL parsing (query and fragment fall away with
/// the path split); relative hrefs fall back to string handling that strips
/// any `?`/`#` suffix and takes the part after the last `/`.
fn filename_from_href(href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        let last = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("");
        return decode_segment(last);
    }

    let path = href.split(['?', '#']).next().unwrap_or(href);
    let last = path.rsplit('/').next().unwrap_or(path);
    decode_segment(last)
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .unwrap_or_else(|error| {
            debug!(segment = %segment, error = %error, "URL decoding failed, using raw segment");
            segment.into()
        })
        .into_owned()
}
