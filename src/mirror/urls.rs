//! Listing URL construction for the browse endpoint.
//!
//! The browse endpoint is a script (e.g. `/cgi-bin/browse.php`) that renders
//! an HTML directory listing for a `dir` query parameter. File hrefs on those
//! pages are relative to the script's directory, so the join-base is the
//! browse URL with its final path segment removed.

use url::Url;

use super::error::MirrorError;

/// Parses and validates the configured browse URL.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidBrowseUrl`] when the string is not an
/// absolute URL (no scheme) or has no host.
pub fn parse_browse_url(raw: &str) -> Result<Url, MirrorError> {
    let parsed = Url::parse(raw)
        .map_err(|_| MirrorError::invalid_browse_url(raw, "not an absolute URL"))?;
    if parsed.host_str().is_none() {
        return Err(MirrorError::invalid_browse_url(raw, "missing host"));
    }
    Ok(parsed)
}

/// Computes the join-base for relative listing hrefs.
///
/// Drops the final path segment of the browse URL (the listing script name)
/// along with any query or fragment. The result always ends in `/` and is
/// used only with [`Url::join`], never fetched directly.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidBrowseUrl`] when the browse URL is missing
/// a scheme or host.
pub fn compute_base_url(raw: &str) -> Result<Url, MirrorError> {
    let browse_url = parse_browse_url(raw)?;
    let path = browse_url.path();
    let base_path = match path.rfind('/') {
        Some(index) => path[..=index].to_owned(),
        None => "/".to_owned(),
    };

    let mut base = browse_url;
    base.set_path(&base_path);
    base.set_query(None);
    base.set_fragment(None);
    Ok(base)
}

/// Builds the listing URL for one folder of a serial.
///
/// Sets the `dir` query parameter to the percent-encoded relative path
/// `../data/<serial>/<folder>` (path separators kept literal) and preserves
/// every other query parameter the browse URL already carries. Deterministic
/// given identical inputs.
#[must_use]
pub fn folder_listing_url(browse_url: &Url, serial: &str, folder: &str) -> Url {
    let kept: Vec<(String, String)> = browse_url
        .query_pairs()
        .filter(|(key, _)| key.as_ref() != "dir")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut query = String::new();
    for (key, value) in &kept {
        query.push_str(&urlencoding::encode(key));
        query.push('=');
        query.push_str(&urlencoding::encode(value));
        query.push('&');
    }
    query.push_str("dir=");
    query.push_str(&encode_dir_path(&format!("../data/{serial}/{folder}")));

    let mut url = browse_url.clone();
    url.set_query(Some(&query));
    url
}

/// Builds the top-level listing URL for a serial.
///
/// Replaces the whole query with `dir=../data/<serial>`, discarding any
/// pre-existing query parameters. This asymmetry with
/// [`folder_listing_url`] is inherited behavior: browse URLs are not
/// expected to carry other parameters, and unifying the two would change
/// the requests issued for configurations that do.
#[must_use]
pub fn serial_listing_url(browse_url: &Url, serial: &str) -> Url {
    let mut url = browse_url.clone();
    url.set_query(Some(&format!("dir=../data/{serial}")));
    url
}

/// Percent-encodes a `dir` parameter value, keeping `/` literal.
fn encode_dir_path(relative_path: &str) -> String {
    urlencoding::encode(relative_path).replace("%2F", "/")
}
