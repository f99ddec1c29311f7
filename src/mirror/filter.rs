//! Link filtering policies for listing pages.
//!
//! Two mutually exclusive policies: folder mirroring selects by extension
//! suffix, specific-file mirroring selects by exact filename. The engine
//! applies exactly one of them per listing pass.

/// Returns true if the raw href ends with one of the downloadable extensions.
///
/// The match is an exact, case-sensitive suffix check on the FULL href, not
/// the bare filename: `report.CSV` does not match `.csv`, and a query string
/// after the extension (`data.csv?ts=1`) is a false negative. Known
/// limitation, acceptable on plain directory listings where hrefs are bare
/// relative paths.
#[must_use]
pub fn has_downloadable_extension(href: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| href.ends_with(ext.as_str()))
}

/// Returns true if the derived filename exactly matches a wanted filename.
///
/// Case-sensitive string equality; no globbing.
#[must_use]
pub fn matches_wanted_files(filename: &str, wanted: &[String]) -> bool {
    wanted.iter().any(|name| name == filename)
}
