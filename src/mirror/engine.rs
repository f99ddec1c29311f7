//! Sequential mirror engine.
//!
//! Drives the fetch→filter→skip-or-download cycle for every configured
//! source. Strictly sequential: one network operation completes before the
//! next begins, so the filesystem needs no locking and the only resumability
//! is the skip-if-present check itself.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use url::Url;

use crate::settings::{Settings, Source};

use super::client::HttpClient;
use super::error::MirrorError;
use super::filter::{has_downloadable_extension, matches_wanted_files};
use super::listing::{ListingLink, fetch_links};
use super::urls::{compute_base_url, folder_listing_url, parse_browse_url, serial_listing_url};

/// Counters from one mirror run.
#[derive(Debug, Default, Clone, Copy)]
pub struct MirrorStats {
    /// Files fetched and written this run.
    pub downloaded: usize,
    /// Files skipped because they were already present locally.
    pub skipped: usize,
    /// Sources that failed (keep-going mode only; always 0 otherwise).
    pub failed_sources: usize,
}

/// Sequential mirror engine.
///
/// Owns the HTTP client and borrows the immutable settings. All per-source
/// and per-folder state (listing links, local snapshots) is local to one
/// iteration; nothing is shared across sources.
#[derive(Debug)]
pub struct MirrorEngine<'a> {
    settings: &'a Settings,
    client: HttpClient,
    /// Parsed browse endpoint, input to the listing URL builders.
    browse_url: Url,
    /// Join-base for relative hrefs: browse URL minus its script name.
    base_url: Url,
    /// Continue with the next source when one fails.
    keep_going: bool,
}

impl<'a> MirrorEngine<'a> {
    /// Creates an engine for `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`MirrorError::InvalidBrowseUrl`] when the configured browse
    /// URL has no scheme or host. No network activity happens here.
    pub fn new(settings: &'a Settings, keep_going: bool) -> Result<Self, MirrorError> {
        let browse_url = parse_browse_url(&settings.flexgate_browse_url)?;
        let base_url = compute_base_url(&settings.flexgate_browse_url)?;
        Ok(Self {
            settings,
            client: HttpClient::new(),
            browse_url,
            base_url,
            keep_going,
        })
    }

    /// Mirrors every configured source, in order.
    ///
    /// Default mode: the first failed fetch or download aborts the whole
    /// run. Keep-going mode: a failed source is logged and counted in
    /// [`MirrorStats::failed_sources`], and the run continues with the next
    /// source.
    ///
    /// # Errors
    ///
    /// Propagates the first [`MirrorError`] unless keep-going is set.
    pub async fn run(&self) -> Result<MirrorStats, MirrorError> {
        let mut stats = MirrorStats::default();
        for source in &self.settings.sources {
            info!(serial = %source.serial, "mirroring source");
            match self.mirror_source(source, &mut stats).await {
                Ok(()) => {}
                Err(error) if self.keep_going => {
                    warn!(serial = %source.serial, error = %error, "source failed, continuing");
                    stats.failed_sources += 1;
                }
                Err(error) => return Err(error),
            }
        }
        Ok(stats)
    }

    /// Mirrors one source: specific files first, then each folder.
    async fn mirror_source(
        &self,
        source: &Source,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        let output_root = self
            .settings
            .base_download_folder
            .join(source.output_folder_name());
        create_dir_all(&output_root).await?;

        if !source.files.is_empty() {
            self.mirror_specific_files(source, &output_root, stats)
                .await?;
        }

        for folder in &source.folders {
            self.mirror_folder(source, folder, &output_root, stats)
                .await?;
        }
        Ok(())
    }

    /// Downloads the source's wanted files from its top-level listing.
    ///
    /// Idempotence check is a direct existence test per destination path.
    async fn mirror_specific_files(
        &self,
        source: &Source,
        output_root: &Path,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        let listing_url = serial_listing_url(&self.browse_url, &source.serial);
        let links = fetch_links(&self.client, &listing_url).await?;

        for link in links {
            if !matches_wanted_files(&link.filename, &source.files) {
                continue;
            }
            let destination = output_root.join(&link.filename);
            if destination.exists() {
                info!(filename = %link.filename, "skipping, already downloaded");
                stats.skipped += 1;
                continue;
            }
            let Some(file_url) = self.resolve_href(&link) else {
                continue;
            };
            self.client.download_to_file(&file_url, &destination).await?;
            stats.downloaded += 1;
        }
        Ok(())
    }

    /// Mirrors one folder of a source.
    ///
    /// Idempotence check is a snapshot of the local folder's filenames taken
    /// before the listing fetch; files appearing locally after the snapshot
    /// are not detected (acceptable, the loop is sequential).
    async fn mirror_folder(
        &self,
        source: &Source,
        folder: &str,
        output_root: &Path,
        stats: &mut MirrorStats,
    ) -> Result<(), MirrorError> {
        let listing_url = folder_listing_url(&self.browse_url, &source.serial, folder);
        let output_folder = output_root.join(folder);
        create_dir_all(&output_folder).await?;

        let existing = snapshot_filenames(&output_folder).await?;
        let links = fetch_links(&self.client, &listing_url).await?;

        for link in links {
            if !has_downloadable_extension(&link.href, &self.settings.downloadable_extensions) {
                continue;
            }
            if existing.contains(link.filename.as_str()) {
                info!(filename = %link.filename, "skipping, already downloaded");
                stats.skipped += 1;
                continue;
            }
            let Some(file_url) = self.resolve_href(&link) else {
                continue;
            };
            let destination = output_folder.join(&link.filename);
            self.client.download_to_file(&file_url, &destination).await?;
            stats.downloaded += 1;
        }
        Ok(())
    }

    /// Resolves a listing href against the base URL.
    ///
    /// An href the URL parser rejects even relative to the base is logged
    /// and dropped, like an anchor without an href.
    fn resolve_href(&self, link: &ListingLink) -> Option<Url> {
        match self.base_url.join(&link.href) {
            Ok(url) => Some(url),
            Err(error) => {
                warn!(href = %link.href, error = %error, "unresolvable href, skipping");
                None
            }
        }
    }
}

/// Creates a directory and its parents; already-existing is not an error.
async fn create_dir_all(path: &Path) -> Result<(), MirrorError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| MirrorError::io(path.to_path_buf(), e))
}

/// Snapshots the filenames currently present in a local folder.
async fn snapshot_filenames(folder: &Path) -> Result<HashSet<String>, MirrorError> {
    let to_io_error = |e| MirrorError::io(PathBuf::from(folder), e);
    let mut entries = tokio::fs::read_dir(folder).await.map_err(to_io_error)?;
    let mut names = HashSet::new();
    while let Some(entry) = entries.next_entry().await.map_err(to_io_error)? {
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
