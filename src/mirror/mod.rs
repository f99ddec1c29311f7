//! Remote listing mirror.
//!
//! Given a browse endpoint that renders HTML directory listings, this module
//! builds listing URLs, extracts and filters file links, and downloads every
//! file not already present in the local tree.
//!
//! # Components
//!
//! - [`compute_base_url`]/[`folder_listing_url`]/[`serial_listing_url`] -
//!   listing URL construction
//! - [`ListingLink`]/[`fetch_links`] - anchor extraction from listing pages
//! - [`has_downloadable_extension`]/[`matches_wanted_files`] - link filtering
//! - [`MirrorEngine`] - the sequential per-source state machine
//! - [`HttpClient`] - shared client for listing fetches and file downloads

mod client;
mod engine;
mod error;
mod filter;
mod listing;
mod urls;

pub use client::HttpClient;
pub use engine::{MirrorEngine, MirrorStats};
pub use error::MirrorError;
pub use filter::{has_downloadable_extension, matches_wanted_files};
pub use listing::{ListingLink, extract_links, fetch_links};
pub use urls::{compute_base_url, folder_listing_url, parse_browse_url, serial_listing_url};
