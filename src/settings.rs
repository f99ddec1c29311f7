//! Run configuration loaded from a TOML settings file.
//!
//! Settings are parsed once at startup into an explicit struct and passed by
//! reference into the mirror engine; nothing here is process-global. The
//! `folders`/`files` fields accept either a list or a comma-separated string
//! and are normalized to `Vec<String>` during deserialization, before the
//! core ever sees them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};

/// One logical device/dataset to mirror.
///
/// Constructed once from the settings file, immutable thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    /// Unique device identifier; names the remote data directory.
    pub serial: String,
    /// Optional disambiguating label appended to the local folder name.
    #[serde(default)]
    pub logger_name: Option<String>,
    /// Folder names to mirror, in configured order.
    #[serde(default, deserialize_with = "string_or_list")]
    pub folders: Vec<String>,
    /// Specific filenames to mirror from the serial's top-level listing,
    /// independent of `folders`.
    #[serde(default, deserialize_with = "string_or_list")]
    pub files: Vec<String>,
}

impl Source {
    /// Local output folder name: `<serial>` or `<serial>_<logger_name>`.
    ///
    /// An empty logger name counts as absent.
    #[must_use]
    pub fn output_folder_name(&self) -> String {
        match self.logger_name.as_deref().filter(|name| !name.is_empty()) {
            Some(logger_name) => format!("{}_{logger_name}", self.serial),
            None => self.serial.clone(),
        }
    }
}

/// Settings for one mirror run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Browse endpoint that renders an HTML directory listing for a `dir`
    /// query parameter.
    pub flexgate_browse_url: String,
    /// Local root the mirrored tree is created under.
    pub base_download_folder: PathBuf,
    /// Sources to mirror, processed in order.
    pub sources: Vec<Source>,
    /// Href suffixes that mark a link as downloadable (e.g. ".csv").
    pub downloadable_extensions: Vec<String>,
}

impl Settings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, does not parse as TOML, or fails
    /// validation ([`Settings::validate`]). Browse URL validity is checked
    /// later by the engine, before any network activity.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let settings: Settings = toml::from_str(&raw)
            .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.flexgate_browse_url.trim().is_empty() {
            bail!("`flexgate_browse_url` must not be empty");
        }
        if self.sources.is_empty() {
            bail!("settings must list at least one source");
        }
        if self.downloadable_extensions.is_empty() {
            bail!("`downloadable_extensions` must list at least one suffix");
        }
        for source in &self.sources {
            if source.serial.trim().is_empty() {
                bail!("every source needs a non-empty `serial`");
            }
        }
        Ok(())
    }
}

/// Accepts a list of strings or a single comma-separated string.
///
/// The string form is split on `,`, entries trimmed, empties dropped.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match StringOrList::deserialize(deserializer)? {
        StringOrList::List(entries) => entries,
        StringOrList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToOwned::to_owned)
            .collect(),
    })
}
