// src/services/discovery.rs

//! Social profile discovery for extracted listings.
//!
//! Names known to have no profile are kept in a [`DenyList`] so they are not
//! searched again. The list is an explicit value: the owner loads it once and
//! it is flushed to disk after every mutation.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::DiscoveryConfig;

/// Normalize a business name for deny-list comparison.
///
/// Lowercases, folds `ё` into `е`, unifies typographic quotes and dashes, and
/// collapses whitespace.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'ё' => 'е',
            '‘' | '’' | '‚' | '‛' => '\'',
            '“' | '”' | '„' | '«' | '»' => '"',
            '–' | '—' | '‒' | '―' => '-',
            other => other,
        })
        .collect();

    let dashes = collapse(&folded, '-');
    dashes.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse(text: &str, ch: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if !(c == ch && previous == Some(ch)) {
            out.push(c);
        }
        previous = Some(c);
    }
    out
}

/// Names that have no discoverable profile.
#[derive(Debug, Clone)]
pub struct DenyList {
    path: PathBuf,
    names: BTreeSet<String>,
    base: BTreeSet<String>,
}

impl DenyList {
    /// Load the list from `path`, merged with `base` names.
    ///
    /// A missing file is an empty list.
    pub fn load(path: impl Into<PathBuf>, base: &[String]) -> Result<Self> {
        let path = path.into();
        let mut names = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => return Err(AppError::Io(e)),
        };

        let base: BTreeSet<String> = base.iter().cloned().collect();
        names.extend(base.iter().cloned());

        log::debug!("Loaded {} deny-listed names from {}", names.len(), path.display());
        Ok(Self { path, names, base })
    }

    /// Write the list, one name per line, sorted by normalized form.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut sorted: Vec<&String> = self.names.iter().collect();
        sorted.sort_by_key(|name| normalize_name(name));

        let mut content = String::new();
        for name in sorted {
            content.push_str(name);
            content.push('\n');
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        let needle = normalize_name(name);
        self.names.iter().any(|n| normalize_name(n) == needle)
    }

    /// Add a name. Returns `false` if an equivalent name was already listed.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.insert(name.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names added beyond the built-in base list.
    pub fn custom_count(&self) -> usize {
        self.names.difference(&self.base).count()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// A web search backend.
#[async_trait]
pub trait ProfileSearch: Send + Sync {
    /// Return result URLs for a query, best first.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Finds a social profile URL for a business name.
pub struct ProfileDiscovery<S> {
    search: S,
    deny_list: DenyList,
    profile_host: Regex,
    host: String,
    city: String,
}

impl<S: ProfileSearch> ProfileDiscovery<S> {
    pub fn new(search: S, deny_list: DenyList, config: &DiscoveryConfig) -> Result<Self> {
        let profile_host = Regex::new(&format!(
            r"^https?://(?:[a-z0-9-]+\.)*{}(?:/|$)",
            regex::escape(&config.profile_host)
        ))?;
        Ok(Self {
            search,
            deny_list,
            profile_host,
            host: config.profile_host.clone(),
            city: config.city.clone(),
        })
    }

    /// Look up a profile for `name`.
    ///
    /// Deny-listed names are skipped without searching. A search that returns
    /// no profile adds the name to the deny-list and flushes it; a failed
    /// search leaves the list untouched.
    pub async fn discover(&mut self, name: &str) -> Result<Option<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if self.deny_list.contains(name) {
            log::info!("Skipping deny-listed name: {name}");
            return Ok(None);
        }

        let query = format!("site:{} {} {}", self.host, name, self.city);
        let results = match self.search.search(&query).await {
            Ok(results) => results,
            Err(e) => {
                log::error!("Profile search failed for {name}: {e}");
                return Ok(None);
            }
        };

        if let Some(url) = results.into_iter().find(|url| self.profile_host.is_match(url)) {
            log::info!("Found profile for {name}: {url}");
            return Ok(Some(url));
        }

        log::info!("No profile found for {name}, adding to deny-list");
        if self.deny_list.insert(name) {
            self.deny_list.save()?;
        }
        Ok(None)
    }

    pub fn deny_list(&self) -> &DenyList {
        &self.deny_list
    }
}
