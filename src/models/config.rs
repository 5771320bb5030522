//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::locale::LocaleConfig;
use crate::models::ListingSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Lightweight HTTP fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Headless browser settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Listing field selectors
    #[serde(default)]
    pub selectors: ListingSelectors,

    /// Text cleaning rules
    #[serde(default)]
    pub cleaning: CleaningConfig,

    /// User-facing strings
    #[serde(default)]
    pub locale: LocaleConfig,

    /// Batch processing policy
    #[serde(default)]
    pub batch: BatchConfig,

    /// Listing store location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Social profile discovery
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.max_title_graphemes == 0 {
            return Err(AppError::validation(
                "fetch.max_title_graphemes must be > 0",
            ));
        }
        if self.browser.wait_timeout_secs == 0 {
            return Err(AppError::validation("browser.wait_timeout_secs must be > 0"));
        }
        if self.browser.settle_min_ms > self.browser.settle_max_ms {
            return Err(AppError::validation(
                "browser.settle_min_ms must not exceed browser.settle_max_ms",
            ));
        }
        if self.browser.port_min >= self.browser.port_max {
            return Err(AppError::validation(
                "browser.port_min must be below browser.port_max",
            ));
        }
        if self.browser.wait_selector.trim().is_empty() {
            return Err(AppError::validation("browser.wait_selector is empty"));
        }
        if self.locale.closed_label.trim().is_empty() {
            return Err(AppError::validation("locale.closed_label is empty"));
        }
        for (field, selector) in self.selectors.all() {
            if selector.trim().is_empty() {
                return Err(AppError::validation(format!("selectors.{field} is empty")));
            }
        }
        Ok(())
    }
}

/// Lightweight fetch and challenge detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header mimicking a desktop browser
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Accept-Language header
    #[serde(default = "defaults::accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Titles longer than this are treated as a challenge page
    #[serde(default = "defaults::max_title_graphemes")]
    pub max_title_graphemes: usize,

    /// Case-insensitive substrings that mark a challenge page
    #[serde(default = "defaults::challenge_markers")]
    pub challenge_markers: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            accept_language: defaults::accept_language(),
            timeout_secs: defaults::timeout(),
            max_title_graphemes: defaults::max_title_graphemes(),
            challenge_markers: defaults::challenge_markers(),
        }
    }
}

/// Headless browser settings for the full-render fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    #[serde(default = "defaults::headless")]
    pub headless: bool,

    /// Explicit Chrome binary; autodetected when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chrome_path: Option<PathBuf>,

    /// Selector whose appearance marks the listing as rendered
    #[serde(default = "defaults::wait_selector")]
    pub wait_selector: String,

    /// Upper bound for the rendered-content wait
    #[serde(default = "defaults::wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Lower bound of the randomized post-load delay
    #[serde(default = "defaults::settle_min")]
    pub settle_min_ms: u64,

    /// Upper bound of the randomized post-load delay
    #[serde(default = "defaults::settle_max")]
    pub settle_max_ms: u64,

    /// Remote debugging port range, picked at random per launch
    #[serde(default = "defaults::port_min")]
    pub port_min: u16,
    #[serde(default = "defaults::port_max")]
    pub port_max: u16,

    #[serde(default = "defaults::window_width")]
    pub window_width: u32,
    #[serde(default = "defaults::window_height")]
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: defaults::headless(),
            chrome_path: None,
            wait_selector: defaults::wait_selector(),
            wait_timeout_secs: defaults::wait_timeout(),
            settle_min_ms: defaults::settle_min(),
            settle_max_ms: defaults::settle_max(),
            port_min: defaults::port_min(),
            port_max: defaults::port_max(),
            window_width: defaults::window_width(),
            window_height: defaults::window_height(),
        }
    }
}

/// Text cleaning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Regex matching the site branding appended to page titles
    #[serde(default = "defaults::brand_suffix_pattern")]
    pub brand_suffix_pattern: String,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            brand_suffix_pattern: defaults::brand_suffix_pattern(),
        }
    }
}

/// Batch processing policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Pause between consecutive listing fetches in milliseconds
    #[serde(default = "defaults::cooldown")]
    pub cooldown_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: defaults::cooldown(),
        }
    }
}

/// Listing store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for `listings.json`
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

/// Social profile discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// File holding names known to have no profile
    #[serde(default = "defaults::deny_list_file")]
    pub deny_list_file: PathBuf,

    /// Names always treated as denied
    #[serde(default = "defaults::base_deny_list")]
    pub base_deny_list: Vec<String>,

    /// Host the profile URL must belong to
    #[serde(default = "defaults::profile_host")]
    pub profile_host: String,

    /// City appended to search queries
    #[serde(default = "defaults::city")]
    pub city: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            deny_list_file: defaults::deny_list_file(),
            base_deny_list: defaults::base_deny_list(),
            profile_host: defaults::profile_host(),
            city: defaults::city(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/124.0.0.0 Safari/537.36"
            .into()
    }
    pub fn accept_language() -> String {
        "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn max_title_graphemes() -> usize {
        60
    }
    pub fn challenge_markers() -> Vec<String> {
        vec![
            "captcha".into(),
            "showcaptcha".into(),
            "вы не робот".into(),
            "are you not a robot".into(),
        ]
    }

    // Browser defaults
    pub fn headless() -> bool {
        true
    }
    pub fn wait_selector() -> String {
        "span.business-rating-badge-view__rating-text".into()
    }
    pub fn wait_timeout() -> u64 {
        20
    }
    pub fn settle_min() -> u64 {
        2_000
    }
    pub fn settle_max() -> u64 {
        4_500
    }
    pub fn port_min() -> u16 {
        9_300
    }
    pub fn port_max() -> u16 {
        9_900
    }
    pub fn window_width() -> u32 {
        1_200
    }
    pub fn window_height() -> u32 {
        1_000
    }

    // Cleaning defaults
    pub fn brand_suffix_pattern() -> String {
        r"\s+[—–-]\s+Яндекс\s?Карты.*$".into()
    }

    // Batch defaults
    pub fn cooldown() -> u64 {
        2_000
    }

    // Storage defaults
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("storage")
    }

    // Discovery defaults
    pub fn deny_list_file() -> PathBuf {
        PathBuf::from("storage/profile_deny_list.txt")
    }
    pub fn base_deny_list() -> Vec<String> {
        vec![
            "13 Градусов".into(),
            "Цирк".into(),
            "The Waterfront".into(),
            "Стая".into(),
        ]
    }
    pub fn profile_host() -> String {
        "instagram.com".into()
    }
    pub fn city() -> String {
        "Москва".into()
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}
