// src/services/fetch/browser.rs

//! Full-render fetch through a stealth headless Chrome.
//!
//! Each fetch launches its own browser process on a random debugging port and
//! tears it down when the [`BrowserSession`] guard drops, whatever the exit
//! path. `headless_chrome` is blocking, so the session runs on the blocking
//! thread pool.

use std::ffi::OsStr;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use rand::Rng;

use super::{FetchOutcome, FetchedPage, PageFetcher, StrategyKind};
use crate::error::{AppError, Result};
use crate::models::{BrowserConfig, FetchConfig};

const STEALTH_ARGS: [&str; 4] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--disable-infobars",
    "--lang=ru-RU",
];

/// Owns one browser process for the duration of a fetch.
///
/// Dropping the inner `Browser` kills the Chrome process; the `Drop` impl
/// here only logs the teardown.
struct BrowserSession {
    browser: Browser,
    port: u16,
}

impl BrowserSession {
    fn launch(config: &BrowserConfig, port: u16) -> Result<Self> {
        let args: Vec<&OsStr> = STEALTH_ARGS.into_iter().map(OsStr::new).collect();
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .sandbox(false)
            .port(Some(port))
            .window_size(Some((config.window_width, config.window_height)))
            .path(config.chrome_path.clone())
            .args(args)
            .ignore_default_args(vec![OsStr::new("--enable-automation")])
            .idle_browser_timeout(Duration::from_secs(
                config.wait_timeout_secs.saturating_mul(3),
            ))
            .build()
            .map_err(AppError::browser)?;

        let browser = Browser::new(options).map_err(AppError::browser)?;
        log::debug!("Launched headless browser on port {port}");
        Ok(Self { browser, port })
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        log::debug!("Closing headless browser on port {}", self.port);
    }
}

/// Renders listing pages in a real browser engine.
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    config: BrowserConfig,
    user_agent: String,
    accept_language: String,
}

impl BrowserFetcher {
    pub fn new(config: &BrowserConfig, fetch: &FetchConfig) -> Self {
        Self {
            config: config.clone(),
            user_agent: fetch.user_agent.clone(),
            accept_language: fetch.accept_language.clone(),
        }
    }

    /// Random debugging port and human-like settle delay for one session.
    fn session_params(&self) -> Result<(u16, Duration)> {
        let BrowserConfig {
            port_min,
            port_max,
            settle_min_ms,
            settle_max_ms,
            ..
        } = self.config;

        if port_min >= port_max {
            return Err(AppError::config(format!(
                "browser port range {port_min}..{port_max} is empty"
            )));
        }
        if settle_min_ms > settle_max_ms {
            return Err(AppError::config(format!(
                "browser settle range {settle_min_ms}..={settle_max_ms}ms is empty"
            )));
        }

        let mut rng = rand::rng();
        let port = rng.random_range(port_min..port_max);
        let settle_ms = rng.random_range(settle_min_ms..=settle_max_ms);
        Ok((port, Duration::from_millis(settle_ms)))
    }

    /// Blocking render of one URL.
    fn render(&self, url: &str, port: u16, settle: Duration) -> Result<FetchedPage> {
        let session = BrowserSession::launch(&self.config, port)?;
        let tab = session.browser.new_tab().map_err(AppError::browser)?;

        tab.enable_stealth_mode().map_err(AppError::browser)?;
        tab.set_user_agent(
            &self.user_agent,
            Some(self.accept_language.as_str()),
            Some("Win32"),
        )
        .map_err(AppError::browser)?;

        tab.navigate_to(url)
            .map_err(|e| AppError::browser(format!("navigation to {url} failed: {e}")))?;
        tab.wait_until_navigated()
            .map_err(|e| AppError::browser(format!("page load failed: {e}")))?;

        thread::sleep(settle);

        let wait = Duration::from_secs(self.config.wait_timeout_secs);
        tab.wait_for_element_with_custom_timeout(&self.config.wait_selector, wait)
            .map_err(|e| {
                AppError::browser(format!(
                    "'{}' did not appear within {}s: {e}",
                    self.config.wait_selector, self.config.wait_timeout_secs
                ))
            })?;

        let html = tab.get_content().map_err(AppError::browser)?;
        let final_url = tab.get_url();
        log::debug!("Rendered {} bytes from {final_url}", html.len());

        Ok(FetchedPage {
            html,
            final_url,
            strategy: StrategyKind::FullRender,
        })
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FullRender
    }

    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let (port, settle) = self.session_params()?;
        log::debug!(
            "Full-render fetch: {url} (port {port}, settle {}ms)",
            settle.as_millis()
        );

        let fetcher = self.clone();
        let url = url.to_string();

        let page = tokio::task::spawn_blocking(move || fetcher.render(&url, port, settle))
            .await
            .map_err(|e| AppError::Task(format!("browser task failed: {e}")))??;

        Ok(FetchOutcome::Page(page))
    }
}
