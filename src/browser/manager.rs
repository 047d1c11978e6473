use super::config::BrowserConfig;
use super::session::ChromeSession;
use super::Launcher;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::time::Duration;

/// Launches a fresh headless Chrome process per session
pub struct ChromeLauncher {
    config: BrowserConfig,
    wait_timeout: Duration,
}

impl ChromeLauncher {
    /// `wait_timeout` bounds the longest wait a session will perform; the
    /// browser is kept alive at least that long without activity.
    pub fn new(config: BrowserConfig, wait_timeout: Duration) -> Self {
        Self {
            config,
            wait_timeout,
        }
    }

    /// Build Chrome launch options from our config
    fn build_launch_options<'a>(
        config: &BrowserConfig,
        args: &'a [String],
        idle_timeout: Duration,
    ) -> Result<LaunchOptions<'a>, BrowserError> {
        let args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

        LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_size.0, config.window_size.1)))
            .idle_browser_timeout(idle_timeout)
            .args(args)
            .build()
            .map_err(|e| BrowserError::ConfigurationError(e.to_string()))
    }

    /// Timeout the tab applies to its own waits, navigation included
    fn tab_timeout(&self) -> Duration {
        self.wait_timeout
    }
}

impl Launcher for ChromeLauncher {
    type Session = ChromeSession;

    fn launch(&mut self) -> Result<ChromeSession, BrowserError> {
        let args = self.config.launch_args();
        let idle_timeout = self.wait_timeout + Duration::from_secs(30);
        let launch_options = Self::build_launch_options(&self.config, &args, idle_timeout)?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::InitializationError(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::TabCreationError(e.to_string()))?;
        tab.set_default_timeout(self.tab_timeout());

        log::debug!("Launched browser session ({} flags)", args.len());
        Ok(ChromeSession::new(browser, tab, self.config.poll_interval()))
    }
}

/// Errors that can occur during browser operations
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error("Browser initialization failed: {0}")]
    InitializationError(String),

    #[error("Browser configuration error: {0}")]
    ConfigurationError(String),

    #[error("Tab creation failed: {0}")]
    TabCreationError(String),

    #[error("Navigation error: {0}")]
    NavigationError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("JavaScript execution error: {0}")]
    JavaScriptError(String),

    #[error("HTML extraction error: {0}")]
    HtmlExtractionError(String),
}
