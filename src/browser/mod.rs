//! Browser automation layer for the catalog scraper
//!
//! Harvesting and detail fetching only talk to the [`Driver`] trait, so they
//! can run against headless Chrome in production and an in-memory fake in
//! tests. Every session comes from a [`Launcher`] and closes when dropped.
//!
//! # Example
//!
//! ```no_run
//! use manga_catalog_scraper::browser::{BrowserConfig, ChromeLauncher, Driver, Launcher, WaitCondition};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut launcher = ChromeLauncher::new(BrowserConfig::default(), Duration::from_secs(60));
//! let mut session = launcher.launch()?;
//!
//! session.navigate("https://example.com")?;
//! session.wait_until(&WaitCondition::present("h1"), Duration::from_secs(10))?;
//! if let Some(heading) = session.find("h1")? {
//!     println!("{}", heading.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod manager;
pub mod session;

use std::fmt;
use std::time::Duration;

// Re-export main types for convenience
pub use config::BrowserConfig;
pub use manager::{BrowserError, ChromeLauncher};
pub use session::ChromeSession;

/// Snapshot of an element matched by a CSS selector.
///
/// `selector` and `index` locate the element again when it has to be
/// clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub selector: String,
    pub index: usize,
    pub text: String,
    pub attributes: Vec<(String, String)>,
}

impl Node {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Condition polled by [`Driver::wait_until`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// `document.readyState` is `complete`
    DocumentReady,
    /// At least one element matches the selector
    ElementPresent(String),
    /// The first match's trimmed text equals `text`
    ElementText { selector: String, text: String },
}

impl WaitCondition {
    pub fn present(selector: &str) -> Self {
        Self::ElementPresent(selector.to_string())
    }

    pub fn text(selector: &str, text: impl Into<String>) -> Self {
        Self::ElementText {
            selector: selector.to_string(),
            text: text.into(),
        }
    }

    /// JavaScript expression evaluating to `true` once the condition holds
    pub fn script(&self) -> String {
        match self {
            Self::DocumentReady => "document.readyState === 'complete'".to_string(),
            Self::ElementPresent(selector) => format!(
                "document.querySelector({}) !== null",
                js_string(selector)
            ),
            Self::ElementText { selector, text } => format!(
                "(function() {{ const el = document.querySelector({}); \
                 return el !== null && el.textContent.trim() === {}; }})()",
                js_string(selector),
                js_string(text)
            ),
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DocumentReady => write!(f, "document ready"),
            Self::ElementPresent(selector) => write!(f, "element {}", selector),
            Self::ElementText { selector, text } => write!(f, "text {:?} in {}", text, selector),
        }
    }
}

/// Quote a Rust string as a JavaScript string literal
pub(crate) fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

/// Minimal browser session used by the harvester and the detail fetcher
pub trait Driver {
    /// Load a URL and wait for the navigation to finish
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Block until `condition` holds, or fail with [`BrowserError::Timeout`]
    fn wait_until(&mut self, condition: &WaitCondition, timeout: Duration) -> Result<(), BrowserError>;

    /// First element matching `selector`, if any
    fn find(&mut self, selector: &str) -> Result<Option<Node>, BrowserError> {
        Ok(self.find_all(selector)?.into_iter().next())
    }

    /// Every element matching `selector`, in document order
    fn find_all(&mut self, selector: &str) -> Result<Vec<Node>, BrowserError>;

    /// Click an element previously returned by `find` or `find_all`
    fn click(&mut self, node: &Node) -> Result<(), BrowserError>;

    /// Run a script in the page
    fn execute(&mut self, script: &str) -> Result<(), BrowserError>;
}

/// Opens brand-new browser sessions
pub trait Launcher {
    type Session: Driver;

    fn launch(&mut self) -> Result<Self::Session, BrowserError>;
}
