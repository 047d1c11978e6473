use super::manager::BrowserError;
use super::{dom, js_string, Driver, Node, WaitCondition};
use headless_chrome::{Browser, Tab};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// One headless Chrome process driving a single tab.
///
/// Element lookups run against a snapshot of the live DOM, so client-side
/// page changes are visible as soon as they are rendered.
pub struct ChromeSession {
    // Dropping the browser shuts the Chrome process down
    _browser: Browser,
    tab: Arc<Tab>,
    poll_interval: Duration,
}

impl ChromeSession {
    pub fn new(browser: Browser, tab: Arc<Tab>, poll_interval: Duration) -> Self {
        Self {
            _browser: browser,
            tab,
            poll_interval,
        }
    }

    /// Get the HTML content of the page
    pub fn get_html(&self) -> Result<String, BrowserError> {
        self.tab
            .get_content()
            .map_err(|e| BrowserError::HtmlExtractionError(e.to_string()))
    }

    /// Evaluate a script expected to return a boolean
    fn evaluate_bool(&self, script: &str) -> Result<bool, BrowserError> {
        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(e.to_string()))?;

        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

impl Driver for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationError(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationError(format!("Navigation timeout for {}: {}", url, e)))?;

        Ok(())
    }

    fn wait_until(&mut self, condition: &WaitCondition, timeout: Duration) -> Result<(), BrowserError> {
        let script = condition.script();
        let start = Instant::now();
        let mut last_error = None;

        loop {
            // Evaluation errors while the page is still loading count as "not yet"
            match self.evaluate_bool(&script) {
                Ok(true) => return Ok(()),
                Ok(false) => last_error = None,
                Err(e) => last_error = Some(e),
            }

            if start.elapsed() > timeout {
                return Err(timeout_error(condition, last_error.as_ref()));
            }

            std::thread::sleep(self.poll_interval);
        }
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<Node>, BrowserError> {
        let html = self.get_html()?;
        dom::select(&html, selector)
    }

    fn click(&mut self, node: &Node) -> Result<(), BrowserError> {
        let script = format!(
            "(function() {{ const el = document.querySelectorAll({})[{}]; \
             if (!el) {{ return false; }} el.click(); return true; }})()",
            js_string(&node.selector),
            node.index
        );

        if self.evaluate_bool(&script)? {
            Ok(())
        } else {
            Err(BrowserError::ElementNotFound(format!(
                "{} (#{})",
                node.selector, node.index
            )))
        }
    }

    fn execute(&mut self, script: &str) -> Result<(), BrowserError> {
        self.tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::JavaScriptError(format!("{}: {}", script, e)))?;
        Ok(())
    }
}

/// Timeout for `condition`, carrying the evaluation error seen on the last poll
fn timeout_error(condition: &WaitCondition, last_error: Option<&BrowserError>) -> BrowserError {
    match last_error {
        Some(e) => BrowserError::Timeout(format!("{} (last error: {})", condition, e)),
        None => BrowserError::Timeout(condition.to_string()),
    }
}
