//! Detail page extraction
//!
//! One browser session visits every harvested link in order. A link whose
//! page does not load is skipped; there is no retry at this stage.

use crate::browser::{BrowserError, Driver, Launcher, WaitCondition};
use crate::helpers::join_texts;
use crate::metrics::RunMetrics;
use crate::models::{DetailRecord, LinkRecord, NO_ALTERNATE_NAME};
use log::{error, info, warn};
use std::time::Duration;

pub const NAME_SELECTOR: &str = "h1";
pub const AUTHOR_SELECTOR: &str = r#"a[href*="/tac-gia/"]"#;
pub const GENRE_SELECTOR: &str = r#".description a[href*="/theloai/"]"#;
pub const SUMMARY_SELECTOR: &str = ".detail .content";
pub const PAGE_VIEWS_SELECTOR: &str = "#PageViews";
pub const LIKE_COUNT_SELECTOR: &str = "#LikeCount";
pub const HIGHLIGHT_SELECTOR: &str = ".description span.color-red";

/// Split the highlighted spans of a detail page into `(status, another_name)`.
///
/// The site marks both the alternate names and the publication status in
/// red, status last. This positional rule is specific to that markup.
pub fn split_status_and_aliases(spans: &[String]) -> (String, String) {
    match spans.split_last() {
        None => (String::new(), NO_ALTERNATE_NAME.to_string()),
        Some((status, [])) => (status.trim().to_string(), NO_ALTERNATE_NAME.to_string()),
        Some((status, aliases)) => (
            status.trim().to_string(),
            join_texts(aliases.iter().map(String::as_str)),
        ),
    }
}

fn text_of<D: Driver>(driver: &mut D, selector: &str) -> Result<String, BrowserError> {
    Ok(driver
        .find(selector)?
        .map(|node| node.text.trim().to_string())
        .unwrap_or_default())
}

fn joined_texts_of<D: Driver>(driver: &mut D, selector: &str) -> Result<String, BrowserError> {
    let nodes = driver.find_all(selector)?;
    Ok(join_texts(nodes.iter().map(|n| n.text.as_str())))
}

/// Extract the fields of the detail page currently loaded in `driver`
pub fn extract_detail<D: Driver>(driver: &mut D, link: &str) -> Result<DetailRecord, BrowserError> {
    let name = driver
        .find(NAME_SELECTOR)?
        .ok_or_else(|| BrowserError::ElementNotFound(NAME_SELECTOR.to_string()))?
        .text;

    let spans: Vec<String> = driver
        .find_all(HIGHLIGHT_SELECTOR)?
        .into_iter()
        .map(|node| node.text)
        .collect();
    let (status, another_name) = split_status_and_aliases(&spans);

    let mut record = DetailRecord::for_link(link);
    record.name = name.trim().to_string();
    record.author = joined_texts_of(driver, AUTHOR_SELECTOR)?;
    record.genre = joined_texts_of(driver, GENRE_SELECTOR)?;
    record.summary = text_of(driver, SUMMARY_SELECTOR)?;
    record.page_views = text_of(driver, PAGE_VIEWS_SELECTOR)?;
    record.like_count = text_of(driver, LIKE_COUNT_SELECTOR)?;
    record.status = status;
    record.another_name = another_name;
    Ok(record)
}

/// Load one detail page and extract it
pub fn fetch_detail<D: Driver>(
    driver: &mut D,
    link: &str,
    wait_timeout: Duration,
) -> Result<DetailRecord, BrowserError> {
    driver.navigate(link)?;
    driver.wait_until(&WaitCondition::present(NAME_SELECTOR), wait_timeout)?;
    extract_detail(driver, link)
}

/// Fetch a detail record for every link, skipping the ones that fail
pub fn fetch_all_details<L: Launcher>(
    launcher: &mut L,
    links: &[LinkRecord],
    wait_timeout: Duration,
    metrics: &mut RunMetrics,
) -> Vec<DetailRecord> {
    if links.is_empty() {
        return Vec::new();
    }

    let mut session = match launcher.launch() {
        Ok(session) => session,
        Err(e) => {
            error!("Could not start browser for detail pages: {}", e);
            for record in links {
                metrics.record_skipped_detail(&record.link);
            }
            return Vec::new();
        }
    };

    let mut details = Vec::with_capacity(links.len());
    for (i, record) in links.iter().enumerate() {
        match fetch_detail(&mut session, &record.link, wait_timeout) {
            Ok(detail) => {
                metrics.record_detail();
                details.push(detail);
            }
            Err(e) => {
                warn!("Error fetching details for {}: {}", record.link, e);
                metrics.record_skipped_detail(&record.link);
            }
        }

        if (i + 1) % 100 == 0 {
            info!("Details progress: {}/{}", i + 1, links.len());
        }
    }

    info!("Fetched {} of {} detail pages", details.len(), links.len());
    details
}
