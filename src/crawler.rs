//! Link harvesting over the paginated catalog listing
//!
//! The listing is split into fixed-size page chunks. Each chunk attempt gets
//! its own browser session; a failed session setup retries the whole chunk
//! with a new session, while a failure mid-pagination only cuts the chunk
//! short.

use crate::browser::{BrowserError, Driver, Launcher, WaitCondition};
use crate::config::Config;
use crate::helpers::{absolute_link, clean_title, load_page_script};
use crate::metrics::RunMetrics;
use crate::models::{LinkRecord, PageChunk};
use log::{error, info, warn};
use std::time::Duration;

pub const LINK_SELECTOR: &str = ".tiptip a";
pub const CURRENT_PAGE_SELECTOR: &str = ".current_page";

/// Pagination control that loads `page`
pub fn next_page_selector(page: u32) -> String {
    format!(
        r#"span.page > a[href="javascript:LoadListMangaPage({})"]"#,
        page
    )
}

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub base_url: String,
    pub max_retries: usize,
    pub wait_timeout: Duration,
}

impl From<&Config> for HarvestSettings {
    fn from(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
            wait_timeout: config.wait_timeout(),
        }
    }
}

/// Split pages `1..=total_pages` into consecutive chunks of `chunk_size`
pub fn plan_chunks(total_pages: u32, chunk_size: u32) -> Vec<PageChunk> {
    let chunk_size = chunk_size.max(1);
    (0..total_pages)
        .step_by(chunk_size as usize)
        .map(|offset| {
            PageChunk::new(
                offset + 1,
                offset.saturating_add(chunk_size).min(total_pages),
            )
        })
        .collect()
}

/// Title/link pairs visible on the current listing page
pub fn scrape_links<D: Driver>(driver: &mut D, base_url: &str) -> Result<Vec<LinkRecord>, BrowserError> {
    let anchors = driver.find_all(LINK_SELECTOR)?;

    Ok(anchors
        .iter()
        .filter_map(|anchor| {
            let link = absolute_link(base_url, anchor.attr("href")?)?;
            Some(LinkRecord {
                title: clean_title(&anchor.text),
                link,
            })
        })
        .collect())
}

/// Load the listing and jump straight to `page`
fn open_listing<D: Driver>(driver: &mut D, settings: &HarvestSettings, page: u32) -> Result<(), BrowserError> {
    driver.navigate(&settings.base_url)?;
    driver.wait_until(&WaitCondition::DocumentReady, settings.wait_timeout)?;
    driver.execute(&load_page_script(page))?;
    driver.wait_until(
        &WaitCondition::text(CURRENT_PAGE_SELECTOR, page.to_string()),
        settings.wait_timeout,
    )
}

/// Scrape the current page, then move to the next one.
///
/// Returns the new page number, or `None` once the chunk is finished.
fn turn_page<D: Driver>(
    driver: &mut D,
    settings: &HarvestSettings,
    current: u32,
    chunk: PageChunk,
    links: &mut Vec<LinkRecord>,
    metrics: &mut RunMetrics,
) -> Result<Option<u32>, BrowserError> {
    let page_links = scrape_links(driver, &settings.base_url)?;
    metrics.record_page(page_links.len());
    links.extend(page_links);

    let next = current + 1;
    if !chunk.contains(next) {
        return Ok(None);
    }

    let Some(button) = driver.find(&next_page_selector(next))? else {
        info!("No page after {} in chunk {}", current, chunk);
        metrics.record_early_stop();
        return Ok(None);
    };

    driver.click(&button)?;
    driver.wait_until(
        &WaitCondition::text(CURRENT_PAGE_SELECTOR, next.to_string()),
        settings.wait_timeout,
    )?;

    Ok(Some(next))
}

/// Walk the chunk's pages; an error stops the walk but keeps what was scraped
fn paginate<D: Driver>(
    driver: &mut D,
    settings: &HarvestSettings,
    chunk: PageChunk,
    metrics: &mut RunMetrics,
) -> Vec<LinkRecord> {
    let mut links = Vec::new();
    let mut current = chunk.start_page;

    loop {
        match turn_page(driver, settings, current, chunk, &mut links, metrics) {
            Ok(Some(next)) => current = next,
            Ok(None) => break,
            Err(e) => {
                warn!("Error on page {}: {}", current, e);
                metrics.record_early_stop();
                break;
            }
        }
    }

    links
}

/// One attempt: a fresh session, closed again when this returns
fn attempt_chunk<L: Launcher>(
    launcher: &mut L,
    settings: &HarvestSettings,
    chunk: PageChunk,
    metrics: &mut RunMetrics,
) -> Result<Vec<LinkRecord>, BrowserError> {
    let mut session = launcher.launch()?;
    open_listing(&mut session, settings, chunk.start_page)?;
    Ok(paginate(&mut session, settings, chunk, metrics))
}

/// Harvest one chunk, retrying session setup up to `max_retries` times.
///
/// A chunk that never gets past setup yields an empty list.
pub fn harvest_chunk<L: Launcher>(
    launcher: &mut L,
    settings: &HarvestSettings,
    chunk: PageChunk,
    metrics: &mut RunMetrics,
) -> Vec<LinkRecord> {
    let max_attempts = settings.max_retries.max(1);

    for attempt in 1..=max_attempts {
        metrics.record_chunk_attempt(attempt);

        match attempt_chunk(launcher, settings, chunk, metrics) {
            Ok(links) => {
                info!("Chunk {}: {} links", chunk, links.len());
                return links;
            }
            Err(e) => {
                error!("Error fetching chunk {}: {}", chunk, e);
                if attempt < max_attempts {
                    warn!("Retrying chunk {} ({}/{})", chunk, attempt, max_attempts);
                }
            }
        }
    }

    error!("Failed to fetch chunk {} after {} retries", chunk, max_attempts);
    metrics.record_chunk_failure(chunk);
    Vec::new()
}

/// Harvest every chunk in order. Links are concatenated as found, duplicates included.
pub fn harvest_all<L: Launcher>(
    launcher: &mut L,
    settings: &HarvestSettings,
    chunks: &[PageChunk],
    metrics: &mut RunMetrics,
) -> Vec<LinkRecord> {
    metrics.chunks_planned += chunks.len();
    let mut all_links = Vec::new();

    for chunk in chunks {
        info!("Fetching pages {} ({} pages)", chunk, chunk.page_count());
        all_links.extend(harvest_chunk(launcher, settings, *chunk, metrics));
    }

    info!("Harvested {} links from {} chunks", all_links.len(), chunks.len());
    all_links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_chunks_default_catalog() {
        let chunks = plan_chunks(1301, 50);
        assert_eq!(chunks.len(), 27);
        assert_eq!(chunks[0], PageChunk::new(1, 50));
        assert_eq!(chunks[1], PageChunk::new(51, 100));
        assert_eq!(chunks[26], PageChunk::new(1301, 1301));
    }

    #[test]
    fn test_plan_chunks_exact_multiple() {
        assert_eq!(
            plan_chunks(100, 50),
            vec![PageChunk::new(1, 50), PageChunk::new(51, 100)]
        );
    }

    #[test]
    fn test_plan_chunks_edge_sizes() {
        assert!(plan_chunks(0, 50).is_empty());
        assert_eq!(plan_chunks(3, 0).len(), 3);
        assert_eq!(plan_chunks(3, 10), vec![PageChunk::new(1, 3)]);
    }

    #[test]
    fn test_next_page_selector() {
        assert_eq!(
            next_page_selector(2),
            r#"span.page > a[href="javascript:LoadListMangaPage(2)"]"#
        );
    }

    #[test]
    fn test_settings_from_config() {
        let settings = HarvestSettings::from(&Config::default());
        assert_eq!(settings.max_retries, 10);
        assert_eq!(settings.wait_timeout, Duration::from_secs(60));
    }
}
