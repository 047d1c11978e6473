//! Counters for a single scraper run
//!
//! Tracks chunk attempts, retries, harvested pages and skipped detail pages
//! so the end of a run can report what was lost.

use crate::models::PageChunk;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub chunks_planned: usize,
    pub chunk_attempts: u64,
    pub chunk_retries: u64,
    pub failed_chunks: Vec<PageChunk>,
    pub pages_scraped: u64,
    pub pages_stopped_early: u64,
    pub links_harvested: u64,
    pub details_fetched: u64,
    pub details_skipped: Vec<String>,
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl RunMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            chunks_planned: 0,
            chunk_attempts: 0,
            chunk_retries: 0,
            failed_chunks: Vec::new(),
            pages_scraped: 0,
            pages_stopped_early: 0,
            links_harvested: 0,
            details_fetched: 0,
            details_skipped: Vec::new(),
        }
    }

    /// Share of planned chunks that produced results, in percent
    pub fn chunk_success_rate(&self) -> f64 {
        if self.chunks_planned == 0 {
            0.0
        } else {
            let ok = self.chunks_planned.saturating_sub(self.failed_chunks.len());
            (ok as f64 / self.chunks_planned as f64) * 100.0
        }
    }

    pub fn record_chunk_attempt(&mut self, attempt: usize) {
        self.chunk_attempts += 1;
        if attempt > 1 {
            self.chunk_retries += 1;
        }
    }

    pub fn record_chunk_failure(&mut self, chunk: PageChunk) {
        self.failed_chunks.push(chunk);
    }

    pub fn record_page(&mut self, links: usize) {
        self.pages_scraped += 1;
        self.links_harvested += links as u64;
    }

    pub fn record_early_stop(&mut self) {
        self.pages_stopped_early += 1;
    }

    pub fn record_detail(&mut self) {
        self.details_fetched += 1;
    }

    pub fn record_skipped_detail(&mut self, link: &str) {
        self.details_skipped.push(link.to_string());
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Log a human readable summary of the run
    pub fn log_summary(&self) {
        let elapsed = self
            .finished_at
            .unwrap_or_else(Utc::now)
            .signed_duration_since(self.started_at);

        log::info!("=== Run summary ({}s) ===", elapsed.num_seconds());
        log::info!(
            "Chunks: {} planned, {} attempts, {} retries, {} failed ({:.1}% ok)",
            self.chunks_planned,
            self.chunk_attempts,
            self.chunk_retries,
            self.failed_chunks.len(),
            self.chunk_success_rate()
        );
        for chunk in &self.failed_chunks {
            log::warn!("  failed chunk: pages {}", chunk);
        }
        log::info!(
            "Pages: {} scraped, {} chunks stopped early; {} links harvested",
            self.pages_scraped,
            self.pages_stopped_early,
            self.links_harvested
        );
        log::info!(
            "Details: {} fetched, {} skipped",
            self.details_fetched,
            self.details_skipped.len()
        );
    }
}
