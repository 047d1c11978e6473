// Library interface for manga_catalog_scraper
// This allows tests and the binary to share the scraper components

pub mod browser;
pub mod config;
pub mod crawler;
pub mod details;
pub mod export;
pub mod helpers;
pub mod logging;
pub mod metrics;
pub mod models;
