use log::{error, info};
use manga_catalog_scraper::browser::ChromeLauncher;
use manga_catalog_scraper::config::Config;
use manga_catalog_scraper::crawler::{self, HarvestSettings};
use manga_catalog_scraper::details;
use manga_catalog_scraper::export::{save_to_excel, save_to_json, ExportError};
use manga_catalog_scraper::logging;
use manga_catalog_scraper::metrics::RunMetrics;
use std::process::ExitCode;

const LINKS_FILE: &str = "manga_links.json";
const DETAILS_FILE: &str = "manga_details.json";
const DETAILS_SHEET: &str = "manga_details.xlsx";

fn report(result: Result<(), ExportError>, failed: &mut bool) {
    if let Err(e) = result {
        error!("Export failed: {}", e);
        *failed = true;
    }
}

fn main() -> ExitCode {
    logging::init();

    let cfg = Config::load();
    info!("Catalog: {}", cfg.base_url);
    info!("  Pages: {} in chunks of {}", cfg.total_pages, cfg.chunk_size);
    info!("  Max retries per chunk: {}", cfg.max_retries);
    info!("  Wait timeout: {}s", cfg.wait_timeout_secs);

    let mut metrics = RunMetrics::new();
    let mut launcher = ChromeLauncher::new(cfg.browser.clone(), cfg.wait_timeout());
    let mut export_failed = false;

    let settings = HarvestSettings::from(&cfg);
    let chunks = crawler::plan_chunks(cfg.total_pages, cfg.chunk_size);
    let links = crawler::harvest_all(&mut launcher, &settings, &chunks, &mut metrics);
    report(save_to_json(&cfg.output_path(LINKS_FILE), &links), &mut export_failed);

    let manga_details = details::fetch_all_details(&mut launcher, &links, cfg.wait_timeout(), &mut metrics);
    report(save_to_json(&cfg.output_path(DETAILS_FILE), &manga_details), &mut export_failed);
    report(save_to_excel(&cfg.output_path(DETAILS_SHEET), &manga_details), &mut export_failed);

    metrics.finish();
    metrics.log_summary();

    if export_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
