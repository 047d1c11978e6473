use crate::browser::BrowserConfig;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_URL: &str = "https://blogtruyenmoi.com/danhsach/tatca";
pub const TOTAL_PAGES: u32 = 1301;
pub const CHUNK_SIZE: u32 = 50;
pub const MAX_RETRIES: usize = 10;
pub const WAIT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Catalog listing page that exposes `LoadListMangaPage(n)`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Number of listing pages to harvest, starting from page 1
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    /// Pages handled per browser session
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u32,

    /// Failed session setups tolerated per chunk before it is given up
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Ceiling for every wait condition, in seconds
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Directory receiving the exported files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub browser: BrowserConfig,
}

fn default_base_url() -> String { BASE_URL.to_string() }
fn default_total_pages() -> u32 { TOTAL_PAGES }
fn default_chunk_size() -> u32 { CHUNK_SIZE }
fn default_max_retries() -> usize { MAX_RETRIES }
fn default_wait_timeout() -> u64 { WAIT_TIMEOUT_SECS }
fn default_output_dir() -> String { ".".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            total_pages: TOTAL_PAGES,
            chunk_size: CHUNK_SIZE,
            max_retries: MAX_RETRIES,
            wait_timeout_secs: WAIT_TIMEOUT_SECS,
            output_dir: default_output_dir(),
            browser: BrowserConfig::default(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str::<Config>(&content) {
                    Ok(cfg) => return cfg,
                    Err(e) => log::warn!("Ignoring invalid {}: {}", path.display(), e),
                },
                Err(e) => log::warn!("Could not read {}: {}", path.display(), e),
            }
        }
        Self::default()
    }

    /// Get wait timeout as Duration
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        Path::new(&self.output_dir).join(file_name)
    }
}
