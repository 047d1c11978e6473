use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder stored in `another_name` when a title lists no alternate names
pub const NO_ALTERNATE_NAME: &str = "Khong co ten khac";

/// A title harvested from the catalog listing
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    pub title: String,
    /// Always absolute (scheme + host)
    pub link: String,
}

/// Metadata scraped from a title's detail page.
///
/// Counters are kept as the display strings shown on the page. Field order
/// here is the column order of the exported spreadsheet.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    pub name: String,
    pub author: String,
    pub genre: String,
    pub summary: String,
    pub page_views: String,
    pub like_count: String,
    pub status: String,
    pub another_name: String,
    pub link: String,
}

impl DetailRecord {
    /// An empty record tied to `link`, with every field at its default
    pub fn for_link(link: &str) -> Self {
        Self {
            name: String::new(),
            author: String::new(),
            genre: String::new(),
            summary: String::new(),
            page_views: String::new(),
            like_count: String::new(),
            status: String::new(),
            another_name: NO_ALTERNATE_NAME.to_string(),
            link: link.to_string(),
        }
    }
}

/// Inclusive range of listing pages handled by one browser session
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PageChunk {
    pub start_page: u32,
    pub end_page: u32,
}

impl PageChunk {
    pub fn new(start_page: u32, end_page: u32) -> Self {
        debug_assert!(start_page <= end_page);
        Self {
            start_page,
            end_page,
        }
    }

    /// Number of pages in the chunk
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start_page..=self.end_page).contains(&page)
    }
}

impl fmt::Display for PageChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_page, self.end_page)
    }
}
