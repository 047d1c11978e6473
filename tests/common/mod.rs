//! In-memory catalog site used to drive the harvester and fetcher without Chrome
#![allow(dead_code)]

use manga_catalog_scraper::browser::{dom, BrowserError, Driver, Launcher, Node, WaitCondition};
use manga_catalog_scraper::helpers::parse_load_page_script;
use std::collections::HashMap;
use std::time::Duration;

pub const BASE_URL: &str = "https://blogtruyenmoi.com/danhsach/tatca";

/// Listing pages (each a list of `(title, href)`) plus detail pages keyed by URL
#[derive(Clone, Default)]
pub struct FakeSite {
    pub pages: Vec<Vec<(String, String)>>,
    pub details: HashMap<String, String>,
    /// Page numbers whose "next page" control is missing
    pub missing_next: Vec<u32>,
    /// Page numbers whose scrape fails
    pub broken_pages: Vec<u32>,
}

impl FakeSite {
    pub fn with_pages(pages: Vec<Vec<(&str, &str)>>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|p| p.into_iter().map(|(t, h)| (t.to_string(), h.to_string())).collect())
                .collect(),
            ..Self::default()
        }
    }

    /// `count` pages, each with `per_page` titles linked root-relative
    pub fn numbered(count: u32, per_page: u32) -> Self {
        let pages = (1..=count)
            .map(|p| {
                (1..=per_page)
                    .map(|i| (format!("Title {}-{}:", p, i), format!("/{}{:02}/title-{}-{}", p, i, p, i)))
                    .collect()
            })
            .collect();
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn add_detail(&mut self, url: &str, html: &str) {
        self.details.insert(url.to_string(), html.to_string());
    }

    fn listing_html(&self, page: u32) -> String {
        let mut html = String::from("<html><body><div class=\"list\">");
        for (title, href) in &self.pages[(page - 1) as usize] {
            html.push_str(&format!(
                "<p><span class=\"tiptip\"><a href=\"{}\">{}</a></span></p>",
                href, title
            ));
        }
        html.push_str("</div><div class=\"paging\">");
        html.push_str(&format!("<span class=\"current_page\">{}</span>", page));
        let last = self.pages.len() as u32;
        if page < last && !self.missing_next.contains(&page) {
            for next in page + 1..=last.min(page + 3) {
                html.push_str(&format!(
                    "<span class=\"page\"><a href=\"javascript:LoadListMangaPage({})\">{}</a></span>",
                    next, next
                ));
            }
        }
        html.push_str("</div></body></html>");
        html
    }
}

enum Location {
    Blank,
    Listing(u32),
    Detail(String),
}

pub struct FakeSession {
    site: FakeSite,
    location: Location,
    pub log: Vec<String>,
}

impl FakeSession {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            location: Location::Blank,
            log: Vec::new(),
        }
    }

    fn html(&self) -> Result<String, BrowserError> {
        match &self.location {
            Location::Blank => Ok("<html><body></body></html>".to_string()),
            Location::Listing(page) => {
                if self.site.broken_pages.contains(page) {
                    Err(BrowserError::HtmlExtractionError(format!("page {} crashed", page)))
                } else {
                    Ok(self.site.listing_html(*page))
                }
            }
            Location::Detail(url) => Ok(self.site.details[url].clone()),
        }
    }

    fn load_page(&mut self, page: u32) -> Result<(), BrowserError> {
        if !matches!(self.location, Location::Listing(_)) {
            return Err(BrowserError::JavaScriptError("LoadListMangaPage is not defined".into()));
        }
        if page == 0 || page as usize > self.site.pages.len() {
            // The real site ignores out-of-range jumps
            return Ok(());
        }
        self.location = Location::Listing(page);
        Ok(())
    }
}

impl Driver for FakeSession {
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.log.push(format!("navigate {}", url));
        if url == BASE_URL {
            self.location = Location::Listing(1);
            Ok(())
        } else if self.site.details.contains_key(url) {
            self.location = Location::Detail(url.to_string());
            Ok(())
        } else {
            Err(BrowserError::NavigationError(format!("404 for {}", url)))
        }
    }

    fn wait_until(&mut self, condition: &WaitCondition, _timeout: Duration) -> Result<(), BrowserError> {
        if dom::condition_holds(&self.html()?, condition)? {
            Ok(())
        } else {
            Err(BrowserError::Timeout(condition.to_string()))
        }
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<Node>, BrowserError> {
        dom::select(&self.html()?, selector)
    }

    fn click(&mut self, node: &Node) -> Result<(), BrowserError> {
        self.log.push(format!("click {}", node.text));
        let href = node.attr("href").unwrap_or_default().to_string();
        match parse_load_page_script(&href) {
            Some(page) => self.load_page(page),
            None => Err(BrowserError::JavaScriptError(format!("cannot follow {}", href))),
        }
    }

    fn execute(&mut self, script: &str) -> Result<(), BrowserError> {
        self.log.push(format!("execute {}", script));
        match parse_load_page_script(script) {
            Some(page) => self.load_page(page),
            None => Err(BrowserError::JavaScriptError(format!("unknown script {}", script))),
        }
    }
}

/// Launcher whose first `failures` launches fail
pub struct FakeLauncher {
    pub site: FakeSite,
    pub failures: usize,
    pub launches: usize,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            failures: 0,
            launches: 0,
        }
    }

    pub fn failing(site: FakeSite, failures: usize) -> Self {
        Self {
            failures,
            ..Self::new(site)
        }
    }
}

impl Launcher for FakeLauncher {
    type Session = FakeSession;

    fn launch(&mut self) -> Result<FakeSession, BrowserError> {
        self.launches += 1;
        if self.launches <= self.failures {
            return Err(BrowserError::InitializationError(format!(
                "chrome crashed (launch {})",
                self.launches
            )));
        }
        Ok(FakeSession::new(self.site.clone()))
    }
}

pub fn detail_page(name: &str, authors: &[&str], genres: &[&str], summary: &str, spans: &[&str]) -> String {
    let authors: String = authors
        .iter()
        .map(|a| format!("<a href=\"/tac-gia/{}\">{}</a>", a.to_lowercase(), a))
        .collect();
    let genres: String = genres
        .iter()
        .map(|g| format!("<a href=\"/theloai/{}\">{}</a>", g.to_lowercase(), g))
        .collect();
    let spans: String = spans
        .iter()
        .map(|s| format!("<p><span class=\"color-red\">{}</span></p>", s))
        .collect();
    format!(
        r#"<html><body>
        <h1 class="entry-title"> {name} </h1>
        <div class="description">
          <p>Tác giả: {authors}</p>
          <p>Thể loại: {genres}</p>
          {spans}
        </div>
        <div class="detail"><div class="content">{summary}</div></div>
        <span id="PageViews">1.234.567</span>
        <span id="LikeCount">8.910</span>
        </body></html>"#
    )
}
