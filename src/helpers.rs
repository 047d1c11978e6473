//! Helper functions shared by the harvester and the detail fetcher
//!
//! # Examples
//!
//! ```
//! use manga_catalog_scraper::helpers::{absolute_link, clean_title};
//!
//! let link = absolute_link("https://blogtruyenmoi.com/danhsach/tatca", "/123/one-piece");
//! assert_eq!(link.as_deref(), Some("https://blogtruyenmoi.com/123/one-piece"));
//!
//! assert_eq!(clean_title("  One Piece: "), "One Piece");
//! ```

use url::Url;

/// Resolve `href` against `base`, returning an absolute http(s) URL.
///
/// Already-absolute links are returned as given.
pub fn absolute_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(href) {
        return url.has_host().then(|| href.to_string());
    }
    let base = Url::parse(base).ok()?;
    let joined = base.join(href).ok()?;
    joined.has_host().then(|| joined.to_string())
}

/// Listing titles are rendered as `Name:`; strip whitespace and trailing colons
pub fn clean_title(text: &str) -> String {
    text.trim().trim_end_matches(':').to_string()
}

/// Join trimmed texts with `", "`, the way multi-valued fields are exported
pub fn join_texts<'a, I>(texts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Page-jump call understood by the listing page
pub fn load_page_script(page: u32) -> String {
    format!("LoadListMangaPage({})", page)
}

/// Page number requested by a `LoadListMangaPage(n)` call or `javascript:` href
pub fn parse_load_page_script(script: &str) -> Option<u32> {
    script
        .trim()
        .trim_start_matches("javascript:")
        .strip_prefix("LoadListMangaPage(")?
        .trim_end_matches(';')
        .strip_suffix(')')?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://blogtruyenmoi.com/danhsach/tatca";

    #[test]
    fn test_absolute_link_root_relative() {
        assert_eq!(
            absolute_link(BASE, "/30591/kimetsu").as_deref(),
            Some("https://blogtruyenmoi.com/30591/kimetsu")
        );
    }

    #[test]
    fn test_absolute_link_keeps_absolute() {
        assert_eq!(
            absolute_link(BASE, "https://other.example/x?y=1").as_deref(),
            Some("https://other.example/x?y=1")
        );
    }

    #[test]
    fn test_absolute_link_rejects_empty_and_hostless() {
        assert_eq!(absolute_link(BASE, "   "), None);
        assert_eq!(absolute_link(BASE, "javascript:void(0)"), None);
        assert_eq!(absolute_link("not a url", "/x"), None);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Naruto:"), "Naruto");
        assert_eq!(clean_title("  Re:Zero  "), "Re:Zero");
        assert_eq!(clean_title("Title::"), "Title");
    }

    #[test]
    fn test_join_texts() {
        assert_eq!(join_texts(vec![" A ", "B"]), "A, B");
        assert_eq!(join_texts(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_load_page_script() {
        assert_eq!(load_page_script(51), "LoadListMangaPage(51)");
        assert_eq!(parse_load_page_script("LoadListMangaPage(51)"), Some(51));
        assert_eq!(parse_load_page_script("javascript:LoadListMangaPage(7)"), Some(7));
        assert_eq!(parse_load_page_script("LoadListMangaPage(7);"), Some(7));
        assert_eq!(parse_load_page_script("alert(1)"), None);
    }
}
