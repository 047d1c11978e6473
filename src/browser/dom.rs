//! Queries over a snapshot of the page HTML
//!
//! The live session and the test fake both resolve selectors here, so they
//! agree on what a node's text and attributes are.

use super::{BrowserError, Node, WaitCondition};
use ::scraper::{ElementRef, Html, Selector};

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector(format!("{}: {}", selector, e)))
}

/// Text of an element as a reader sees it: each line trimmed, blank lines dropped
pub fn visible_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every element of `html` matching `selector`, in document order
pub fn select(html: &str, selector: &str) -> Result<Vec<Node>, BrowserError> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);

    Ok(document
        .select(&parsed)
        .enumerate()
        .map(|(index, element)| Node {
            selector: selector.to_string(),
            index,
            text: visible_text(element),
            attributes: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        })
        .collect())
}

/// Whether `condition` holds for a fully loaded `html` snapshot
pub fn condition_holds(html: &str, condition: &WaitCondition) -> Result<bool, BrowserError> {
    match condition {
        WaitCondition::DocumentReady => Ok(true),
        WaitCondition::ElementPresent(selector) => Ok(!select(html, selector)?.is_empty()),
        WaitCondition::ElementText { selector, text } => Ok(select(html, selector)?
            .first()
            .map(|node| node.text == *text)
            .unwrap_or(false)),
    }
}
