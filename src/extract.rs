//! Owned element extraction over `scraper`
//!
//! `scraper::Html` is not `Send`, so documents never leave this module:
//! every call parses, selects and returns owned [`Element`]s.

use scraper::{Html, Selector};
use tracing::debug;

use crate::error::{CatalogError, Result};

/// A matched element, detached from its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Concatenated descendant text, trimmed
    pub text: String,
    /// Attributes in document order
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| CatalogError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Selects every element matching `selector`.
///
/// Elements whose raw text contains any of `skip_matches` are dropped.
pub fn select(html: &str, selector: &str, skip_matches: &[&str]) -> Result<Vec<Element>> {
    let parsed = parse_selector(selector)?;
    let document = Html::parse_document(html);

    let mut elements = Vec::new();
    for el in document.select(&parsed) {
        let raw_text = el.text().collect::<String>();

        if skip_matches.iter().any(|skip| !skip.is_empty() && raw_text.contains(skip)) {
            debug!("Skipping placeholder element: {}", raw_text.trim());
            continue;
        }

        let attrs = el
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        elements.push(Element {
            text: raw_text.trim().to_string(),
            attrs,
        });
    }

    Ok(elements)
}
