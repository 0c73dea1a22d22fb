//! Hidden form state issued by the server on every postback

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::Result;
use crate::extract;

pub const HIDDEN_FIELDS_SELECTOR: &str = r#"#form1 input[type="hidden"]"#;

/// Name to value pairs of the hidden inputs from the last response.
///
/// The server's postback state is always complete, so a merge replaces the
/// previous contents instead of adding to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    fields: BTreeMap<String, String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cache with the hidden fields found in `html` and
    /// returns how many were found. Finding none leaves the cache empty.
    pub fn merge(&mut self, html: &str) -> Result<usize> {
        let inputs = extract::select(html, HIDDEN_FIELDS_SELECTOR, &[])?;

        self.fields.clear();
        for input in inputs {
            let Some(name) = input.attr("name") else {
                continue;
            };
            let value = input.attr("value").unwrap_or_default();
            self.fields.insert(name.to_string(), value.to_string());
        }

        debug!("Session state now holds {} hidden fields", self.fields.len());
        Ok(self.fields.len())
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.fields.clone()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
