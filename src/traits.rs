//! Seams between the postback client and the outside world

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;

/// Status and body of one POST round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP boundary used by [`crate::postback::PostbackClient`]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a single form POST
    ///
    /// # Arguments
    /// * `url` - The catalog endpoint
    /// * `query` - Query string parameters
    /// * `form` - Urlencoded form body
    ///
    /// # Returns
    /// * `Result<TransportResponse>` - Any status the server answered with.
    ///   Only connection level failures are errors here.
    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse>;
}
