use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::error::Result;
use crate::traits::{Transport, TransportResponse};

/// Production transport over a pooled `reqwest` client
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse> {
        let response = self.client.post(url).query(query).form(form).send().await?;

        let status = response.status();
        debug!("POST {} -> {}", response.url(), status);

        let body = response.text().await?;
        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}
