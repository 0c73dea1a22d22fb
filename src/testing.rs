//! Scripted transport and page builders for unit tests

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{Transport, TransportResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub form: BTreeMap<String, String>,
}

/// Replays canned responses in order and records every request.
///
/// A `None` entry fails the request before any response arrives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Option<TransportResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(Some(TransportResponse {
            status,
            body: body.into(),
        }));
        self
    }

    pub fn fail_connection(self) -> Self {
        self.responses.lock().unwrap().push_back(None);
        self
    }

    pub fn ok(self, body: impl Into<String>) -> Self {
        self.respond(200, body)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request was issued")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(
        &self,
        url: &str,
        query: &[(&str, &str)],
        form: &BTreeMap<String, String>,
    ) -> Result<TransportResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            form: form.clone(),
        });

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("mock transport ran out of responses");

        match next {
            Some(response) => Ok(response),
            None => Err(connection_error().into()),
        }
    }
}

/// A real `reqwest::Error`, raised before anything is sent.
fn connection_error() -> reqwest::Error {
    reqwest::Client::new()
        .post("not a url")
        .build()
        .expect_err("relative url must not build")
}

/// A catalog page with the given hidden fields and one `<select>`.
pub fn select_page(hidden: &[(&str, &str)], select_name: &str, options: &[(&str, &str)]) -> String {
    let inputs: String = hidden
        .iter()
        .map(|(name, value)| {
            format!(r#"<input type="hidden" name="{name}" id="{name}" value="{value}" />"#)
        })
        .collect();
    let options: String = options
        .iter()
        .map(|(text, value)| format!(r#"<option value="{value}">{text}</option>"#))
        .collect();

    format!(
        r#"<html><body><form id="form1" method="post">{inputs}
        <select name="{select_name}" id="{select_name}">{options}</select>
        </form></body></html>"#
    )
}

/// A price page with the given hidden fields and result spans.
pub fn result_page(hidden: &[(&str, &str)], spans: &[(&str, &str)]) -> String {
    let inputs: String = hidden
        .iter()
        .map(|(name, value)| format!(r#"<input type="hidden" name="{name}" value="{value}" />"#))
        .collect();
    let rows: String = spans
        .iter()
        .map(|(id, text)| format!(r#"<tr><td><span id="{id}">{text}</span></td></tr>"#))
        .collect();

    format!(
        r#"<html><body><form id="form1" method="post">{inputs}
        <div id="pnlResultado"><table>{rows}</table></div>
        </form></body></html>"#
    )
}
