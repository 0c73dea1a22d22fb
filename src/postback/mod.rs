//! # Postback emulation
//!
//! The catalog is a server-rendered form: every request has to echo back the
//! hidden fields the server issued in its previous response, or the server
//! treats the interaction as a new (and invalid) session. [`PostbackClient`]
//! owns that state and keeps it current across a chain of requests.
//!
//! ## Ordering
//!
//! Requests must follow the order the server expects (type, then brand, then
//! model, then year). Every call takes `&mut self`, so one client can only
//! ever have a single request in flight. Independent traversals need
//! independent clients.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};
use crate::models::VehicleType;
use crate::session::SessionState;
use crate::traits::Transport;

pub struct PostbackClient<T> {
    transport: T,
    base_url: String,
    session: SessionState,
}

impl<T: Transport> PostbackClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            session: SessionState::new(),
        }
    }

    /// Sends one postback for `vtype` and returns the raw response body.
    ///
    /// On success the session state is replaced with the hidden fields of
    /// the response before the body is handed back. A non-success status is
    /// reported as [`CatalogError::RequestFailed`] and leaves the session
    /// untouched.
    pub async fn perform(
        &mut self,
        vtype: VehicleType,
        extra_fields: BTreeMap<String, String>,
    ) -> Result<String> {
        let query = vtype.query_params();
        let form = self.build_form(extra_fields);

        info!(
            "Posting {} form fields for {} ({} from session state)",
            form.len(),
            vtype,
            self.session.len()
        );

        let response = self.transport.post(&self.base_url, query, &form).await?;

        if !response.is_success() {
            warn!("Postback for {} failed with status {}", vtype, response.status);
            return Err(CatalogError::RequestFailed {
                status: response.status,
                url: self.base_url.clone(),
            });
        }

        let hidden = self.session.merge(&response.body)?;
        debug!("Captured {} hidden fields from response", hidden);

        Ok(response.body)
    }

    /// Overlays the session snapshot on `extra_fields`. Session values win
    /// on collision.
    pub fn build_form(
        &self,
        mut extra_fields: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        extra_fields.extend(self.session.snapshot());
        extra_fields
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Builds a form field map from string pairs.
pub fn form_fields<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, select_page};

    const URL: &str = "http://fipe.test/default.aspx";

    #[tokio::test]
    async fn session_values_win_over_extra_fields() {
        let page = select_page(&[("a", "1")], "ddlMarca", &[]);
        let mut client = PostbackClient::new(MockTransport::new().ok(page), URL);
        client.perform(VehicleType::Car, BTreeMap::new()).await.unwrap();

        let form = client.build_form(form_fields([("a", "2"), ("b", "3")]));
        assert_eq!(form, form_fields([("a", "1"), ("b", "3")]));
    }

    #[tokio::test]
    async fn sends_type_params_and_replays_previous_state() {
        let first = select_page(&[("__VIEWSTATE", "vs1")], "ddlMarca", &[]);
        let second = select_page(&[("__VIEWSTATE", "vs2")], "ddlModelo", &[]);
        let transport = MockTransport::new().ok(first).ok(second);
        let mut client = PostbackClient::new(transport, URL);

        client
            .perform(VehicleType::Motorbike, form_fields([("ddlMarca", "")]))
            .await
            .unwrap();
        client
            .perform(VehicleType::Motorbike, form_fields([("ddlMarca", "21")]))
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].url, URL);
        assert_eq!(
            requests[0].query,
            vec![("p".to_string(), "52".to_string()), ("v".to_string(), "m".to_string())]
        );
        assert_eq!(requests[0].form, form_fields([("ddlMarca", "")]));

        assert_eq!(
            requests[1].form,
            form_fields([("__VIEWSTATE", "vs1"), ("ddlMarca", "21")])
        );
        assert_eq!(client.session().get("__VIEWSTATE"), Some("vs2"));
    }

    #[tokio::test]
    async fn returns_body_unchanged() {
        let page = select_page(&[("__VIEWSTATE", "x")], "ddlMarca", &[("Fiat", "21")]);
        let mut client = PostbackClient::new(MockTransport::new().ok(page.clone()), URL);

        let body = client.perform(VehicleType::Car, BTreeMap::new()).await.unwrap();
        assert_eq!(body, page);
    }

    #[tokio::test]
    async fn non_success_status_fails_without_touching_session() {
        let page = select_page(&[("__VIEWSTATE", "keep")], "ddlMarca", &[]);
        let transport = MockTransport::new().ok(page).respond(500, "Server Error");
        let mut client = PostbackClient::new(transport, URL);

        client.perform(VehicleType::Car, BTreeMap::new()).await.unwrap();
        let err = client.perform(VehicleType::Car, BTreeMap::new()).await.unwrap_err();

        assert!(matches!(err, CatalogError::RequestFailed { status: 500, .. }));
        assert!(err.is_request_failure());
        assert_eq!(client.session().get("__VIEWSTATE"), Some("keep"));
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test]
    async fn clear_session_drops_state_from_next_request() {
        let page = select_page(&[("__VIEWSTATE", "vs1")], "ddlMarca", &[]);
        let transport = MockTransport::new().ok(page.clone()).ok(page);
        let mut client = PostbackClient::new(transport, URL);

        client.perform(VehicleType::Truck, BTreeMap::new()).await.unwrap();
        client.clear_session();
        client.perform(VehicleType::Truck, BTreeMap::new()).await.unwrap();

        assert!(client.transport().last_request().form.is_empty());
    }
}
