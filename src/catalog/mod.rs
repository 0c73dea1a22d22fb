//! Cascading catalog queries: type → brand → model → year → price
//!
//! Each step posts the full ancestor chain of its input together with the
//! session state left behind by the previous step, then extracts typed
//! entities from the returned page.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::extract;
use crate::models::{
    PriceField, VehicleBrand, VehicleModel, VehiclePriceRecord, VehicleType, VehicleYear,
};
use crate::postback::{PostbackClient, form_fields};
use crate::session::SessionState;
use crate::traits::Transport;
use crate::transport::ReqwestTransport;

/// Prefixes of the "choose one" option every select starts with
pub const PLACEHOLDER_PREFIXES: &[&str] = &["Selecione ", "Select "];

pub const BRAND_OPTIONS: &str = r#"select[name="ddlMarca"] option"#;
pub const MODEL_OPTIONS: &str = r#"select[name="ddlModelo"] option"#;
pub const YEAR_OPTIONS: &str = r#"select[name="ddlAnoValor"] option"#;
pub const RESULT_SPANS: &str = "#pnlResultado table td span";

/// Catalog walker bound to one postback session
pub struct FipeCatalog<T> {
    client: PostbackClient<T>,
}

impl FipeCatalog<ReqwestTransport> {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::with_transport(transport, config.base_url.clone()))
    }
}

impl<T: Transport> FipeCatalog<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            client: PostbackClient::new(transport, base_url),
        }
    }

    /// The fixed vehicle type table
    pub fn vehicle_types(&self) -> Vec<(VehicleType, &'static str)> {
        VehicleType::ALL
            .into_iter()
            .map(|vtype| (vtype, vtype.label()))
            .collect()
    }

    /// Lists the brands of `vtype`, starting a fresh session chain.
    pub async fn list_brands(&mut self, vtype: VehicleType) -> Result<Vec<VehicleBrand>> {
        info!("Listing brands for {}", vtype);

        self.client.clear_session();
        let fields = form_fields([("ScriptManager1", "UdtMarca|ddlMarca"), ("ddlMarca", "")]);
        let body = self.client.perform(vtype, fields).await?;

        let brands: Vec<VehicleBrand> = self
            .options(&body, BRAND_OPTIONS)?
            .into_iter()
            .map(|(pk, brand)| VehicleBrand { pk, brand, vtype })
            .collect();

        info!("Found {} brands for {}", brands.len(), vtype);
        Ok(brands)
    }

    pub async fn list_models(&mut self, brand: &VehicleBrand) -> Result<Vec<VehicleModel>> {
        info!("Listing models for {} ({})", brand.brand, brand.pk);

        let fields = form_fields([
            ("ScriptManager1", "UdtMarca|ddlMarca"),
            ("ddlMarca", brand.pk.as_str()),
            ("ddlModelo", "0"),
        ]);
        let body = self.client.perform(brand.vtype, fields).await?;

        let models: Vec<VehicleModel> = self
            .options(&body, MODEL_OPTIONS)?
            .into_iter()
            .map(|(pk, model)| VehicleModel {
                pk,
                model,
                vbrand: brand.clone(),
            })
            .collect();

        info!("Found {} models for {}", models.len(), brand.brand);
        Ok(models)
    }

    pub async fn list_years(&mut self, model: &VehicleModel) -> Result<Vec<VehicleYear>> {
        info!("Listing years for {} ({})", model.model, model.pk);

        let fields = form_fields([
            ("ScriptManager1", "updModelo|ddlModelo"),
            ("ddlMarca", model.vbrand.pk.as_str()),
            ("ddlModelo", model.pk.as_str()),
        ]);
        let body = self.client.perform(model.vtype(), fields).await?;

        let years: Vec<VehicleYear> = self
            .options(&body, YEAR_OPTIONS)?
            .into_iter()
            .map(|(pk, label)| VehicleYear {
                pk,
                label,
                vmodel: model.clone(),
            })
            .collect();

        info!("Found {} years for {}", years.len(), model.model);
        Ok(years)
    }

    /// Fetches the price record of `year`.
    ///
    /// # Returns
    /// * `Ok(None)` - The results panel held no recognized field
    /// * `Err(CatalogError::IncompleteRecord)` - Only some fields were present
    pub async fn fetch_price_record(
        &mut self,
        year: &VehicleYear,
    ) -> Result<Option<VehiclePriceRecord>> {
        info!("Fetching price for {} {}", year.vmodel.model, year.label);

        let fields = form_fields([
            ("ScriptManager1", "updAnoValor|ddlAnoValor"),
            ("ddlMarca", year.vmodel.vbrand.pk.as_str()),
            ("ddlModelo", year.vmodel.pk.as_str()),
            ("ddlAnoValor", year.pk.as_str()),
        ]);
        let body = self.client.perform(year.vtype(), fields).await?;

        let mut found = HashMap::new();
        for span in extract::select(&body, RESULT_SPANS, &[])? {
            let Some(field) = span.attr("id").and_then(PriceField::from_label) else {
                continue;
            };
            found.insert(field, span.text);
        }

        assemble_record(found, year)
    }

    pub fn session(&self) -> &SessionState {
        self.client.session()
    }

    /// Forgets the current session chain.
    pub fn clear_session(&mut self) {
        self.client.clear_session();
    }

    pub fn transport(&self) -> &T {
        self.client.transport()
    }

    /// Key and name of every real option under `selector`.
    fn options(&self, body: &str, selector: &str) -> Result<Vec<(String, String)>> {
        let options: Vec<(String, String)> =
            extract::select(body, selector, PLACEHOLDER_PREFIXES)?
                .into_iter()
                .filter_map(|el| {
                    let key = el.attr("value")?.to_string();
                    Some((key, el.text))
                })
                .collect();

        if options.is_empty() {
            if self.client.session().is_empty() {
                return Err(CatalogError::ExtractionEmpty {
                    selector: selector.to_string(),
                });
            }
            warn!("No options matched {}", selector);
        }

        debug!("Extracted {} options from {}", options.len(), selector);
        Ok(options)
    }
}

fn assemble_record(
    mut found: HashMap<PriceField, String>,
    year: &VehicleYear,
) -> Result<Option<VehiclePriceRecord>> {
    if found.is_empty() {
        warn!("No price fields found for {} {}", year.vmodel.model, year.label);
        return Ok(None);
    }

    let missing: Vec<&'static str> = PriceField::ALL
        .into_iter()
        .filter(|field| !found.contains_key(field))
        .map(PriceField::name)
        .collect();
    if !missing.is_empty() {
        return Err(CatalogError::IncompleteRecord { missing });
    }

    let mut take = |field: PriceField| found.remove(&field).unwrap_or_default();
    Ok(Some(VehiclePriceRecord {
        fipe_code: take(PriceField::FipeCode),
        reference: take(PriceField::Reference),
        average_value: take(PriceField::AverageValue),
        query_date: take(PriceField::QueryDate),
        vyear: year.clone(),
    }))
}
