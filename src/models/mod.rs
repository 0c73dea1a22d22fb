//! Data models for the FIPE vehicle price catalog
//!
//! Every entity below [`VehicleType`] carries its full ancestor chain by
//! value. The chain is the selection: there is no separate "current brand"
//! or "current model" anywhere in the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Top level of the catalog, fixed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Motorbike,
    Truck,
}

impl VehicleType {
    /// All vehicle types in catalog order
    pub const ALL: [Self; 3] = [Self::Car, Self::Motorbike, Self::Truck];

    /// Human readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Car => "Cars",
            Self::Motorbike => "Motorbikes",
            Self::Truck => "Trucks",
        }
    }

    /// Query string parameters selecting this type's catalog page
    pub const fn query_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Car => &[("p", "51")],
            Self::Motorbike => &[("p", "52"), ("v", "m")],
            Self::Truck => &[("p", "53"), ("v", "c")],
        }
    }

    /// Position in [`VehicleType::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Self::Car => 0,
            Self::Motorbike => 1,
            Self::Truck => 2,
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VehicleType {
    type Err = CatalogError;

    /// Accepts the catalog index, the label or the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();

        // Older catalog pages label trucks "Trunks"
        if needle.eq_ignore_ascii_case("trunks") {
            return Ok(Self::Truck);
        }

        if let Ok(idx) = needle.parse::<usize>() {
            return Self::ALL
                .get(idx)
                .copied()
                .ok_or_else(|| CatalogError::UnknownVehicleType(s.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|vtype| {
                needle.eq_ignore_ascii_case(vtype.label())
                    || needle.eq_ignore_ascii_case(&format!("{vtype:?}"))
            })
            .ok_or_else(|| CatalogError::UnknownVehicleType(s.to_string()))
    }
}

/// A brand listed under a vehicle type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleBrand {
    pub pk: String,
    pub brand: String,
    pub vtype: VehicleType,
}

/// A model listed under a brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub pk: String,
    pub model: String,
    pub vbrand: VehicleBrand,
}

/// A model-year entry. The `pk` is only meaningful for its own model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleYear {
    pub pk: String,
    pub label: String,
    pub vmodel: VehicleModel,
}

/// Price table entry for one model-year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehiclePriceRecord {
    pub fipe_code: String,
    pub reference: String,
    /// Currency string exactly as rendered, e.g. `R$ 10.000,00`
    pub average_value: String,
    pub query_date: String,
    pub vyear: VehicleYear,
}

impl VehicleModel {
    pub fn vtype(&self) -> VehicleType {
        self.vbrand.vtype
    }
}

impl VehicleYear {
    pub fn vtype(&self) -> VehicleType {
        self.vmodel.vtype()
    }
}

/// Result panel labels recognized on the price page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriceField {
    FipeCode,
    Reference,
    AverageValue,
    QueryDate,
}

impl PriceField {
    pub const ALL: [Self; 4] = [
        Self::FipeCode,
        Self::Reference,
        Self::AverageValue,
        Self::QueryDate,
    ];

    /// Maps a result span id to its field. Unknown ids map to `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "lblCodFipe" => Some(Self::FipeCode),
            "lblReferencia" => Some(Self::Reference),
            "lblValor" => Some(Self::AverageValue),
            "lblData" => Some(Self::QueryDate),
            _ => None,
        }
    }

    /// Record field name
    pub const fn name(self) -> &'static str {
        match self {
            Self::FipeCode => "fipe_code",
            Self::Reference => "reference",
            Self::AverageValue => "average_value",
            Self::QueryDate => "query_date",
        }
    }
}
