pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod postback;
pub mod session;
pub mod traits;
pub mod transport;

#[cfg(test)]
mod testing;

pub use catalog::FipeCatalog;
pub use config::CatalogConfig;
pub use error::{CatalogError, Result};
pub use models::{VehicleBrand, VehicleModel, VehiclePriceRecord, VehicleType, VehicleYear};
