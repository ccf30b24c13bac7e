pub mod app_config;
pub mod basket;
pub mod catalog;
pub mod config;
pub mod error;
pub mod retailers;
pub mod source;

pub use app_config::{AppConfig, Environment, TotalsMode};
pub use basket::{Basket, BasketItem};
pub use catalog::{CatalogEntry, RawCatalogRecord, RawPrice, UNKNOWN};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError, EntryRejection};
pub use retailers::{load_retailers, RetailerConfig, RetailersFile, SourceFormat};
pub use source::{CatalogSource, FetchedSource, SourceError};
