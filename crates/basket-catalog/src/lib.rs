//! Catalog ingestion: turns retailer files and product tables into
//! [`CatalogSource`]s the comparison engine can load.

pub mod error;
pub mod export;
pub mod fetch;
pub mod json_file;
pub mod keywords;
pub mod promo_text;
pub mod table;
pub mod text_file;

use std::sync::Arc;

use basket_core::{CatalogSource, RetailerConfig, RetailersFile, SourceFormat};

pub use error::IngestError;
pub use export::{read_records_json, write_records_json};
pub use fetch::fetch_concurrently;
pub use json_file::JsonFileSource;
pub use keywords::DEFAULT_KEYWORDS;
pub use promo_text::parse_promotion_text;
pub use table::ProductTableSource;
pub use text_file::TextFileSource;

/// Builds the source described by one retailer entry.
#[must_use]
pub fn build_source(retailer: &RetailerConfig) -> Arc<dyn CatalogSource> {
    match retailer.format {
        SourceFormat::Json => Arc::new(JsonFileSource::new(
            &retailer.label,
            Some(retailer.store.as_str()),
            &retailer.path,
        )),
        SourceFormat::Text => Arc::new(TextFileSource::new(
            &retailer.label,
            Some(retailer.store.as_str()),
            &retailer.path,
            &retailer.keywords,
        )),
        SourceFormat::Table => Arc::new(ProductTableSource::new(
            &retailer.label,
            Some(retailer.store.as_str()),
            &retailer.path,
        )),
    }
}

/// Builds every configured source, in file order.
#[must_use]
pub fn build_sources(file: &RetailersFile) -> Vec<Arc<dyn CatalogSource>> {
    file.retailers.iter().map(build_source).collect()
}
