//! Basket price comparison.
//!
//! The pipeline is: load catalogs ([`store`]) → find the cheapest listing per
//! basket line ([`resolve`]) → regroup by store ([`group`]) → total per store
//! and pick the cheapest ([`aggregate`]). [`compare`] composes these into the
//! two public use cases.

pub mod aggregate;
pub mod compare;
pub mod error;
pub mod group;
pub mod resolve;
pub mod store;
pub mod warning;

pub use aggregate::{aggregate, full_basket_totals, pick_cheapest, StoreTotals};
pub use compare::{
    global_cheapest_store, global_cheapest_store_fetched, per_store_breakdown,
    per_store_breakdown_fetched, CompareOptions, ComparisonResult, PerStoreBreakdown,
    SourceBreakdown,
};
pub use error::CompareError;
pub use group::{group_by_store, GroupedBaskets, StoreBasket, StoreItem};
pub use resolve::{resolve, resolve_with_index, CatalogIndex, CheapestMatch, Resolution};
pub use store::{fetch_all, load_catalog, load_source, LoadedCatalog, SourceCatalog};
pub use warning::Warning;
