use basket_core::CoreError;
use thiserror::Error;

/// Conditions that abort a comparison call. Everything recoverable travels as
/// a [`crate::Warning`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("basket must contain at least one product name")]
    EmptyBasket,

    #[error("no catalog entries could be loaded from any source")]
    EmptyCatalog,

    #[error("no valid store totals: no basket item could be priced at any store")]
    NoValidTotals,

    #[error("price total overflowed for store {store}")]
    PriceOverflow { store: String },
}

impl CompareError {
    /// Stable machine-readable code, used in API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            CompareError::EmptyBasket => "empty_basket",
            CompareError::EmptyCatalog => "empty_catalog",
            CompareError::NoValidTotals => "no_valid_totals",
            CompareError::PriceOverflow { .. } => "price_overflow",
        }
    }
}

impl From<CoreError> for CompareError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyBasket => CompareError::EmptyBasket,
        }
    }
}
