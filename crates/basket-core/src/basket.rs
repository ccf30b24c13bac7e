use serde::{Deserialize, Serialize};

use crate::CoreError;

/// One line of a shopping basket: the product name to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketItem {
    pub name: String,
}

impl BasketItem {
    /// Lowercased name used for case-insensitive equality matching.
    #[must_use]
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// A non-empty, ordered basket. Duplicate names are kept; each line is priced
/// on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Basket {
    items: Vec<BasketItem>,
}

impl Basket {
    /// Builds a basket from product names.
    ///
    /// Names are trimmed; blank names are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyBasket`] when no non-blank name remains.
    pub fn new<I, S>(names: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items = Vec::new();
        for (idx, name) in names.into_iter().enumerate() {
            let trimmed = name.as_ref().trim();
            if trimmed.is_empty() {
                tracing::warn!(position = idx, "dropping blank basket item");
                continue;
            }
            items.push(BasketItem {
                name: trimmed.to_string(),
            });
        }

        if items.is_empty() {
            return Err(CoreError::EmptyBasket);
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn items(&self) -> &[BasketItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BasketItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Basket {
    type Item = &'a BasketItem;
    type IntoIter = std::slice::Iter<'a, BasketItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        let err = Basket::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyBasket));
    }

    #[test]
    fn all_blank_input_is_rejected() {
        let err = Basket::new(["", "   "]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyBasket));
    }

    #[test]
    fn names_are_trimmed_and_order_kept() {
        let basket = Basket::new([" Milk", "Bread ", "", "Apple"]).unwrap();
        let names: Vec<&str> = basket.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Milk", "Bread", "Apple"]);
    }

    #[test]
    fn duplicates_are_kept() {
        let basket = Basket::new(["Milk", "Milk"]).unwrap();
        assert_eq!(basket.len(), 2);
        assert!(!basket.is_empty());
    }

    #[test]
    fn item_key_is_lowercase() {
        let basket = Basket::new(["MiLk"]).unwrap();
        assert_eq!(basket.items()[0].key(), "milk");
    }
}
