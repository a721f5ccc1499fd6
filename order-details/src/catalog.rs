use std::ops::RangeInclusive;

/// First product id listed in `products.csv`
pub const FIRST_PRODUCT_ID: u32 = 1;
/// Last product id listed in `products.csv`
pub const LAST_PRODUCT_ID: u32 = 50;

/// The closed range of product ids that order details may reference.
///
/// The range is fixed rather than read from the products file, so it has to be kept in sync
/// with `products.csv` by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCatalog {
    ids: RangeInclusive<u32>,
}

impl Default for ProductCatalog {
    fn default() -> Self {
        ProductCatalog::new(FIRST_PRODUCT_ID, LAST_PRODUCT_ID)
    }
}

impl ProductCatalog {
    /// A catalog whose last id is below its first id is empty. It can still be built, but
    /// generating against it fails.
    #[must_use]
    pub fn new(first: u32, last: u32) -> Self {
        ProductCatalog { ids: first..=last }
    }

    #[must_use]
    pub fn first(&self) -> u32 {
        *self.ids.start()
    }

    #[must_use]
    pub fn last(&self) -> u32 {
        *self.ids.end()
    }

    /// Number of distinct product ids in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        if self.ids.is_empty() {
            0
        } else {
            (self.last() - self.first()) as usize + 1
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: u32) -> bool {
        self.ids.contains(&product_id)
    }

    /// The product id at position `index`, counting from the first id.
    /// Callers must keep `index < self.len()`.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn nth(&self, index: usize) -> u32 {
        self.first() + index as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ProductCatalog::default();
        assert_eq!(catalog.first(), 1);
        assert_eq!(catalog.last(), 50);
        assert_eq!(catalog.len(), 50);
        assert!(catalog.contains(1));
        assert!(catalog.contains(50));
        assert!(!catalog.contains(0));
        assert!(!catalog.contains(51));
    }

    #[test]
    fn test_small_and_empty_catalog() {
        let catalog = ProductCatalog::new(1, 4);
        assert_eq!(catalog.len(), 4);
        assert!(!catalog.is_empty());

        let catalog = ProductCatalog::new(7, 7);
        assert_eq!(catalog.len(), 1);

        let catalog = ProductCatalog::new(10, 3);
        assert_eq!(catalog.len(), 0);
        assert!(catalog.is_empty());
        assert!(!catalog.contains(5));
    }

    #[test]
    fn test_nth() {
        let catalog = ProductCatalog::new(100, 104);
        assert_eq!(catalog.nth(0), 100);
        assert_eq!(catalog.nth(4), 104);
    }
}
