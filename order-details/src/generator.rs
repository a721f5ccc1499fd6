use std::io;
use std::ops::RangeInclusive;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use crate::catalog::ProductCatalog;
use crate::detail::{OrderDetailRecord, Price};
use crate::error::GenError;
use crate::order::{read_orders, Order};

/// Number of line items drawn for each order
pub const ITEMS_PER_ORDER: RangeInclusive<usize> = 1..=5;
/// Quantity drawn for each line item
pub const QUANTITY: RangeInclusive<u32> = 1..=10;
/// Unit price drawn for each line item, before rounding to cents
pub const UNIT_PRICE: RangeInclusive<f64> = 10.0..=1000.0;

/// Builds randomized order details whose product ids always fall in a [`ProductCatalog`].
///
/// The random source is owned by the generator: seed it for reproducible output, or use
/// [`RecordGenerator::from_entropy`] to get fresh data on each run.
#[derive(Debug)]
pub struct RecordGenerator<R: Rng> {
    catalog: ProductCatalog,
    rng: R,
}

/// The outcome of generating from an orders CSV
#[derive(Debug)]
pub struct Generation {
    pub orders_read: usize,
    pub records: Vec<OrderDetailRecord>,
}

impl RecordGenerator<StdRng> {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        RecordGenerator::new(ProductCatalog::default(), StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        RecordGenerator::new(ProductCatalog::default(), StdRng::from_entropy())
    }
}

impl<R: Rng> RecordGenerator<R> {
    #[must_use]
    pub fn new(catalog: ProductCatalog, rng: R) -> Self {
        RecordGenerator { catalog, rng }
    }

    #[must_use]
    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    /// Generates between one and five line items for every order, keeping input order.
    ///
    /// # Errors
    /// Errors with [`GenError::Configuration`] when the catalog holds fewer product ids than
    /// the largest possible order, even if `orders` is empty.
    pub fn generate<'a>(
        &mut self,
        orders: impl IntoIterator<Item = &'a Order>,
    ) -> Result<Vec<OrderDetailRecord>, GenError> {
        let max_items = *ITEMS_PER_ORDER.end();
        if self.catalog.len() < max_items {
            return Err(GenError::Configuration(format!(
                "product range {}..={} has {} ids, too small to sample {} from",
                self.catalog.first(),
                self.catalog.last(),
                self.catalog.len(),
                max_items
            )));
        }

        let mut records = Vec::new();
        for order in orders {
            self.generate_order(order, &mut records)?;
        }
        Ok(records)
    }

    /// Reads orders from CSV and generates their details.
    ///
    /// # Errors
    /// Errors as [`read_orders`] and [`RecordGenerator::generate`]
    pub fn generate_csv(&mut self, reader: impl io::Read) -> Result<Generation, GenError> {
        let orders = read_orders(reader)?;
        let records = self.generate(&orders)?;
        info!(
            "Generated {} order details for {} orders",
            records.len(),
            orders.len()
        );
        Ok(Generation {
            orders_read: orders.len(),
            records,
        })
    }

    fn generate_order(
        &mut self,
        order: &Order,
        records: &mut Vec<OrderDetailRecord>,
    ) -> Result<(), GenError> {
        let num_items = self.rng.gen_range(ITEMS_PER_ORDER);
        let picked = index::sample(&mut self.rng, self.catalog.len(), num_items);
        debug!("Order {}: {} line items", order.order_id, num_items);

        for i in picked {
            let quantity = self.rng.gen_range(QUANTITY);
            let unit_price = Price::try_from(self.rng.gen_range(UNIT_PRICE))?;
            records.push(OrderDetailRecord::new(
                order.order_id.clone(),
                self.catalog.nth(i),
                quantity,
                unit_price.checked_mul(quantity)?,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rust_decimal::Decimal;

    use super::*;

    fn orders(ids: &[&str]) -> Vec<Order> {
        ids.iter().map(|&id| Order::new(id)).collect()
    }

    #[test]
    fn test_generate_single_order() {
        let mut generator = RecordGenerator::seeded(7);
        let records = generator.generate(&orders(&["A1"])).unwrap();

        assert!(ITEMS_PER_ORDER.contains(&records.len()));
        assert!(records.iter().all(|r| r.order_id == "A1"));
        let ids: HashSet<u32> = records.iter().map(|r| r.product_id).collect();
        assert_eq!(ids.len(), records.len());
        assert!(ids.iter().all(|id| (1..=50).contains(id)));
    }

    #[test]
    fn test_generate_empty() {
        let mut generator = RecordGenerator::seeded(7);
        let records = generator.generate(&orders(&[])).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_generate_small_catalog() {
        let mut generator = RecordGenerator::new(ProductCatalog::new(1, 4), StdRng::seed_from_u64(1));
        let res = generator.generate(&orders(&["A1"]));
        assert!(matches!(res, Err(GenError::Configuration(_))));

        let res = generator.generate(&orders(&[]));
        assert!(matches!(res, Err(GenError::Configuration(_))));

        let mut generator = RecordGenerator::new(ProductCatalog::new(9, 2), StdRng::seed_from_u64(1));
        let res = generator.generate(&orders(&["A1"]));
        assert!(matches!(res, Err(GenError::Configuration(_))));
    }

    #[test]
    fn test_generate_exact_catalog() {
        let mut generator = RecordGenerator::new(ProductCatalog::new(20, 24), StdRng::seed_from_u64(3));
        let ids: Vec<String> = (0..200).map(|i| i.to_string()).collect();
        let input: Vec<Order> = ids.iter().map(Order::new).collect();
        let records = generator.generate(&input).unwrap();
        assert!(records.iter().all(|r| (20..=24).contains(&r.product_id)));
    }

    #[test]
    fn test_generate_invariants() {
        let input: Vec<Order> = (0..1000).map(|i| Order::new(format!("O{}", i))).collect();
        let mut generator = RecordGenerator::seeded(42);
        let records = generator.generate(&input).unwrap();

        let mut by_order: HashMap<&str, Vec<&OrderDetailRecord>> = HashMap::new();
        for record in &records {
            by_order.entry(&record.order_id).or_default().push(record);
        }
        assert_eq!(by_order.len(), input.len());

        for (order_id, group) in &by_order {
            assert!(ITEMS_PER_ORDER.contains(&group.len()), "{}", order_id);
            let ids: HashSet<u32> = group.iter().map(|r| r.product_id).collect();
            assert_eq!(ids.len(), group.len(), "{}", order_id);
        }

        let min = Decimal::new(10, 0);
        let max = Decimal::new(1000, 0);
        for record in &records {
            assert!((1..=50).contains(&record.product_id));
            assert!(QUANTITY.contains(&record.quantity));
            assert_eq!(record.total_price.amount().scale(), 2);
            let unit = record.total_price.per_unit(record.quantity).unwrap();
            assert!(unit >= min && unit <= max, "{:?}", record);
        }
    }

    #[test]
    fn test_generate_reaches_every_bound() {
        let input: Vec<Order> = (0..2000).map(|i| Order::new(i.to_string())).collect();
        let mut generator = RecordGenerator::seeded(3);
        let records = generator.generate(&input).unwrap();

        let mut group_sizes: HashMap<&str, usize> = HashMap::new();
        for record in &records {
            *group_sizes.entry(&record.order_id).or_default() += 1;
        }
        let sizes: HashSet<usize> = group_sizes.values().copied().collect();
        assert_eq!(sizes, ITEMS_PER_ORDER.collect::<HashSet<_>>());

        let quantities: HashSet<u32> = records.iter().map(|r| r.quantity).collect();
        assert_eq!(quantities, QUANTITY.collect::<HashSet<_>>());

        let products: HashSet<u32> = records.iter().map(|r| r.product_id).collect();
        assert_eq!(products, (1..=50).collect::<HashSet<_>>());
    }

    #[test]
    fn test_generate_keeps_input_order() {
        let input = orders(&["c", "a", "b", "a"]);
        let mut generator = RecordGenerator::seeded(11);
        let records = generator.generate(&input).unwrap();

        let mut seen: Vec<&str> = Vec::new();
        for record in &records {
            if seen.last() != Some(&record.order_id.as_str()) {
                seen.push(&record.order_id);
            }
        }
        assert_eq!(seen, vec!["c", "a", "b", "a"]);
    }

    #[test]
    fn test_generate_seeded_is_reproducible() {
        let input = orders(&["1", "2", "3", "4", "5"]);
        let first = RecordGenerator::seeded(99).generate(&input).unwrap();
        let second = RecordGenerator::seeded(99).generate(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_csv() {
        let data = "\u{feff}OrderID,CustomerID\n1,VINET\n2,TOMSP\n";
        let generation = RecordGenerator::seeded(5).generate_csv(data.as_bytes()).unwrap();
        assert_eq!(generation.orders_read, 2);
        let ids: HashSet<&str> = generation.records.iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["1", "2"]));
    }
}
