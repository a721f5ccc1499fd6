//! Checks an existing `order_details` file against the rules the generator guarantees, so
//! stale or hand-edited files with dangling product ids can be spotted before loading.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;
use rust_decimal::Decimal;

use crate::catalog::ProductCatalog;
use crate::detail::OrderDetailRecord;
use crate::generator::{ITEMS_PER_ORDER, QUANTITY};
use crate::order::Order;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `row` counts data rows from 1, not including the header
    ProductOutOfRange {
        row: usize,
        order_id: String,
        product_id: u32,
    },
    DuplicateProduct {
        order_id: String,
        product_id: u32,
    },
    ItemCount {
        order_id: String,
        count: usize,
    },
    QuantityOutOfRange {
        row: usize,
        order_id: String,
        quantity: u32,
    },
    UnitPriceOutOfRange {
        row: usize,
        order_id: String,
        unit_price: Decimal,
    },
    UnknownOrder {
        order_id: String,
    },
    MissingOrder {
        order_id: String,
    },
}

#[derive(Debug, Default)]
pub struct AuditReport {
    pub rows: usize,
    pub orders: usize,
    pub violations: Vec<Violation>,
}

impl AuditReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::ProductOutOfRange {
                row,
                order_id,
                product_id,
            } => write!(
                f,
                "row {}: order {} references unknown product {}",
                row, order_id, product_id
            ),
            Violation::DuplicateProduct {
                order_id,
                product_id,
            } => write!(f, "order {} lists product {} more than once", order_id, product_id),
            Violation::ItemCount { order_id, count } => {
                write!(f, "order {} has {} line items", order_id, count)
            }
            Violation::QuantityOutOfRange {
                row,
                order_id,
                quantity,
            } => write!(f, "row {}: order {} has quantity {}", row, order_id, quantity),
            Violation::UnitPriceOutOfRange {
                row,
                order_id,
                unit_price,
            } => write!(
                f,
                "row {}: order {} has unit price {}",
                row, order_id, unit_price
            ),
            Violation::UnknownOrder { order_id } => {
                write!(f, "order {} is not in the orders file", order_id)
            }
            Violation::MissingOrder { order_id } => {
                write!(f, "order {} has no line items", order_id)
            }
        }
    }
}

/// Audits `details` against `catalog` and the generator's bounds, and checks that the
/// details cover exactly the given `orders`.
#[must_use]
pub fn audit(
    orders: &[Order],
    details: &[OrderDetailRecord],
    catalog: &ProductCatalog,
) -> AuditReport {
    // unit prices are rounded to cents before multiplying, allow one cent either way
    let tolerance = Decimal::new(1, 2);
    let min_unit_price = Decimal::new(10, 0) - tolerance;
    let max_unit_price = Decimal::new(1000, 0) + tolerance;

    let mut violations = Vec::new();
    // order ids in first-seen order, so reports are stable
    let mut detail_orders: Vec<&str> = Vec::new();
    let mut products_by_order: HashMap<&str, Vec<u32>> = HashMap::new();

    for (i, detail) in details.iter().enumerate() {
        let row = i + 1;
        let order_id = detail.order_id.as_str();

        if !catalog.contains(detail.product_id) {
            violations.push(Violation::ProductOutOfRange {
                row,
                order_id: order_id.to_string(),
                product_id: detail.product_id,
            });
        }
        if QUANTITY.contains(&detail.quantity) {
            if let Some(unit_price) = detail.total_price.per_unit(detail.quantity) {
                if unit_price < min_unit_price || unit_price > max_unit_price {
                    violations.push(Violation::UnitPriceOutOfRange {
                        row,
                        order_id: order_id.to_string(),
                        unit_price: unit_price.round_dp(2),
                    });
                }
            }
        } else {
            violations.push(Violation::QuantityOutOfRange {
                row,
                order_id: order_id.to_string(),
                quantity: detail.quantity,
            });
        }

        products_by_order
            .entry(order_id)
            .or_insert_with(|| {
                detail_orders.push(order_id);
                Vec::new()
            })
            .push(detail.product_id);
    }

    for order_id in &detail_orders {
        let products = &products_by_order[order_id];
        if !ITEMS_PER_ORDER.contains(&products.len()) {
            violations.push(Violation::ItemCount {
                order_id: (*order_id).to_string(),
                count: products.len(),
            });
        }
        let mut seen = HashSet::new();
        for &product_id in products {
            if !seen.insert(product_id) {
                violations.push(Violation::DuplicateProduct {
                    order_id: (*order_id).to_string(),
                    product_id,
                });
            }
        }
    }

    let known: HashSet<&str> = orders.iter().map(|o| o.order_id.as_str()).collect();
    for order_id in &detail_orders {
        if !known.contains(order_id) {
            violations.push(Violation::UnknownOrder {
                order_id: (*order_id).to_string(),
            });
        }
    }
    let mut reported = HashSet::new();
    for order in orders {
        let order_id = order.order_id.as_str();
        if !products_by_order.contains_key(order_id) && reported.insert(order_id) {
            violations.push(Violation::MissingOrder {
                order_id: order_id.to_string(),
            });
        }
    }

    for violation in &violations {
        warn!("{}", violation);
    }

    AuditReport {
        rows: details.len(),
        orders: detail_orders.len(),
        violations,
    }
}
