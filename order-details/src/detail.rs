use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::order::{clean_headers, reader_builder};

pub const NUM_DECIMAL_PLACES: u32 = 2;

/// Column names of an `order_details` file, in output order
pub const HEADER: [&str; 4] = ["OrderID", "ProductID", "Quantity", "TotalPrice"];

/// A non-negative monetary amount, always carried with exactly two decimal places.
///
/// Rounding to cents uses banker's rounding (round half to even).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "Decimal")]
pub struct Price(Decimal);

/// One line item of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailRecord {
    #[serde(rename = "OrderID")]
    pub order_id: String,
    #[serde(rename = "ProductID")]
    pub product_id: u32,
    #[serde(rename = "Quantity")]
    pub quantity: u32,
    #[serde(rename = "TotalPrice")]
    pub total_price: Price,
}

impl TryFrom<Decimal> for Price {
    type Error = GenError;
    fn try_from(decimal: Decimal) -> Result<Self, Self::Error> {
        if decimal >= Decimal::ZERO {
            let mut cents = decimal
                .round_dp_with_strategy(NUM_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);
            cents.rescale(NUM_DECIMAL_PLACES);
            Ok(Price(cents))
        } else {
            Err(GenError::InvalidAmount)
        }
    }
}

impl TryFrom<f64> for Price {
    type Error = GenError;
    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Price::try_from(Decimal::from_f64(amount).ok_or(GenError::InvalidAmount)?)
    }
}

impl Price {
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// # Errors
    /// Errors when `self` * `quantity` would overflow
    pub fn checked_mul(self, quantity: u32) -> Result<Price, GenError> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .ok_or(GenError::InvalidAmount)
            .and_then(Price::try_from)
    }

    /// The per-unit amount of `self`, unrounded. `None` for a zero quantity.
    #[must_use]
    pub fn per_unit(self, quantity: u32) -> Option<Decimal> {
        self.0.checked_div(Decimal::from(quantity))
    }
}

impl OrderDetailRecord {
    #[must_use]
    pub fn new(order_id: String, product_id: u32, quantity: u32, total_price: Price) -> Self {
        OrderDetailRecord {
            order_id,
            product_id,
            quantity,
            total_price,
        }
    }
}

/// Reads back an `order_details` file, such as one written by
/// [`write_order_details`](crate::output::write_order_details).
///
/// # Errors
/// Errors when the header lacks one of the [`HEADER`] columns or a row cannot be parsed
pub fn read_order_details(reader: impl io::Read) -> Result<Vec<OrderDetailRecord>, GenError> {
    let mut reader = reader_builder().from_reader(reader);
    let headers = clean_headers(&mut reader)?;
    if let Some(&missing) = HEADER.iter().find(|&&column| !headers.iter().any(|h| h == column)) {
        return Err(GenError::MissingColumn(missing));
    }

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// # Errors
/// Errors with [`GenError::InputNotFound`] when `path` cannot be opened, otherwise as
/// [`read_order_details`]
pub fn read_order_details_from_path(
    path: impl AsRef<Path>,
) -> Result<Vec<OrderDetailRecord>, GenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GenError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    read_order_details(BufReader::new(file))
}
