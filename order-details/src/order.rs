use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use log::debug;
use serde::Deserialize;

use crate::error::GenError;

pub const ORDER_ID_COLUMN: &str = "OrderID";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// An order as read from `orders.csv`. The id is an opaque token and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Order {
    #[serde(rename = "OrderID")]
    pub order_id: String,
}

impl Order {
    #[must_use]
    pub fn new(order_id: impl Into<String>) -> Self {
        Order {
            order_id: order_id.into(),
        }
    }
}

pub(crate) fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.trim(Trim::All).flexible(true);
    builder
}

/// Strips a UTF-8 byte-order mark from the first header and installs the cleaned headers
/// on `reader`, so serde lookups by column name work on files saved by spreadsheet tools.
pub(crate) fn clean_headers<R: io::Read>(reader: &mut Reader<R>) -> Result<StringRecord, GenError> {
    let headers: StringRecord = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches(BYTE_ORDER_MARK).trim()
            } else {
                h
            }
        })
        .collect();
    reader.set_headers(headers.clone());
    Ok(headers)
}

/// Reads every order from a CSV with an `OrderID` column. Other columns are ignored.
///
/// # Errors
/// Errors when the `OrderID` column is missing or a row cannot be read
pub fn read_orders(reader: impl io::Read) -> Result<Vec<Order>, GenError> {
    let mut reader = reader_builder().from_reader(reader);
    let headers = clean_headers(&mut reader)?;
    debug!("Order file columns: {:?}", headers);
    if !headers.iter().any(|h| h == ORDER_ID_COLUMN) {
        return Err(GenError::MissingColumn(ORDER_ID_COLUMN));
    }

    let mut orders = Vec::new();
    for order in reader.deserialize() {
        orders.push(order?);
    }
    Ok(orders)
}

/// # Errors
/// Errors with [`GenError::InputNotFound`] when `path` cannot be opened, otherwise as
/// [`read_orders`]
pub fn read_orders_from_path(path: impl AsRef<Path>) -> Result<Vec<Order>, GenError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GenError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    read_orders(BufReader::new(file))
}
