//! Generates a synthetic orders file with 100 000 orders for benchmarking.
//! can be run with `cargo run --example generator`

use std::error::Error;

use rand::{thread_rng, Rng};

const CUSTOMERS: [&str; 6] = ["VINET", "TOMSP", "HANAR", "VICTE", "SUPRD", "CHOPS"];

fn main() -> Result<(), Box<dyn Error>> {
    let mut writer = csv::WriterBuilder::new().from_path("resources/input/rand-orders.csv")?;
    let mut rng = thread_rng();
    writer.write_record(["OrderID", "CustomerID", "Status"])?;
    for order_id in 10_000..110_000_u32 {
        let customer = CUSTOMERS[rng.gen_range(0..CUSTOMERS.len())];
        let status = if rng.gen_bool(0.9) { "Shipped" } else { "Pending" };
        writer.write_record([order_id.to_string().as_str(), customer, status])?;
    }
    writer.flush()?;
    Ok(())
}
