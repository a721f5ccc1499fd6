use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader};
use std::time::Instant;

use log::{error, warn};

use order_details::generator::RecordGenerator;
use order_details::output::write_order_details;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let file = File::open("resources/input/rand-orders.csv")?;
    let mut generator = RecordGenerator::seeded(0);
    let start = Instant::now();
    let generation = generator.generate_csv(BufReader::new(file))?;
    let elapsed = start.elapsed();
    error!(
        "Generating {} details for {} orders took: {:.2?}",
        generation.records.len(),
        generation.orders_read,
        elapsed
    );

    let start_writing = Instant::now();
    write_order_details(io::sink(), &generation.records)?;
    let elapsed_writing = start_writing.elapsed();
    warn!("Writing took: {:.2?}", elapsed_writing);

    warn!("Total took: {:.2?}", start.elapsed());

    Ok(())
}
