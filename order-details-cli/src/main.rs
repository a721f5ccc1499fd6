use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use log::error;

use order_details::audit::audit;
use order_details::catalog::ProductCatalog;
use order_details::detail::read_order_details_from_path;
use order_details::generator::RecordGenerator;
use order_details::order::read_orders_from_path;
use order_details::output::{
    backup_path, ensure_replaceable, replace_with_backup, write_order_details_to_path,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate order details whose product ids match the product catalog
    Generate {
        /// The input file of orders
        #[clap(long, default_value = "data/orders.csv")]
        orders: PathBuf,
        /// Where to write the regenerated order details
        #[clap(long, default_value = "data/order_details_regenerated.csv")]
        output: PathBuf,
        /// Seed for reproducible output
        #[clap(long)]
        seed: Option<u64>,
        /// Move the current order details aside and put the regenerated file in its place
        #[clap(long)]
        replace: bool,
        /// The order details file replaced by --replace
        #[clap(long, default_value = "data/order_details.csv")]
        target: PathBuf,
    },
    /// Check an existing order details file against the orders and the product catalog
    Check {
        /// The input file of orders
        #[clap(long, default_value = "data/orders.csv")]
        orders: PathBuf,
        /// The order details file to check
        #[clap(long, default_value = "data/order_details.csv")]
        details: PathBuf,
    },
}

fn generate(
    orders: &Path,
    output: &Path,
    seed: Option<u64>,
    replace: bool,
    target: &Path,
) -> Result<(), Box<dyn Error>> {
    if replace {
        ensure_replaceable(output, target)?;
    }

    println!("Reading {}...", orders.display());
    let orders = read_orders_from_path(orders)?;
    println!("  Total orders: {}", orders.len());

    let mut generator = match seed {
        Some(seed) => RecordGenerator::seeded(seed),
        None => RecordGenerator::from_entropy(),
    };
    let records = generator.generate(&orders)?;
    println!("  Total order details generated: {}", records.len());

    write_order_details_to_path(output, &records)?;
    println!("Wrote {}", output.display());

    if replace {
        if let Some(backup) = replace_with_backup(output, target)? {
            println!("  Previous file kept as {}", backup.display());
        }
        println!("Replaced {}", target.display());
    } else {
        println!();
        println!("To apply the changes:");
        println!("  mv {} {}", target.display(), backup_path(target).display());
        println!("  mv {} {}", output.display(), target.display());
    }
    Ok(())
}

fn check(orders: &Path, details: &Path) -> Result<bool, Box<dyn Error>> {
    let orders = read_orders_from_path(orders)?;
    let details = read_order_details_from_path(details)?;

    let report = audit(&orders, &details, &ProductCatalog::default());
    for violation in &report.violations {
        println!("{}", violation);
    }
    println!(
        "Checked {} rows across {} orders: {} problems",
        report.rows,
        report.orders,
        report.violations.len()
    );
    Ok(report.is_clean())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Generate {
            orders,
            output,
            seed,
            replace,
            target,
        } => generate(orders, output, *seed, *replace, target)?,
        Command::Check { orders, details } => {
            if !check(orders, details)? {
                error!("Order details failed the check");
                process::exit(1);
            }
        }
    }

    Ok(())
}
