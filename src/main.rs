//! Inventory Engine CLI
//!
//! Command-line interface for the shop inventory and order engine.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --user admin --password Admin1234 add-product P1 Widget tools 10.00 5
//! cargo run -- --user admin --password Admin1234 create-order O1 13800000000 P1 3
//! cargo run -- --user admin --password Admin1234 statistics > statistics.csv
//! cargo run -- shell
//! ```
//!
//! Data lives in `mall_data.json` (backup `mall_backup.json`) and every
//! operation is recorded in `mall_system.log`; see `--help` for the options
//! that move them. Diagnostics go to stderr and are filtered with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (login failed, operation rejected, data could not be saved, etc.)

use inventory_engine::cli;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
