//! # lcr-extract
//!
//! A command-line tool for turning Light Curve Repository query results into
//! normalized JSON records.
//!
//! ## Usage
//!
//! ```bash
//! # Extract a downloaded payload document
//! lcr-extract extract crab_payload.json -s "4FGL J0534.5+2201 21" -o lightcurves
//!
//! # Extract every source listed in a TOML configuration
//! lcr-extract batch -c sources.toml
//!
//! # Generate and extract a synthetic light curve
//! lcr-extract demo -o /tmp
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
