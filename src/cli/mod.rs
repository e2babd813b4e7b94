use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use lcr_extract::lightcurve::{Cadence, FluxType, IndexType};

mod batch;
mod config;
mod demo;
mod extract;
mod info;

/// lcr-extract - Light Curve Repository record extractor
#[derive(Parser)]
#[command(name = "lcr-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Time-binning granularity of the requested light curve.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CadenceArg {
    /// One bin per day
    Daily,
    /// One bin per week
    Weekly,
    /// One bin per month
    #[default]
    Monthly,
}

/// Flux measure to request.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FluxTypeArg {
    /// Photon flux
    Photon,
    /// Energy flux
    #[default]
    Energy,
}

/// Spectral-index fitting mode to request.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum IndexTypeArg {
    /// Photon index held fixed at the catalog value
    #[default]
    Fixed,
    /// Photon index left free in the fit
    Free,
}

impl From<CadenceArg> for Cadence {
    fn from(arg: CadenceArg) -> Self {
        match arg {
            CadenceArg::Daily => Cadence::Daily,
            CadenceArg::Weekly => Cadence::Weekly,
            CadenceArg::Monthly => Cadence::Monthly,
        }
    }
}

impl From<FluxTypeArg> for FluxType {
    fn from(arg: FluxTypeArg) -> Self {
        match arg {
            FluxTypeArg::Photon => FluxType::Photon,
            FluxTypeArg::Energy => FluxType::Energy,
        }
    }
}

impl From<IndexTypeArg> for IndexType {
    fn from(arg: IndexTypeArg) -> Self {
        match arg {
            IndexTypeArg::Fixed => IndexType::Fixed,
            IndexTypeArg::Free => IndexType::Free,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a repository payload document into a named JSON record
    Extract {
        /// Input payload document path
        #[arg(value_name = "PAYLOAD")]
        payload: PathBuf,

        /// Source name as catalogued by the repository
        #[arg(short = 's', long, value_name = "NAME")]
        source_name: String,

        /// Time-binning granularity
        #[arg(long, default_value = "monthly", value_enum)]
        cadence: CadenceArg,

        /// Flux measure
        #[arg(long, default_value = "energy", value_enum)]
        flux_type: FluxTypeArg,

        /// Spectral-index fitting mode
        #[arg(long, default_value = "fixed", value_enum)]
        index_type: IndexTypeArg,

        /// Minimum test-statistic threshold
        #[arg(long, default_value = "4")]
        ts_min: u32,

        /// Output directory (must exist)
        #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
        save_path: PathBuf,
    },

    /// Extract every source listed in a TOML configuration file
    Batch {
        /// Configuration file path
        #[arg(short = 'c', long, value_name = "FILE")]
        config: PathBuf,

        /// Output directory, overriding the configuration's save_path
        #[arg(short = 'o', long, value_name = "DIR")]
        save_path: Option<PathBuf>,
    },

    /// Generate a synthetic payload document and extract it
    Demo {
        /// Output directory (must exist)
        #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
        save_path: PathBuf,
    },

    /// Display per-field entry counts of an extracted JSON record
    Info {
        /// Extracted record path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Extract {
            payload,
            source_name,
            cadence,
            flux_type,
            index_type,
            ts_min,
            save_path,
        } => extract::run(
            payload,
            source_name,
            cadence.into(),
            flux_type.into(),
            index_type.into(),
            ts_min,
            save_path,
        ),
        Commands::Batch { config, save_path } => batch::run(config, save_path),
        Commands::Demo { save_path } => demo::run(save_path),
        Commands::Info { file } => info::run(file),
    }
}
