//! TOML configuration file support for batch extraction.
//!
//! Instead of invoking the extractor once per source, users can list sources
//! in a config file:
//!
//! ```toml
//! # sources.toml
//! save_path = "lightcurves"
//!
//! [defaults]
//! cadence = "monthly"
//! flux_type = "energy"
//! index_type = "fixed"
//! ts_min = 4
//!
//! [[sources]]
//! name = "4FGL J0534.5+2201 21"
//! payload = "payloads/crab.json"
//!
//! [[sources]]
//! name = "PKS 2155-304 19"
//! payload = "payloads/pks2155.json"
//! cadence = "weekly"
//! ts_min = 9
//! ```
//!
//! Per-source fields override the `[defaults]` table, which in turn
//! overrides the repository defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use lcr_extract::lightcurve::{Cadence, FluxType, IndexType, LightCurveQuery};

/// Root configuration structure for batch extraction files.
#[derive(Debug, Default, Deserialize)]
pub struct BatchConfig {
    /// Output directory for extracted records.
    pub save_path: Option<PathBuf>,

    /// Query defaults applied to every source.
    #[serde(default)]
    pub defaults: QueryDefaults,

    /// Sources to extract.
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

/// Query parameter defaults shared by all sources.
#[derive(Debug, Default, Deserialize)]
pub struct QueryDefaults {
    /// Time-binning granularity.
    pub cadence: Option<Cadence>,

    /// Flux measure.
    pub flux_type: Option<FluxType>,

    /// Spectral-index fitting mode.
    pub index_type: Option<IndexType>,

    /// Minimum test-statistic threshold.
    pub ts_min: Option<u32>,
}

/// One source to extract, with optional per-source overrides.
#[derive(Debug, Deserialize)]
pub struct SourceEntry {
    /// Source name as catalogued by the repository.
    pub name: String,

    /// Payload document path, relative to the working directory.
    pub payload: PathBuf,

    /// Override the default cadence.
    pub cadence: Option<Cadence>,

    /// Override the default flux measure.
    pub flux_type: Option<FluxType>,

    /// Override the default fitting mode.
    pub index_type: Option<IndexType>,

    /// Override the default threshold.
    pub ts_min: Option<u32>,
}

impl BatchConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl SourceEntry {
    /// Build the query for this source, layering its overrides over the
    /// shared defaults.
    pub fn query(&self, defaults: &QueryDefaults) -> LightCurveQuery {
        let mut query = LightCurveQuery::new(self.name.clone());
        if let Some(cadence) = self.cadence.or(defaults.cadence) {
            query = query.with_cadence(cadence);
        }
        if let Some(flux_type) = self.flux_type.or(defaults.flux_type) {
            query = query.with_flux_type(flux_type);
        }
        if let Some(index_type) = self.index_type.or(defaults.index_type) {
            query = query.with_index_type(index_type);
        }
        if let Some(ts_min) = self.ts_min.or(defaults.ts_min) {
            query = query.with_ts_min(ts_min);
        }
        query
    }
}
