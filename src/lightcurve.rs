//! Structural contract for retrieved light curves and query parameters.
//!
//! The retrieval layer hands back a [`LightCurve`]: a read-only record of
//! parallel per-bin sequences grouped into three timestamp families. Within a
//! family, entry *i* of the timestamp sequence corresponds to entry *i* of
//! every paired value sequence:
//!
//! - `met` pairs with `ts`, `fit_tolerance`, `fit_convergence`
//! - `met_detections` pairs with `flux`, `flux_error`, `photon_index`,
//!   `photon_index_interval`
//! - `met_upperlimits` pairs with `flux_upper_limits`
//!
//! Mission elapsed times are kept in their native floating form here and
//! truncated to plain integers when the record is reshaped for output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Time-binning granularity of a light curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    /// One bin per day.
    Daily,
    /// One bin per week.
    Weekly,
    /// One bin per month.
    Monthly,
}

impl Cadence {
    /// Lowercase form used in file names and payload documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flux measure requested from the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluxType {
    /// Photon flux (photons cm^-2 s^-1).
    Photon,
    /// Energy flux (MeV cm^-2 s^-1).
    Energy,
}

impl FluxType {
    /// Lowercase form used in file names and payload documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            FluxType::Photon => "photon",
            FluxType::Energy => "energy",
        }
    }
}

impl fmt::Display for FluxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spectral-index fitting mode used for the per-bin likelihood fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexType {
    /// Photon index held fixed at the catalog value.
    Fixed,
    /// Photon index left free in the fit.
    Free,
}

impl IndexType {
    /// Lowercase form used in file names and payload documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::Fixed => "fixed",
            IndexType::Free => "free",
        }
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters forwarded untouched to the retrieval layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCurveQuery {
    /// Source name as catalogued by the repository
    /// (e.g. `"4FGL J0534.5+2201 21"`).
    pub source_name: String,

    /// Time-binning granularity.
    pub cadence: Cadence,

    /// Flux measure.
    pub flux_type: FluxType,

    /// Spectral-index fitting mode.
    pub index_type: IndexType,

    /// Minimum test-statistic threshold; bins below it are reported as
    /// upper limits. Passed through to the retrieval layer unvalidated.
    pub ts_min: u32,
}

impl LightCurveQuery {
    /// Query with the repository's default parameters: monthly cadence,
    /// energy flux, fixed index, `ts_min = 4`.
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            cadence: Cadence::Monthly,
            flux_type: FluxType::Energy,
            index_type: IndexType::Fixed,
            ts_min: 4,
        }
    }

    /// Set the cadence.
    pub fn with_cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// Set the flux measure.
    pub fn with_flux_type(mut self, flux_type: FluxType) -> Self {
        self.flux_type = flux_type;
        self
    }

    /// Set the spectral-index fitting mode.
    pub fn with_index_type(mut self, index_type: IndexType) -> Self {
        self.index_type = index_type;
        self
    }

    /// Set the minimum test-statistic threshold.
    pub fn with_ts_min(mut self, ts_min: u32) -> Self {
        self.ts_min = ts_min;
        self
    }
}

/// Lower and upper flux bound reported for a detection bin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FluxBounds {
    /// Lower flux bound.
    pub lower: f64,
    /// Upper flux bound.
    pub upper: f64,
}

/// A retrieved light curve: parallel per-bin sequences grouped into three
/// timestamp families (see the module docs for the pairing).
///
/// Instances come out of the retrieval boundary fully populated; nothing in
/// this crate mutates one after construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LightCurve {
    /// Mission elapsed time of every bin, seconds.
    pub met: Vec<f64>,
    /// Test statistic per bin.
    pub ts: Vec<f64>,
    /// Likelihood-fit tolerance per bin.
    pub fit_tolerance: Vec<f64>,
    /// Likelihood-fit convergence code per bin.
    pub fit_convergence: Vec<i64>,

    /// Mission elapsed time of bins with a significant detection.
    pub met_detections: Vec<f64>,
    /// Fitted flux per detection bin.
    pub flux: Vec<f64>,
    /// Flux bounds per detection bin.
    pub flux_error: Vec<FluxBounds>,
    /// Fitted photon index per detection bin.
    pub photon_index: Vec<f64>,
    /// Photon-index uncertainty per detection bin.
    pub photon_index_interval: Vec<f64>,

    /// Mission elapsed time of bins without a significant detection.
    pub met_upperlimits: Vec<f64>,
    /// Flux upper limit per upper-limit bin.
    pub flux_upper_limits: Vec<f64>,

    /// Delta log-likelihood per bin.
    pub dlogl: Vec<f64>,
    /// Isotropic background normalization per bin.
    #[serde(rename = "EG")]
    pub eg: Vec<f64>,
    /// Galactic background normalization per bin.
    #[serde(rename = "GAL")]
    pub gal: Vec<f64>,
    /// Repository bin identifier per bin.
    pub bin_id: Vec<i64>,
}
