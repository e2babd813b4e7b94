//! Input boundary to the light-curve retrieval layer.
//!
//! [`LightCurveProvider`] is the seam behind which the actual data-access
//! implementation lives. The only concrete provider shipped here is
//! [`JsonPayloadProvider`], which maps a repository payload document (the
//! JSON dump of a single query result) onto the [`LightCurve`] contract.
//! A payload of `null` is the repository's no-data sentinel and maps to
//! `Ok(None)`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::lightcurve::{FluxBounds, LightCurve, LightCurveQuery};

/// Errors produced at the retrieval boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// I/O error reading a payload document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload document is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected column absent from the retrieved record
    #[error("missing field in light-curve record: {0}")]
    MissingField(&'static str),
}

/// A source of light curves keyed by query parameters.
///
/// Implementations perform no retries and no caching; the query is passed
/// through untouched.
pub trait LightCurveProvider {
    /// Retrieve the light curve matching `query`, or `None` when the
    /// repository has no data for it.
    fn get_light_curve(
        &self,
        query: &LightCurveQuery,
    ) -> Result<Option<LightCurve>, ProviderError>;
}

/// Provider backed by a repository payload document on disk.
#[derive(Debug, Clone)]
pub struct JsonPayloadProvider {
    path: PathBuf,
}

impl JsonPayloadProvider {
    /// Provider reading the payload document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the payload document.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LightCurveProvider for JsonPayloadProvider {
    fn get_light_curve(
        &self,
        query: &LightCurveQuery,
    ) -> Result<Option<LightCurve>, ProviderError> {
        debug!(
            "loading payload {} for '{}' ({} / {} / {} / tsmin{})",
            self.path.display(),
            query.source_name,
            query.cadence,
            query.flux_type,
            query.index_type,
            query.ts_min
        );
        let file = File::open(&self.path)?;
        let raw: Option<RawLightCurve> = serde_json::from_reader(BufReader::new(file))?;
        match raw {
            Some(raw) => raw.into_light_curve().map(Some),
            None => Ok(None),
        }
    }
}

/// Raw shape of a payload document. Every column is optional at this layer
/// so that an absent one surfaces as [`ProviderError::MissingField`] with
/// the column's name instead of an opaque deserialization failure.
#[derive(Debug, Default, Deserialize)]
struct RawLightCurve {
    met: Option<Vec<f64>>,
    ts: Option<Vec<f64>>,
    fit_tolerance: Option<Vec<f64>>,
    // Integer-valued columns arrive as JSON integers or floats depending on
    // how the payload was produced; both are accepted and truncated.
    fit_convergence: Option<Vec<f64>>,
    met_detections: Option<Vec<f64>>,
    flux: Option<Vec<f64>>,
    flux_error: Option<Vec<FluxBounds>>,
    photon_index: Option<Vec<f64>>,
    photon_index_interval: Option<Vec<f64>>,
    met_upperlimits: Option<Vec<f64>>,
    flux_upper_limits: Option<Vec<f64>>,
    dlogl: Option<Vec<f64>>,
    #[serde(rename = "EG")]
    eg: Option<Vec<f64>>,
    #[serde(rename = "GAL")]
    gal: Option<Vec<f64>>,
    bin_id: Option<Vec<f64>>,
}

fn column<T>(value: Option<Vec<T>>, name: &'static str) -> Result<Vec<T>, ProviderError> {
    value.ok_or(ProviderError::MissingField(name))
}

fn int_column(value: Option<Vec<f64>>, name: &'static str) -> Result<Vec<i64>, ProviderError> {
    Ok(column(value, name)?.into_iter().map(|v| v as i64).collect())
}

impl RawLightCurve {
    fn into_light_curve(self) -> Result<LightCurve, ProviderError> {
        Ok(LightCurve {
            met: column(self.met, "met")?,
            ts: column(self.ts, "ts")?,
            fit_tolerance: column(self.fit_tolerance, "fit_tolerance")?,
            fit_convergence: int_column(self.fit_convergence, "fit_convergence")?,
            met_detections: column(self.met_detections, "met_detections")?,
            flux: column(self.flux, "flux")?,
            flux_error: column(self.flux_error, "flux_error")?,
            photon_index: column(self.photon_index, "photon_index")?,
            photon_index_interval: column(self.photon_index_interval, "photon_index_interval")?,
            met_upperlimits: column(self.met_upperlimits, "met_upperlimits")?,
            flux_upper_limits: column(self.flux_upper_limits, "flux_upper_limits")?,
            dlogl: column(self.dlogl, "dlogl")?,
            eg: column(self.eg, "EG")?,
            gal: column(self.gal, "GAL")?,
            bin_id: int_column(self.bin_id, "bin_id")?,
        })
    }
}
