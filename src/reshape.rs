//! Reshaping a retrieved [`LightCurve`] into the output record.
//!
//! The reshaper pairs every value sequence with its family's timestamp
//! sequence, truncating mission elapsed times to plain integers in the
//! process. Pairing uses [`Iterator::zip`], so when a family's sequences
//! disagree in length the output stops at the shorter one; nothing pads or
//! errors.

use serde::{Deserialize, Serialize};

use crate::lightcurve::{FluxBounds, LightCurve};

/// The normalized record written to disk, keyed by the repository's
/// conventional field names.
///
/// Timestamped fields hold `[timestamp, value...]` entries; `dlogl`, `EG`,
/// `GAL` and `bin_id` are plain per-bin sequences. Field order here is the
/// serialized key order of the output document.
///
/// Built fresh per extraction by [`reshape`], never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReshapedRecord {
    /// `[met, test statistic]` per bin.
    pub ts: Vec<(i64, f64)>,
    /// `[met, flux]` per detection bin.
    pub flux: Vec<(i64, f64)>,
    /// `[met, flux upper limit]` per upper-limit bin.
    pub flux_upper_limits: Vec<(i64, f64)>,
    /// `[met, lower bound, upper bound]` per detection bin.
    pub flux_error: Vec<(i64, f64, f64)>,
    /// `[met, photon index]` per detection bin.
    pub photon_index: Vec<(i64, f64)>,
    /// `[met, interval, interval]` per detection bin. The repository reports
    /// a single interval value; it fills both trailing slots.
    pub photon_index_interval: Vec<(i64, f64, f64)>,
    /// `[met, fit tolerance]` per bin.
    pub fit_tolerance: Vec<(i64, f64)>,
    /// `[met, fit convergence code]` per bin.
    pub fit_convergence: Vec<(i64, i64)>,
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

/// Reshape a retrieved light curve into the output record.
///
/// Pure transformation: no I/O, no failure modes. Timestamps are truncated
/// toward zero; values keep their native form.
pub fn reshape(lc: &LightCurve) -> ReshapedRecord {
    ReshapedRecord {
        ts: timestamped(&lc.met, &lc.ts),
        flux: timestamped(&lc.met_detections, &lc.flux),
        flux_upper_limits: timestamped(&lc.met_upperlimits, &lc.flux_upper_limits),
        flux_error: unpacked_bounds(&lc.met_detections, &lc.flux_error),
        photon_index: timestamped(&lc.met_detections, &lc.photon_index),
        photon_index_interval: duplicated(&lc.met_detections, &lc.photon_index_interval),
        fit_tolerance: timestamped(&lc.met, &lc.fit_tolerance),
        fit_convergence: lc
            .met
            .iter()
            .zip(&lc.fit_convergence)
            .map(|(&met, &code)| (met as i64, code))
            .collect(),
        dlogl: lc.dlogl.clone(),
        eg: lc.eg.clone(),
        gal: lc.gal.clone(),
        bin_id: lc.bin_id.clone(),
    }
}

fn timestamped(met: &[f64], values: &[f64]) -> Vec<(i64, f64)> {
    met.iter()
        .zip(values)
        .map(|(&met, &value)| (met as i64, value))
        .collect()
}

fn unpacked_bounds(met: &[f64], bounds: &[FluxBounds]) -> Vec<(i64, f64, f64)> {
    met.iter()
        .zip(bounds)
        .map(|(&met, b)| (met as i64, b.lower, b.upper))
        .collect()
}

fn duplicated(met: &[f64], intervals: &[f64]) -> Vec<(i64, f64, f64)> {
    met.iter()
        .zip(intervals)
        .map(|(&met, &interval)| (met as i64, interval, interval))
        .collect()
}
