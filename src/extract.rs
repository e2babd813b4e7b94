//! The extraction pipeline: retrieve, reshape, and persist a light curve.
//!
//! [`fetch_record`] is the retrieval adapter: it asks a
//! [`LightCurveProvider`] for the curve matching a query and reshapes the
//! result, treating the repository's no-data sentinel as `None` rather than
//! an error. [`persist`] runs the full pipeline and writes the normalized
//! record to a JSON file whose name encodes the query parameters.
//!
//! Each call is independent and synchronous; nothing is shared across calls
//! besides the output directory, so distinct queries may run concurrently as
//! long as they target distinct files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::lightcurve::LightCurveQuery;
use crate::normalize::{record_to_value, NormalizeError};
use crate::provider::{LightCurveProvider, ProviderError};
use crate::reshape::{reshape, ReshapedRecord};

/// Errors produced by the extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Error at the retrieval boundary
    #[error("retrieval error: {0}")]
    Provider(#[from] ProviderError),

    /// Record contains a value that cannot be encoded as JSON
    #[error("normalization error: {0}")]
    Normalize(#[from] NormalizeError),

    /// I/O error writing the output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error writing the output file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Source name yields no tokens to derive a file name from
    #[error("cannot derive a file name from source name {0:?}")]
    SourceNameFormat(String),
}

/// Retrieve and reshape the light curve matching `query`.
///
/// `Ok(None)` means the repository has no data for the query; every other
/// failure propagates. No retries, no caching, no parameter validation;
/// the query goes through to the provider untouched.
pub fn fetch_record<P: LightCurveProvider>(
    provider: &P,
    query: &LightCurveQuery,
) -> Result<Option<ReshapedRecord>, ProviderError> {
    Ok(provider.get_light_curve(query)?.map(|lc| reshape(&lc)))
}

/// Derive the output file name for `query`.
///
/// The stem joins the first whitespace-delimited token of the source name
/// with `"20"` plus its last token, so a name whose final token is a
/// two-digit catalog year, e.g. `"4FGL J0534.5+2201 21"`, becomes
/// `4FGL_2021`. Names not ending in such a token still produce a stem from
/// whatever the last token is; that coupling to the repository's naming
/// convention is deliberate and matches the file names downstream consumers
/// expect. A name with no tokens at all fails with
/// [`ExtractError::SourceNameFormat`].
pub fn output_file_name(query: &LightCurveQuery) -> Result<String, ExtractError> {
    let tokens: Vec<&str> = query.source_name.split_whitespace().collect();
    let (first, last) = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ExtractError::SourceNameFormat(query.source_name.clone())),
    };
    Ok(format!(
        "{first}_20{last}_{}_{}_{}_tsmin{}.json",
        query.cadence, query.flux_type, query.index_type, query.ts_min
    ))
}

/// Run the full pipeline for `query` and write the result under
/// `save_path`, overwriting any existing file.
///
/// Returns the written path, or `Ok(None)` without touching the filesystem
/// when the repository has no data. `save_path` must already exist; missing
/// directories and permission failures propagate as [`ExtractError::Io`].
pub fn persist<P: LightCurveProvider>(
    provider: &P,
    query: &LightCurveQuery,
    save_path: &Path,
) -> Result<Option<PathBuf>, ExtractError> {
    let record = match fetch_record(provider, query)? {
        Some(record) => record,
        None => {
            info!("no data for '{}', skipping", query.source_name);
            return Ok(None);
        }
    };
    debug!(
        "reshaped '{}': {} bins, {} detections, {} upper limits",
        query.source_name,
        record.ts.len(),
        record.flux.len(),
        record.flux_upper_limits.len()
    );

    let value = record_to_value(&record)?;
    let path = save_path.join(output_file_name(query)?);
    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer(&mut writer, &value)?;
    writer.flush()?;

    info!("wrote {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightcurve::{Cadence, FluxType, IndexType, LightCurve};

    /// Provider returning a fixed curve, or no data when `curve` is `None`.
    struct FixedProvider {
        curve: Option<LightCurve>,
    }

    impl LightCurveProvider for FixedProvider {
        fn get_light_curve(
            &self,
            _query: &LightCurveQuery,
        ) -> Result<Option<LightCurve>, ProviderError> {
            Ok(self.curve.clone())
        }
    }

    fn sample_curve() -> LightCurve {
        LightCurve {
            met: vec![239557417.0],
            ts: vec![25.0],
            fit_tolerance: vec![0.01],
            fit_convergence: vec![0],
            met_detections: vec![239557417.0],
            flux: vec![1.2e-6],
            flux_error: vec![crate::lightcurve::FluxBounds {
                lower: 1.0e-6,
                upper: 1.4e-6,
            }],
            photon_index: vec![2.1],
            photon_index_interval: vec![0.08],
            dlogl: vec![1.5],
            eg: vec![1.02],
            gal: vec![0.99],
            bin_id: vec![1],
            ..LightCurve::default()
        }
    }

    #[test]
    fn test_file_name_encodes_query() {
        let query = LightCurveQuery::new("Crab Nebula 21")
            .with_cadence(Cadence::Monthly)
            .with_flux_type(FluxType::Energy)
            .with_index_type(IndexType::Fixed)
            .with_ts_min(4);
        assert_eq!(
            output_file_name(&query).unwrap(),
            "Crab_2021_monthly_energy_fixed_tsmin4.json"
        );
    }

    #[test]
    fn test_file_name_single_token_repeats_it() {
        // No space to split on: first and last token are both the whole
        // name, mirroring how the repository names such sources.
        let query = LightCurveQuery::new("Crab");
        assert_eq!(
            output_file_name(&query).unwrap(),
            "Crab_20Crab_monthly_energy_fixed_tsmin4.json"
        );
    }

    #[test]
    fn test_blank_source_name_is_an_error() {
        for name in ["", "   "] {
            let query = LightCurveQuery::new(name);
            assert!(matches!(
                output_file_name(&query),
                Err(ExtractError::SourceNameFormat(_))
            ));
        }
    }

    #[test]
    fn test_no_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider { curve: None };
        let query = LightCurveQuery::new("4FGL J0534.5+2201 21");

        let written = persist(&provider, &query, dir.path()).unwrap();
        assert!(written.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_persist_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider {
            curve: Some(sample_curve()),
        };
        let query = LightCurveQuery::new("4FGL J0534.5+2201 21").with_cadence(Cadence::Weekly);

        let path = persist(&provider, &query, dir.path()).unwrap().unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "4FGL_2021_weekly_energy_fixed_tsmin4.json"
        );
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["ts"][0][0], 239557417);
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider {
            curve: Some(sample_curve()),
        };
        let query = LightCurveQuery::new("4FGL J0534.5+2201 21");

        let path = dir.path().join(output_file_name(&query).unwrap());
        std::fs::write(&path, "stale").unwrap();
        persist(&provider, &query, dir.path()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with('{'));
    }

    #[test]
    fn test_missing_save_path_propagates_io_error() {
        let provider = FixedProvider {
            curve: Some(sample_curve()),
        };
        let query = LightCurveQuery::new("4FGL J0534.5+2201 21");
        let err = persist(&provider, &query, Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn test_non_finite_value_fails_persist() {
        let mut curve = sample_curve();
        curve.flux[0] = f64::NAN;
        let dir = tempfile::tempdir().unwrap();
        let provider = FixedProvider { curve: Some(curve) };
        let query = LightCurveQuery::new("4FGL J0534.5+2201 21");
        let err = persist(&provider, &query, dir.path()).unwrap_err();
        assert!(matches!(err, ExtractError::Normalize(_)));
    }
}
