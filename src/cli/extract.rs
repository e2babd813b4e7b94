use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use lcr_extract::extract::persist;
use lcr_extract::lightcurve::{Cadence, FluxType, IndexType, LightCurveQuery};
use lcr_extract::provider::JsonPayloadProvider;

/// Extract a repository payload document into a named JSON record
pub fn run(
    payload: PathBuf,
    source_name: String,
    cadence: Cadence,
    flux_type: FluxType,
    index_type: IndexType,
    ts_min: u32,
    save_path: PathBuf,
) -> Result<()> {
    if !payload.exists() {
        anyhow::bail!("Payload document does not exist: {}", payload.display());
    }

    let query = LightCurveQuery::new(source_name)
        .with_cadence(cadence)
        .with_flux_type(flux_type)
        .with_index_type(index_type)
        .with_ts_min(ts_min);

    info!("Extracting '{}' from {}", query.source_name, payload.display());

    let provider = JsonPayloadProvider::new(&payload);
    let written = persist(&provider, &query, &save_path)
        .with_context(|| format!("Extraction failed for '{}'", query.source_name))?;

    match written {
        Some(path) => println!("Wrote {}", path.display()),
        None => println!("No data for '{}', nothing written", query.source_name),
    }
    Ok(())
}
