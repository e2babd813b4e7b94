use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use lcr_extract::extract::persist;
use lcr_extract::lightcurve::{FluxBounds, LightCurve, LightCurveQuery};
use lcr_extract::provider::JsonPayloadProvider;

/// Mission elapsed time of the first demo bin, seconds.
const START_MET: f64 = 239_557_417.0;

/// Monthly bin width, seconds.
const BIN_WIDTH: f64 = 2_592_000.0;

/// Number of demo bins.
const BINS: usize = 24;

/// Generate a synthetic payload document and extract it
pub fn run(save_path: PathBuf) -> Result<()> {
    info!("Generating synthetic monthly light curve ({} bins)", BINS);

    let curve = generate_demo_curve();
    let payload_path = save_path.join("demo_payload.json");
    let file = File::create(&payload_path)
        .with_context(|| format!("Failed to create {}", payload_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &curve).context("Failed to write demo payload")?;
    writer.flush().context("Failed to write demo payload")?;
    info!("Payload written to {}", payload_path.display());

    let query = LightCurveQuery::new("Demo Source 08");
    let provider = JsonPayloadProvider::new(&payload_path);
    let written = persist(&provider, &query, &save_path).context("Demo extraction failed")?;

    match written {
        Some(path) => {
            println!("Payload: {}", payload_path.display());
            println!("Record:  {}", path.display());
        }
        None => anyhow::bail!("Demo payload unexpectedly produced no data"),
    }
    Ok(())
}

/// Deterministic mock of a monthly flaring source: a smooth flux modulation
/// with every bin below the detection threshold reported as an upper limit.
fn generate_demo_curve() -> LightCurve {
    let mut curve = LightCurve::default();
    for i in 0..BINS {
        let met = START_MET + i as f64 * BIN_WIDTH;
        let phase = i as f64 * 0.7;
        let ts = 12.0 + 10.0 * phase.sin();
        let flux = 1.0e-6 * (1.0 + 0.5 * phase.cos());

        curve.met.push(met);
        curve.ts.push(ts);
        curve.fit_tolerance.push(0.01);
        curve.fit_convergence.push(0);
        curve.dlogl.push(1.5 + 0.1 * phase.sin());
        curve.eg.push(1.0 + 0.02 * phase.cos());
        curve.gal.push(1.0 - 0.02 * phase.sin());
        curve.bin_id.push(i as i64 + 1);

        if ts >= 4.0 {
            curve.met_detections.push(met);
            curve.flux.push(flux);
            curve.flux_error.push(FluxBounds {
                lower: flux * 0.8,
                upper: flux * 1.2,
            });
            curve.photon_index.push(2.2 + 0.1 * phase.sin());
            curve.photon_index_interval.push(0.08);
        } else {
            curve.met_upperlimits.push(met);
            curve.flux_upper_limits.push(flux * 0.5);
        }
    }
    curve
}
