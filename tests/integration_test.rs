//! Integration tests for lcr-extract
//!
//! These tests verify the full pipeline from payload document to extracted
//! JSON record.

use lcr_extract::extract::{fetch_record, output_file_name, persist};
use lcr_extract::lightcurve::{Cadence, FluxType, IndexType, LightCurveQuery};
use lcr_extract::provider::JsonPayloadProvider;
use lcr_extract::reshape::ReshapedRecord;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn crab_payload() -> serde_json::Value {
    json!({
        "met": [239557417.7, 242149417.2, 244741417.9],
        "ts": [25.0, 3.1, 48.2],
        "fit_tolerance": [0.01, 0.01, 0.001],
        "fit_convergence": [0, 0, 2],
        "met_detections": [239557417.7, 244741417.9],
        "flux": [1.2e-6, 2.4e-6],
        "flux_error": [
            {"lower": 1.0e-6, "upper": 1.4e-6},
            {"lower": 2.0e-6, "upper": 2.9e-6}
        ],
        "photon_index": [2.1, 2.3],
        "photon_index_interval": [0.08, 0.11],
        "met_upperlimits": [242149417.2],
        "flux_upper_limits": [3.0e-7],
        "dlogl": [1.5, 1.4, 1.6],
        "EG": [1.02, 0.98, 1.00],
        "GAL": [0.99, 1.01, 1.00],
        "bin_id": [1, 2, 3]
    })
}

fn write_payload(dir: &Path, value: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("payload.json");
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

/// Test the complete payload-to-record cycle
#[test]
fn test_extract_cycle() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &crab_payload());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("Crab Nebula 21");

    let written = persist(&provider, &query, &out).unwrap().unwrap();
    assert_eq!(
        written,
        out.join("Crab_2021_monthly_energy_fixed_tsmin4.json")
    );

    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();

    // Timestamps are truncated integers leading every entry
    assert_eq!(record["ts"][0], json!([239557417, 25.0]));
    assert_eq!(record["ts"][1], json!([242149417, 3.1]));

    // Detection family pairs with met_detections
    assert_eq!(record["flux"], json!([[239557417, 1.2e-6], [244741417, 2.4e-6]]));
    assert_eq!(
        record["flux_error"],
        json!([[239557417, 1.0e-6, 1.4e-6], [244741417, 2.0e-6, 2.9e-6]])
    );

    // The single interval value fills both trailing slots
    assert_eq!(
        record["photon_index_interval"],
        json!([[239557417, 0.08, 0.08], [244741417, 0.11, 0.11]])
    );

    // Upper-limit family
    assert_eq!(record["flux_upper_limits"], json!([[242149417, 3.0e-7]]));

    // Plain per-bin sequences come through verbatim
    assert_eq!(record["dlogl"], json!([1.5, 1.4, 1.6]));
    assert_eq!(record["EG"], json!([1.02, 0.98, 1.00]));
    assert_eq!(record["GAL"], json!([0.99, 1.01, 1.00]));
    assert_eq!(record["bin_id"], json!([1, 2, 3]));
}

#[test]
fn test_null_payload_writes_nothing() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &serde_json::Value::Null);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("Crab Nebula 21");

    assert!(persist(&provider, &query, &out).unwrap().is_none());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

#[test]
fn test_fetch_record_reshapes_payload() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &crab_payload());

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("Crab Nebula 21");

    let record = fetch_record(&provider, &query).unwrap().unwrap();
    assert_eq!(record.ts.len(), 3);
    assert_eq!(record.flux.len(), 2);
    assert_eq!(record.flux_upper_limits.len(), 1);
    assert_eq!(record.fit_convergence[2], (244741417, 2));
}

#[test]
fn test_written_record_round_trips() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &crab_payload());

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("Crab Nebula 21");
    let record = fetch_record(&provider, &query).unwrap().unwrap();

    let written = persist(&provider, &query, dir.path()).unwrap().unwrap();
    let back: ReshapedRecord =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();
    assert_eq!(back, record);
}

#[test]
fn test_file_name_reflects_every_parameter() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &crab_payload());

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("PKS 2155-304 19")
        .with_cadence(Cadence::Daily)
        .with_flux_type(FluxType::Photon)
        .with_index_type(IndexType::Free)
        .with_ts_min(9);

    assert_eq!(
        output_file_name(&query).unwrap(),
        "PKS_2019_daily_photon_free_tsmin9.json"
    );
    let written = persist(&provider, &query, dir.path()).unwrap().unwrap();
    assert_eq!(
        written.file_name().unwrap().to_str().unwrap(),
        "PKS_2019_daily_photon_free_tsmin9.json"
    );
}

#[test]
fn test_every_leaf_is_a_plain_json_number() {
    let dir = tempdir().unwrap();
    let payload = write_payload(dir.path(), &crab_payload());

    let provider = JsonPayloadProvider::new(&payload);
    let query = LightCurveQuery::new("Crab Nebula 21");
    let written = persist(&provider, &query, dir.path()).unwrap().unwrap();
    let record: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&written).unwrap()).unwrap();

    fn assert_numeric_leaves(value: &serde_json::Value) {
        match value {
            serde_json::Value::Number(_) => {}
            serde_json::Value::Array(items) => items.iter().for_each(assert_numeric_leaves),
            other => panic!("non-numeric leaf in record: {other:?}"),
        }
    }
    for (_, field) in record.as_object().unwrap() {
        assert_numeric_leaves(field);
    }
}

#[test]
fn test_mismatched_family_lengths_truncate() {
    let dir = tempdir().unwrap();
    let mut payload = crab_payload();
    // one more detection timestamp than paired values
    payload["met_detections"] = json!([239557417.7, 244741417.9, 247333417.0]);
    let path = write_payload(dir.path(), &payload);

    let provider = JsonPayloadProvider::new(&path);
    let query = LightCurveQuery::new("Crab Nebula 21");
    let record = fetch_record(&provider, &query).unwrap().unwrap();

    assert_eq!(record.flux.len(), 2);
    assert_eq!(record.flux_error.len(), 2);
    assert_eq!(record.photon_index.len(), 2);
    assert_eq!(record.photon_index_interval.len(), 2);
}
