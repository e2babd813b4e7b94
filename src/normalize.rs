//! Value normalization ahead of JSON serialization.
//!
//! [`record_to_value`] lowers a [`ReshapedRecord`] into a
//! [`serde_json::Value`] tree in which every numeric leaf is a plain JSON
//! number and every timestamped entry a nested array. This is the single
//! point where a value can turn out not to be JSON-representable: JSON has
//! no encoding for non-finite floats, so a NaN or infinity anywhere in the
//! record fails with the offending key and index instead of producing an
//! invalid document.

use serde_json::{Map, Number, Value};

use crate::reshape::ReshapedRecord;

/// Errors produced while lowering a record to a JSON value tree.
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    /// A float with no JSON number representation
    #[error("non-finite value {value} at {key}[{index}] cannot be encoded as JSON")]
    NonFinite {
        /// Serialized key of the offending field.
        key: &'static str,
        /// Entry index within the field.
        index: usize,
        /// The unrepresentable value.
        value: f64,
    },
}

/// Lower a record to a JSON value tree with the output document's exact key
/// order.
pub fn record_to_value(record: &ReshapedRecord) -> Result<Value, NormalizeError> {
    let mut doc = Map::new();
    doc.insert("ts".into(), pairs("ts", &record.ts)?);
    doc.insert("flux".into(), pairs("flux", &record.flux)?);
    doc.insert(
        "flux_upper_limits".into(),
        pairs("flux_upper_limits", &record.flux_upper_limits)?,
    );
    doc.insert(
        "flux_error".into(),
        triples("flux_error", &record.flux_error)?,
    );
    doc.insert(
        "photon_index".into(),
        pairs("photon_index", &record.photon_index)?,
    );
    doc.insert(
        "photon_index_interval".into(),
        triples("photon_index_interval", &record.photon_index_interval)?,
    );
    doc.insert(
        "fit_tolerance".into(),
        pairs("fit_tolerance", &record.fit_tolerance)?,
    );
    doc.insert(
        "fit_convergence".into(),
        int_pairs(&record.fit_convergence),
    );
    doc.insert("dlogl".into(), scalars("dlogl", &record.dlogl)?);
    doc.insert("EG".into(), scalars("EG", &record.eg)?);
    doc.insert("GAL".into(), scalars("GAL", &record.gal)?);
    doc.insert(
        "bin_id".into(),
        Value::Array(record.bin_id.iter().map(|&id| id.into()).collect()),
    );
    Ok(Value::Object(doc))
}

fn number(key: &'static str, index: usize, value: f64) -> Result<Value, NormalizeError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or(NormalizeError::NonFinite { key, index, value })
}

fn pairs(key: &'static str, entries: &[(i64, f64)]) -> Result<Value, NormalizeError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, &(met, value))| Ok(Value::Array(vec![met.into(), number(key, i, value)?])))
        .collect::<Result<_, _>>()
        .map(Value::Array)
}

fn triples(key: &'static str, entries: &[(i64, f64, f64)]) -> Result<Value, NormalizeError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, &(met, a, b))| {
            Ok(Value::Array(vec![
                met.into(),
                number(key, i, a)?,
                number(key, i, b)?,
            ]))
        })
        .collect::<Result<_, _>>()
        .map(Value::Array)
}

fn int_pairs(entries: &[(i64, i64)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|&(met, value)| Value::Array(vec![met.into(), value.into()]))
            .collect(),
    )
}

fn scalars(key: &'static str, values: &[f64]) -> Result<Value, NormalizeError> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| number(key, i, value))
        .collect::<Result<_, _>>()
        .map(Value::Array)
}
