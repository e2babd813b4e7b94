use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Display per-field entry counts of an extracted JSON record
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let handle = File::open(&file).context("Failed to open file")?;
    let record: serde_json::Value =
        serde_json::from_reader(BufReader::new(handle)).context("Failed to parse JSON record")?;
    let record = record
        .as_object()
        .context("Record is not a JSON object")?;

    println!("Light-Curve Record Information");
    println!("==============================");
    println!("File: {}", file.display());
    println!();

    println!("Fields:");
    for (key, value) in record {
        let count = value.as_array().map(|a| a.len()).unwrap_or(0);
        println!("  {:22} {:6} entries", key, count);
    }
    println!();

    // MET coverage from the test-statistic field, which spans every bin
    if let Some(entries) = record.get("ts").and_then(|v| v.as_array()) {
        let mets: Vec<i64> = entries
            .iter()
            .filter_map(|e| e.as_array()?.first()?.as_i64())
            .collect();
        if let (Some(first), Some(last)) = (mets.first(), mets.last()) {
            println!("MET coverage:");
            println!("  First bin: {}", first);
            println!("  Last bin:  {}", last);
            println!(
                "  Span:      {:.1} days",
                (last - first) as f64 / 86_400.0
            );
        }
    }

    Ok(())
}
