use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use lcr_extract::extract::persist;
use lcr_extract::provider::JsonPayloadProvider;

use super::config::BatchConfig;

/// Extract every source listed in a TOML configuration file
pub fn run(config_path: PathBuf, save_path: Option<PathBuf>) -> Result<()> {
    let config = BatchConfig::from_file(&config_path)?;
    let save_path = save_path
        .or_else(|| config.save_path.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    if config.sources.is_empty() {
        warn!("Configuration lists no sources: {}", config_path.display());
        return Ok(());
    }

    info!(
        "Extracting {} source(s) into {}",
        config.sources.len(),
        save_path.display()
    );

    let mut written = 0usize;
    let mut skipped = 0usize;
    for source in &config.sources {
        let query = source.query(&config.defaults);
        let provider = JsonPayloadProvider::new(&source.payload);
        let result = persist(&provider, &query, &save_path)
            .with_context(|| format!("Extraction failed for '{}'", query.source_name))?;
        match result {
            Some(path) => {
                println!("Wrote {}", path.display());
                written += 1;
            }
            None => {
                println!("No data for '{}', nothing written", query.source_name);
                skipped += 1;
            }
        }
    }

    println!("Done: {} written, {} without data", written, skipped);
    Ok(())
}
