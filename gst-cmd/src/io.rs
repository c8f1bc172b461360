//! File loading and CSV output for the commands.

use anyhow::Context;
use geostradamus::{ForecastConfig, ObservationSet};
use log::info;
use serde::Serialize;
use std::fs::File;

/// Load and validate observations from a `date,y,lat,lng` CSV file.
pub fn load_observations(path: &str) -> anyhow::Result<ObservationSet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open observations CSV {}", path))?;
    ObservationSet::from_csv_reader(file)
        .with_context(|| format!("invalid observations in {}", path))
}

/// Load forecast settings from a JSON file, or the defaults when no file is given.
pub fn load_settings(path: Option<&str>) -> anyhow::Result<ForecastConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path))?;
            let config = ForecastConfig::from_json(&json)
                .with_context(|| format!("invalid settings in {}", path))?;
            Ok(config)
        }
        None => Ok(ForecastConfig::default()),
    }
}

/// Write serializable rows to a CSV file with a header row.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> anyhow::Result<()> {
    let mut wtr =
        csv::Writer::from_path(path).with_context(|| format!("failed to create {}", path))?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!("Wrote {} rows to {}", rows.len(), path);
    Ok(())
}
