//! Forecast and synthesize commands.

use crate::{io, QueryArgs};
use geostradamus::{Geostradamus, KernelKind, SmootherKind};
use log::info;

/// Load the observations and assemble the orchestrator from the query arguments.
fn build(query: &QueryArgs) -> anyhow::Result<Geostradamus> {
    let observations = io::load_observations(&query.data)?;
    let kernel = KernelKind::from(query.kernel).build(query.bandwidth)?;
    let smoother = SmootherKind::from(query.smoother).build();
    Ok(Geostradamus::new(observations)
        .with_boxed_kernel(kernel)
        .with_boxed_smoother(smoother))
}

/// Forecast at the query point and write the prediction table.
pub fn run_forecast(
    query: &QueryArgs,
    periods: usize,
    settings: Option<&str>,
    output: &str,
) -> anyhow::Result<()> {
    let config = io::load_settings(settings)?;
    let geo = build(query)?;

    info!(
        "Forecasting {} periods at ({}, {}) with {:?} kernel, bandwidth {} km",
        periods, query.lat, query.lng, query.kernel, query.bandwidth
    );
    let predictions = geo.fit(query.lat, query.lng, periods, &config)?;
    io::write_csv(output, &predictions)?;

    info!("Forecast complete. Output: {}", output);
    Ok(())
}

/// Write the synthesized series at the query point.
pub fn run_synthesize(query: &QueryArgs, output: &str) -> anyhow::Result<()> {
    let geo = build(query)?;
    let series = geo.synthesize(query.lat, query.lng)?;
    io::write_csv(output, series.points())?;

    info!("Synthesis complete. Output: {}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{KernelArg, SmootherArg};
    use std::path::Path;

    const OBSERVATIONS: &str = "date,y,lat,lng
2023-01-01,10.0,42.0,-72.0
2023-01-01,20.0,42.5,-72.5
2023-01-02,11.0,42.0,-72.0
2023-01-02,21.0,42.5,-72.5
2023-01-03,12.0,42.0,-72.0
2023-01-03,22.0,42.5,-72.5
2023-01-04,13.0,42.0,-72.0
";

    fn query_args(data: &Path) -> QueryArgs {
        QueryArgs {
            data: data.to_string_lossy().into_owned(),
            lat: 42.0,
            lng: -72.0,
            kernel: KernelArg::Gaussian,
            bandwidth: 50.0,
            smoother: SmootherArg::WeightedMean,
        }
    }

    fn read_rows(path: &Path) -> (csv::StringRecord, Vec<csv::StringRecord>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        let rows = rdr.records().map(|r| r.unwrap()).collect();
        (headers, rows)
    }

    #[test]
    fn test_run_forecast_writes_table() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("observations.csv");
        let settings = dir.path().join("settings.json");
        let output = dir.path().join("predictions.csv");
        std::fs::write(&data, OBSERVATIONS).unwrap();
        std::fs::write(&settings, r#"{"interval_width": 0.8}"#).unwrap();

        run_forecast(
            &query_args(&data),
            3,
            Some(settings.to_str().unwrap()),
            output.to_str().unwrap(),
        )
        .unwrap();

        let (headers, rows) = read_rows(&output);
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["timestamp", "observed", "point_estimate", "lower_bound", "upper_bound"]
        );
        assert_eq!(rows.len(), 4 + 3);
        assert_eq!(rows[0].get(0), Some("2023-01-01 00:00:00"));
        assert_eq!(rows[6].get(0), Some("2023-01-07 00:00:00"));
        assert_eq!(rows[3].get(1), Some("13.0"));
        assert_eq!(rows[4].get(1), Some(""));
    }

    #[test]
    fn test_run_synthesize_writes_series() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("observations.csv");
        let output = dir.path().join("series.csv");
        std::fs::write(&data, OBSERVATIONS).unwrap();

        run_synthesize(&query_args(&data), output.to_str().unwrap()).unwrap();

        let (headers, rows) = read_rows(&output);
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["timestamp", "value"]);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[3].get(1), Some("13.0"));
    }

    #[test]
    fn test_unknown_setting_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("observations.csv");
        let settings = dir.path().join("settings.json");
        let output = dir.path().join("predictions.csv");
        std::fs::write(&data, OBSERVATIONS).unwrap();
        std::fs::write(&settings, r#"{"holidays_prior_scale": 10.0}"#).unwrap();

        let result = run_forecast(
            &query_args(&data),
            3,
            Some(settings.to_str().unwrap()),
            output.to_str().unwrap(),
        );
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_data_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("series.csv");
        let query = query_args(&dir.path().join("nope.csv"));
        let result = run_synthesize(&query, output.to_str().unwrap());
        assert!(result.is_err());
    }
}
