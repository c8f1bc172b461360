use crate::{
    error::{GeoError, Result},
    location::Location,
};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, io::Read};

/// Column headers required in observation CSV input.
pub const CSV_HEADERS: [&str; 4] = ["date", "y", "lat", "lng"];

/// A single geotagged measurement.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Observation {
    timestamp: NaiveDateTime,
    value: f64,
    location: Location,
}

/// One raw input row, before validation.
///
/// Extra columns are ignored; a missing column or a field that does not parse
/// as the declared type fails the whole load.
#[derive(Debug, Deserialize)]
struct InputRow {
    date: String,
    y: f64,
    lat: f64,
    lng: f64,
}

impl Observation {
    /// Build an observation, validating the coordinates and the value.
    pub fn new(
        timestamp: NaiveDateTime,
        value: f64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self> {
        if !value.is_finite() {
            return Err(GeoError::Validation(format!(
                "value {} at {} is not finite",
                value, timestamp
            )));
        }
        let location = Location::new(latitude, longitude)?;
        Ok(Observation {
            timestamp,
            value,
            location,
        })
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn location(&self) -> Location {
        self.location
    }
}

impl TryFrom<InputRow> for Observation {
    type Error = GeoError;

    fn try_from(row: InputRow) -> Result<Self> {
        let timestamp = gst_utils::dates::parse_timestamp(&row.date)
            .map_err(|e| GeoError::Validation(e.to_string()))?;
        Observation::new(timestamp, row.y, row.lat, row.lng)
    }
}

impl PartialEq for Observation {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.location == other.location
            && self.value.to_bits() == other.value.to_bits()
    }
}

impl Eq for Observation {}

/// The validated observations a forecast is built from.
///
/// Observations may come from any number of locations and need not share
/// timestamps. The set is read-only once constructed.
#[derive(Debug, Clone, Default)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    pub fn new(observations: Vec<Observation>) -> Self {
        ObservationSet { observations }
    }

    /// Parse observations from CSV text with a `date,y,lat,lng` header row.
    pub fn from_csv_str(csv_data: &str) -> Result<Self> {
        Self::from_csv_reader(csv_data.as_bytes())
    }

    /// Parse observations from any CSV source with a `date,y,lat,lng` header row.
    ///
    /// Fails on the first invalid row; no partial set is returned.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| GeoError::Validation(format!("unreadable header row: {}", e)))?
            .clone();
        for required in CSV_HEADERS {
            if !headers.iter().any(|h| h == required) {
                return Err(GeoError::Validation(format!(
                    "missing required column '{}'",
                    required
                )));
            }
        }

        let mut observations = Vec::new();
        for (index, result) in rdr.deserialize::<InputRow>().enumerate() {
            // header is line 1
            let line = index + 2;
            let row = result.map_err(|e| GeoError::Validation(format!("line {}: {}", line, e)))?;
            let observation = Observation::try_from(row)
                .map_err(|e| GeoError::Validation(format!("line {}: {}", line, e)))?;
            observations.push(observation);
        }
        log::info!("loaded {} observations", observations.len());
        Ok(ObservationSet { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Distinct locations, in order of first appearance.
    pub fn locations(&self) -> Vec<Location> {
        let mut seen = HashSet::new();
        self.observations
            .iter()
            .map(|o| o.location)
            .filter(|loc| seen.insert(*loc))
            .collect()
    }
}

impl From<Vec<Observation>> for ObservationSet {
    fn from(observations: Vec<Observation>) -> Self {
        ObservationSet::new(observations)
    }
}

impl FromIterator<Observation> for ObservationSet {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        ObservationSet::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod test {
    use super::{Observation, ObservationSet};
    use crate::{error::GeoError, location::Location};
    use chrono::NaiveDate;

    const STR_RESULT: &str = r#"date,y,lat,lng
2023-01-01,10.0,42.0,-72.0
2023-01-01,20.0,42.5,-72.5
2023-01-02,11.0,42.0,-72.0
2023-01-02,21.0,42.5,-72.5
2023-01-03,12.0,42.0,-72.0
"#;

    #[test]
    fn test_from_csv_str() {
        let set = ObservationSet::from_csv_str(STR_RESULT).unwrap();
        assert_eq!(set.len(), 5);
        let first = *set.iter().next().unwrap();
        assert_eq!(first.value(), 10.0);
        assert_eq!(
            first.timestamp().date(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
        assert_eq!(first.location(), Location::new(42.0, -72.0).unwrap());
    }

    #[test]
    fn test_extra_columns_and_reordered_headers() {
        let csv_data = "station,lng,lat,y,date\nGRZ,-120.25,38.75,3.5,2022-02-15\n";
        let set = ObservationSet::from_csv_str(csv_data).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().value(), 3.5);
    }

    #[test]
    fn test_missing_column_is_validation_error() {
        let csv_data = "date,y,lat\n2023-01-01,1.0,42.0\n";
        let err = ObservationSet::from_csv_str(csv_data).unwrap_err();
        assert!(matches!(err, GeoError::Validation(ref msg) if msg.contains("lng")));
    }

    #[test]
    fn test_wrong_type_is_validation_error() {
        let csv_data = "date,y,lat,lng\n2023-01-01,ten,42.0,-72.0\n";
        let err = ObservationSet::from_csv_str(csv_data).unwrap_err();
        assert!(matches!(err, GeoError::Validation(ref msg) if msg.starts_with("line 2")));
    }

    #[test]
    fn test_bad_date_and_range_rejected() {
        let bad_date = "date,y,lat,lng\nnot-a-date,1.0,42.0,-72.0\n";
        assert!(matches!(
            ObservationSet::from_csv_str(bad_date),
            Err(GeoError::Validation(_))
        ));

        let bad_lat = "date,y,lat,lng\n2023-01-01,1.0,95.0,-72.0\n";
        assert!(matches!(
            ObservationSet::from_csv_str(bad_lat),
            Err(GeoError::Validation(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty_set() {
        let set = ObservationSet::from_csv_str("date,y,lat,lng\n").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(Observation::new(ts, f64::NAN, 0.0, 0.0).is_err());
        assert!(Observation::new(ts, f64::INFINITY, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_locations_first_seen_order() {
        let set = ObservationSet::from_csv_str(STR_RESULT).unwrap();
        let locations = set.locations();
        assert_eq!(
            locations,
            vec![
                Location::new(42.0, -72.0).unwrap(),
                Location::new(42.5, -72.5).unwrap()
            ]
        );
    }
}
