//! Shared utility functions for Geostradamus crates.

/// Timestamp utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Output format for timestamps: "YYYY-MM-DD HH:MM:SS"
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Date-time formats accepted on input, tried in order.
    const DATETIME_FORMATS: [&str; 3] =
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

    /// Date-only formats accepted on input; these resolve to midnight.
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
        timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp string.
    ///
    /// Accepts "YYYY-MM-DD HH:MM:SS", "YYYY-MM-DDTHH:MM:SS", "YYYY-MM-DD HH:MM",
    /// "YYYY-MM-DD" and the compact "YYYYMMDD". Date-only inputs are taken at midnight.
    pub fn parse_timestamp(s: &str) -> anyhow::Result<NaiveDateTime> {
        let s = s.trim();
        for format in DATETIME_FORMATS {
            if let Ok(ts) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(ts);
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date.and_time(chrono::NaiveTime::MIN));
            }
        }
        anyhow::bail!("unrecognized timestamp '{}'", s)
    }

    /// Fractional days elapsed since the Unix epoch.
    pub fn days_since_epoch(timestamp: &NaiveDateTime) -> f64 {
        timestamp.and_utc().timestamp() as f64 / 86_400.0
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_date_only() {
            let ts = parse_timestamp("2023-01-01").unwrap();
            let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            assert_eq!(ts, expected);
        }

        #[test]
        fn test_parse_compact_and_datetime() {
            let compact = parse_timestamp("20220215").unwrap();
            assert_eq!(compact.date(), NaiveDate::from_ymd_opt(2022, 2, 15).unwrap());

            let iso = parse_timestamp("2022-02-15T06:30:00").unwrap();
            let spaced = parse_timestamp("2022-02-15 06:30:00").unwrap();
            assert_eq!(iso, spaced);
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(parse_timestamp("yesterday").is_err());
            assert!(parse_timestamp("").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let ts = NaiveDate::from_ymd_opt(2023, 6, 15)
                .unwrap()
                .and_hms_opt(12, 5, 0)
                .unwrap();
            let formatted = format_timestamp(&ts);
            assert_eq!(formatted, "2023-06-15 12:05:00");
            assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
        }

        #[test]
        fn test_days_since_epoch() {
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            assert!((days_since_epoch(&epoch) - 1.5).abs() < 1e-12);
        }
    }
}

/// Great-circle geometry on a spherical Earth
pub mod geo {
    /// Mean Earth radius in kilometers.
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Haversine distance in kilometers between two points given in decimal degrees.
    pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
        let phi1 = lat1.to_radians();
        let phi2 = lat2.to_radians();
        let dphi = (lat2 - lat1).to_radians();
        let dlambda = (lng2 - lng1).to_radians();

        let a = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        // rounding can push `a` a hair outside [0, 1] for antipodal points
        let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();
        EARTH_RADIUS_KM * c
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_haversine_one_degree_at_equator() {
            let dist = haversine_km(0.0, 0.0, 0.0, 1.0);
            assert!((dist - 111.195).abs() < 0.01);
        }

        #[test]
        fn test_haversine_same_point_is_zero() {
            assert_eq!(haversine_km(42.0, -72.0, 42.0, -72.0), 0.0);
        }

        #[test]
        fn test_haversine_is_symmetric() {
            let ab = haversine_km(42.0, -72.0, 42.5, -72.5);
            let ba = haversine_km(42.5, -72.5, 42.0, -72.0);
            assert!((ab - ba).abs() < 1e-9);
            assert!(ab > 60.0 && ab < 75.0);
        }

        #[test]
        fn test_haversine_antipodal() {
            let dist = haversine_km(0.0, 0.0, 0.0, 180.0);
            assert!((dist - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
        }
    }
}
