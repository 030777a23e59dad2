//! Validation utilities for configuration-supplied data
//!
//! The form only offers closed-set choices, so validation here covers the
//! values that come from files: taluka names and weather readings.

use crate::models::WeatherRecord;

/// Validate that every weather reading is finite and the location is on the globe
pub fn validate_weather_record(record: &WeatherRecord) -> Result<(), String> {
    for (name, value) in record.fields() {
        if !value.is_finite() {
            return Err(format!("{} must be a finite number, got {}", name, value));
        }
    }
    validate_coordinates(record.lat, record.lon)?;
    Ok(())
}

/// Validate latitude and longitude ranges
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a taluka name used as a lookup key and one-hot label
pub fn validate_taluka_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Taluka name cannot be blank");
    }
    if name.trim() != name {
        return Err("Taluka name cannot have leading or trailing whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> WeatherRecord {
        WeatherRecord {
            rainfall: 1200.0,
            max_temp: 34.0,
            min_temp: 22.0,
            humidity: 70.0,
            solar: 5.5,
            ndvi: 0.65,
            lat: 17.1,
            lon: 74.2,
        }
    }

    #[test]
    fn test_validate_weather_record_valid() {
        assert!(validate_weather_record(&record()).is_ok());
    }

    #[test]
    fn test_validate_weather_record_nan() {
        let mut r = record();
        r.humidity = f64::NAN;
        let err = validate_weather_record(&r).unwrap_err();
        assert!(err.starts_with("humidity"));
    }

    #[test]
    fn test_validate_weather_record_infinite() {
        let mut r = record();
        r.rainfall = f64::INFINITY;
        assert!(validate_weather_record(&r).is_err());
    }

    #[test]
    fn test_validate_weather_record_off_globe() {
        let mut r = record();
        r.lat = 117.1;
        assert_eq!(
            validate_weather_record(&r).unwrap_err(),
            "Latitude must be between -90 and 90"
        );
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(17.1, 74.2).is_ok());
        assert!(validate_coordinates(-90.0, 180.0).is_ok());
        assert!(validate_coordinates(91.0, 74.2).is_err());
        assert!(validate_coordinates(17.1, -181.0).is_err());
    }

    #[test]
    fn test_validate_taluka_name() {
        assert!(validate_taluka_name("Karad").is_ok());
        assert!(validate_taluka_name("Walwa (Islampur)").is_ok());
        assert!(validate_taluka_name("").is_err());
        assert!(validate_taluka_name(" Karad").is_err());
    }
}
