// src/waypoint.rs v2
//! Waypoint model, its read-only view and the device line encoding

use crate::error::{ConverterError, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound applied to both latitude and longitude magnitudes.
pub const MAX_MAGNITUDE: f64 = 180.0;

/// A named position stored as unsigned magnitudes plus hemisphere flags.
///
/// Every constructor and setter runs the same validation, so a `Waypoint`
/// value can never hold an empty name or a magnitude outside `[0, 180]`.
/// The `export` flag is runtime-only: it is skipped on serialization and
/// comes back as `false` after a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WaypointRecord")]
pub struct Waypoint {
    name: String,
    latitude: f64,
    longitude: f64,
    north: bool,
    east: bool,
    #[serde(skip)]
    export: bool,
}

#[derive(Deserialize)]
struct WaypointRecord {
    name: String,
    latitude: f64,
    longitude: f64,
    north: bool,
    east: bool,
}

impl TryFrom<WaypointRecord> for Waypoint {
    type Error = ConverterError;

    fn try_from(record: WaypointRecord) -> Result<Self> {
        let mut waypoint = Waypoint::new(
            record.name,
            record.latitude,
            record.north,
            record.longitude,
            record.east,
        )?;
        waypoint.export = false;
        Ok(waypoint)
    }
}

impl Waypoint {
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        north: bool,
        longitude: f64,
        east: bool,
    ) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        let latitude = validate_magnitude("Latitude", latitude)?;
        let longitude = validate_magnitude("Longitude", longitude)?;

        Ok(Self {
            name,
            latitude,
            longitude,
            north,
            east,
            export: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_north(&self) -> bool {
        self.north
    }

    pub fn is_east(&self) -> bool {
        self.east
    }

    pub fn is_export(&self) -> bool {
        self.export
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn set_latitude(&mut self, latitude: f64) -> Result<()> {
        self.latitude = validate_magnitude("Latitude", latitude)?;
        Ok(())
    }

    pub fn set_longitude(&mut self, longitude: f64) -> Result<()> {
        self.longitude = validate_magnitude("Longitude", longitude)?;
        Ok(())
    }

    pub fn set_north(&mut self, north: bool) {
        self.north = north;
    }

    pub fn set_east(&mut self, east: bool) {
        self.east = east;
    }

    pub fn toggle_export(&mut self) {
        self.export = !self.export;
        debug!("exporting waypoint {}: {}", self.name, self.export);
    }

    /// Signed decimal latitude, negative in the southern hemisphere.
    pub fn signed_latitude(&self) -> f64 {
        if self.north {
            self.latitude
        } else {
            -self.latitude
        }
    }

    /// Signed decimal longitude, negative in the western hemisphere.
    pub fn signed_longitude(&self) -> f64 {
        if self.east {
            self.longitude
        } else {
            -self.longitude
        }
    }

    /// Encode as one navigation-unit line: `[-]lon,[-]lat,"name"`.
    ///
    /// The name is written verbatim; embedded quotes are not escaped.
    pub fn to_device_line(&self) -> String {
        format!(
            "{:.6},{:.6},\"{}\"",
            self.signed_longitude(),
            self.signed_latitude(),
            self.name
        )
    }

    pub fn to_view(&self) -> Result<WaypointView> {
        WaypointView::new(
            self.export,
            self.name.clone(),
            format!("{}{:.6}", if self.north { 'N' } else { 'S' }, self.latitude),
            format!("{}{:.6}", if self.east { 'E' } else { 'W' }, self.longitude),
        )
    }

    /// Build a waypoint without running validation, to exercise fail-safe paths.
    #[cfg(test)]
    pub(crate) fn unchecked(name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude,
            longitude,
            north: true,
            east: true,
            export: true,
        }
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        error!("waypoint name is empty");
        return Err(ConverterError::InvalidState(
            "Names must be non-empty.".to_string(),
        ));
    }
    Ok(())
}

fn validate_magnitude(axis: &str, value: f64) -> Result<f64> {
    // NaN fails both comparisons and is rejected here too
    if !(0.0..=MAX_MAGNITUDE).contains(&value) {
        error!("{} must be between 0 and {}", axis, MAX_MAGNITUDE);
        debug!("{}: {}", axis.to_lowercase(), value);
        return Err(ConverterError::InvalidState(format!(
            "{} must be between 0 and {}",
            axis, MAX_MAGNITUDE
        )));
    }
    // normalize -0.0 so it never prints with a sign
    Ok(value.abs())
}

/// Read-only projection of a waypoint handed to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaypointView {
    export: bool,
    name: String,
    latitude: String,
    longitude: String,
}

impl WaypointView {
    pub fn new(export: bool, name: String, latitude: String, longitude: String) -> Result<Self> {
        for (field, value) in [("name", &name), ("latitude", &latitude), ("longitude", &longitude)] {
            if value.is_empty() {
                return Err(ConverterError::InvalidState(format!(
                    "waypoint view {} must be non-empty",
                    field
                )));
            }
        }

        Ok(Self {
            export,
            name,
            latitude,
            longitude,
        })
    }

    pub fn is_export(&self) -> bool {
        self.export
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latitude as `N`/`S` followed by the six-decimal magnitude.
    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// Longitude as `E`/`W` followed by the six-decimal magnitude.
    pub fn longitude(&self) -> &str {
        &self.longitude
    }
}

impl fmt::Display for WaypointView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            if self.export { "export" } else { "withhold" },
            self.name,
            self.latitude,
            self.longitude
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waypoint_creation() {
        let wp = Waypoint::new("HOME", 48.123456, true, 11.654321, true).unwrap();
        assert_eq!(wp.name(), "HOME");
        assert_eq!(wp.latitude(), 48.123456);
        assert_eq!(wp.longitude(), 11.654321);
        assert!(wp.is_north());
        assert!(wp.is_east());
        assert!(wp.is_export());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = Waypoint::new("", 10.0, true, 10.0, true).unwrap_err();
        assert!(matches!(err, ConverterError::InvalidState(_)));
    }

    #[test]
    fn test_magnitude_bounds() {
        assert!(Waypoint::new("A", 180.0, true, 0.0, true).is_ok());
        assert!(Waypoint::new("A", 180.1, true, 0.0, true).is_err());
        assert!(Waypoint::new("A", 0.0, true, -0.5, true).is_err());
        assert!(Waypoint::new("A", f64::NAN, true, 0.0, true).is_err());
    }

    #[test]
    fn test_setters_revalidate() {
        let mut wp = Waypoint::new("A", 10.0, true, 20.0, false).unwrap();
        assert!(wp.set_latitude(200.0).is_err());
        assert_eq!(wp.latitude(), 10.0);
        assert!(wp.set_longitude(-1.0).is_err());
        assert_eq!(wp.longitude(), 20.0);
        assert!(wp.set_name("").is_err());
        assert_eq!(wp.name(), "A");

        wp.set_latitude(45.5).unwrap();
        wp.set_name("B").unwrap();
        assert_eq!(wp.latitude(), 45.5);
        assert_eq!(wp.name(), "B");
    }

    #[test]
    fn test_device_line() {
        let wp = Waypoint::new("HOME", 48.123456, true, 11.654321, true).unwrap();
        assert_eq!(wp.to_device_line(), "11.654321,48.123456,\"HOME\"");

        let wp = Waypoint::new("SW", 33.5, false, 70.25, false).unwrap();
        assert_eq!(wp.to_device_line(), "-70.250000,-33.500000,\"SW\"");
    }

    #[test]
    fn test_device_line_negative_zero() {
        let wp = Waypoint::new("ZERO", -0.0, true, 0.0, true).unwrap();
        assert_eq!(wp.to_device_line(), "0.000000,0.000000,\"ZERO\"");
    }

    #[test]
    fn test_device_line_keeps_quotes_in_name() {
        let wp = Waypoint::new("say \"hi\"", 1.0, true, 2.0, true).unwrap();
        assert_eq!(wp.to_device_line(), "2.000000,1.000000,\"say \"hi\"\"");
    }

    #[test]
    fn test_toggle_export() {
        let mut wp = Waypoint::new("A", 1.0, true, 1.0, true).unwrap();
        wp.toggle_export();
        assert!(!wp.is_export());
        wp.toggle_export();
        assert!(wp.is_export());
    }

    #[test]
    fn test_view_formatting() {
        let mut wp = Waypoint::new("SOUTH", 48.0, false, 11.5, true).unwrap();
        wp.toggle_export();
        let view = wp.to_view().unwrap();
        assert!(!view.is_export());
        assert_eq!(view.name(), "SOUTH");
        assert_eq!(view.latitude(), "S48.000000");
        assert_eq!(view.longitude(), "E11.500000");
        assert_eq!(view.to_string(), "withhold SOUTH S48.000000 E11.500000");
    }

    #[test]
    fn test_view_rejects_empty_fields() {
        let err = WaypointView::new(true, String::new(), "N1".into(), "E1".into()).unwrap_err();
        assert!(matches!(err, ConverterError::InvalidState(_)));
    }

    #[test]
    fn test_json_round_trip_resets_export() {
        let wp = Waypoint::new("HOME", 48.5, true, 11.25, false).unwrap();
        let json = serde_json::to_value(&wp).unwrap();
        assert!(json.get("export").is_none());
        assert_eq!(json["name"], "HOME");

        let decoded: Waypoint = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.name(), "HOME");
        assert_eq!(decoded.longitude(), 11.25);
        assert!(!decoded.is_east());
        assert!(!decoded.is_export());
    }

    #[test]
    fn test_json_rejects_invalid_record() {
        let json = r#"{"name":"BAD","latitude":500.0,"longitude":1.0,"north":true,"east":true}"#;
        assert!(serde_json::from_str::<Waypoint>(json).is_err());
    }

    #[test]
    fn test_signed_coordinates() {
        let wp = Waypoint::new("A", 12.5, false, 3.25, false).unwrap();
        assert_eq!(wp.signed_latitude(), -12.5);
        assert_eq!(wp.signed_longitude(), -3.25);
    }
}
