// src/format/basecamp.rs
//! Garmin Basecamp text export: waypoint data row parsing

use super::coords::to_hemisphere;
use super::{coordinate_error, into_parse_error};
use crate::error::Result;
use crate::waypoint::Waypoint;
use log::{debug, error};

const LATITUDE_FIELD: usize = 1;
const LONGITUDE_FIELD: usize = 2;
const NAME_FIELD: usize = 7;

/// Parse one data row of a Basecamp export.
///
/// Latitude and longitude are signed decimal degrees in fields 1 and 2;
/// field 7 is the name wrapped in double quotes.
pub fn parse_line(line: &str, separator: &str) -> Result<Waypoint> {
    let fields: Vec<&str> = line.split(separator).collect();

    let field = |index: usize| {
        fields.get(index).copied().ok_or_else(|| {
            error!("basecamp row has only {} fields", fields.len());
            debug!("{:?}", line);
            coordinate_error()
        })
    };

    let (latitude, north) = to_hemisphere(parse_signed(field(LATITUDE_FIELD)?)?);
    let (longitude, east) = to_hemisphere(parse_signed(field(LONGITUDE_FIELD)?)?);
    let name = strip_quotes(field(NAME_FIELD)?);

    Waypoint::new(name, latitude, north, longitude, east).map_err(into_parse_error)
}

fn parse_signed(raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|e| {
        error!("could not parse the coordinate formatting");
        debug!("{:?}: {}", raw, e);
        coordinate_error()
    })
}

/// Remove one leading and one trailing `"` if present.
fn strip_quotes(raw: &str) -> &str {
    let raw = raw.strip_prefix('"').unwrap_or(raw);
    raw.strip_suffix('"').unwrap_or(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;

    fn row(lat: &str, lon: &str, name: &str) -> String {
        ["Waypoint", lat, lon, "", "", "", "", name, "Flag, Blue"].join("\t")
    }

    #[test]
    fn test_signed_coordinates() {
        let wp = parse_line(&row("-48.000000", "11.500000", "\"SOUTH\""), "\t").unwrap();
        assert_eq!(wp.name(), "SOUTH");
        assert_eq!(wp.latitude(), 48.0);
        assert!(!wp.is_north());
        assert_eq!(wp.longitude(), 11.5);
        assert!(wp.is_east());
    }

    #[test]
    fn test_western_hemisphere() {
        let wp = parse_line(&row("40.7128", "-74.0060", "\"NYC\""), "\t").unwrap();
        assert!(wp.is_north());
        assert!(!wp.is_east());
        assert!((wp.longitude() - 74.006).abs() < 1e-9);
    }

    #[test]
    fn test_unquoted_name_kept() {
        let wp = parse_line(&row("1.0", "2.0", "PLAIN"), "\t").unwrap();
        assert_eq!(wp.name(), "PLAIN");
    }

    #[test]
    fn test_non_numeric_latitude() {
        let err = parse_line(&row("north", "2.0", "\"X\""), "\t").unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }

    #[test]
    fn test_short_row() {
        let err = parse_line("Waypoint\t1.0\t2.0", "\t").unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }

    #[test]
    fn test_empty_quoted_name() {
        let err = parse_line(&row("1.0", "2.0", "\"\""), "\t").unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
        assert!(err.message().starts_with("There was a problem parsing the waypoint"));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"A\""), "A");
        assert_eq!(strip_quotes("\"A"), "A");
        assert_eq!(strip_quotes("A \"B\""), "A \"B");
        assert_eq!(strip_quotes("\""), "");
    }
}
