// src/format/mapsource.rs
//! Garmin Mapsource text export: `Waypoint` record parsing

use super::coords::deg_min_to_decimal;
use super::{coordinate_error, into_parse_error};
use crate::error::Result;
use crate::waypoint::Waypoint;
use log::{debug, error};

const NAME_FIELD: usize = 1;
const POSITION_FIELD: usize = 4;

/// Parse one `Waypoint` record of a Mapsource export.
///
/// Field 1 holds the name, field 4 the position. The position is either
/// `N48.1234 E011.5678` (decimal degrees) or `N48 07.404 E011 34.068`
/// (degrees + decimal minutes). Some exports carry an extra empty column
/// before the position, so the first non-blank field from index 4 on is used.
pub fn parse_line(line: &str, separator: &str) -> Result<Waypoint> {
    let fields: Vec<&str> = line.split(separator).collect();

    let name = fields.get(NAME_FIELD).copied().unwrap_or_default();
    let position = fields
        .iter()
        .skip(POSITION_FIELD)
        .find(|field| !field.trim().is_empty())
        .ok_or_else(|| {
            error!("mapsource record has no position field");
            debug!("{:?}", fields);
            coordinate_error()
        })?;

    let tokens: Vec<&str> = position.split_whitespace().collect();
    let (latitude, north, longitude, east) = match tokens.as_slice() {
        [lat, lon] => {
            debug!("recognized decimal coordinate format");
            let (north, lat) = split_hemisphere(lat, 'N', 'S')?;
            let (east, lon) = split_hemisphere(lon, 'E', 'W')?;
            (parse_number(lat)?, north, parse_number(lon)?, east)
        }
        [lat_deg, lat_min, lon_deg, lon_min] => {
            debug!("recognized degree + minutes coordinate format");
            let (north, lat_deg) = split_hemisphere(lat_deg, 'N', 'S')?;
            let (east, lon_deg) = split_hemisphere(lon_deg, 'E', 'W')?;
            (
                deg_min_to_decimal(parse_number(lat_deg)?, parse_number(lat_min)?),
                north,
                deg_min_to_decimal(parse_number(lon_deg)?, parse_number(lon_min)?),
                east,
            )
        }
        _ => {
            error!("could not parse the coordinate formatting");
            debug!("{:?}", tokens);
            return Err(coordinate_error());
        }
    };

    let waypoint =
        Waypoint::new(name, latitude, north, longitude, east).map_err(into_parse_error)?;
    debug!("{}", waypoint.to_device_line());
    Ok(waypoint)
}

/// Split `N48.5` into `(true, "48.5")`.
fn split_hemisphere<'a>(token: &'a str, positive: char, negative: char) -> Result<(bool, &'a str)> {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c == positive => Ok((true, chars.as_str())),
        Some(c) if c == negative => Ok((false, chars.as_str())),
        _ => {
            error!("unexpected hemisphere marker in {:?}", token);
            Err(coordinate_error())
        }
    }
}

fn parse_number(raw: &str) -> Result<f64> {
    raw.parse::<f64>().map_err(|e| {
        error!("could not parse the coordinate formatting");
        debug!("{:?}: {}", raw, e);
        coordinate_error()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;

    const TAB: &str = "\t";

    #[test]
    fn test_decimal_format() {
        let wp = parse_line("Waypoint\tHOME\t\t\tN48.123456 E011.654321", TAB).unwrap();
        assert_eq!(wp.name(), "HOME");
        assert_eq!(wp.latitude(), 48.123456);
        assert_eq!(wp.longitude(), 11.654321);
        assert!(wp.is_north());
        assert!(wp.is_east());
    }

    #[test]
    fn test_position_after_extra_empty_column() {
        let wp = parse_line("Waypoint\tHOME\t\t\t\tN48.123456 E011.654321", TAB).unwrap();
        assert_eq!(wp.name(), "HOME");
        assert_eq!(wp.latitude(), 48.123456);
        assert_eq!(wp.longitude(), 11.654321);
    }

    #[test]
    fn test_degree_minutes_format() {
        let wp = parse_line("Waypoint\tCAMP\tdesc\tFlag\tS33 30.000 W070 15.000\t512 m", TAB).unwrap();
        assert!((wp.latitude() - 33.5).abs() < 1e-9);
        assert!((wp.longitude() - 70.25).abs() < 1e-9);
        assert!(!wp.is_north());
        assert!(!wp.is_east());
    }

    #[test]
    fn test_both_layouts_agree() {
        let decimal = parse_line("Waypoint\tA\t\t\tN48.500000 E011.250000", TAB).unwrap();
        let minutes = parse_line("Waypoint\tA\t\t\tN48 30.0 E011 15.0", TAB).unwrap();
        assert!((decimal.latitude() - minutes.latitude()).abs() < 1e-9);
        assert!((decimal.longitude() - minutes.longitude()).abs() < 1e-9);
        assert_eq!(decimal.is_north(), minutes.is_north());
        assert_eq!(decimal.is_east(), minutes.is_east());
    }

    #[test]
    fn test_wrong_token_count() {
        let err = parse_line("Waypoint\tA\t\t\tN48.5 E011.2 12", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
        assert!(err.message().contains("could not parse the coordinate formatting"));
    }

    #[test]
    fn test_non_numeric_magnitude() {
        let err = parse_line("Waypoint\tA\t\t\tNabc E011.2", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }

    #[test]
    fn test_bad_hemisphere_letter() {
        let err = parse_line("Waypoint\tA\t\t\tE48.5 N011.2", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }

    #[test]
    fn test_missing_position() {
        let err = parse_line("Waypoint\tA", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }

    #[test]
    fn test_invalid_waypoint_is_parse_error() {
        let err = parse_line("Waypoint\t\t\t\tN48.5 E011.2", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
        assert!(err.message().starts_with("There was a problem parsing the waypoint"));

        let err = parse_line("Waypoint\tFAR\t\t\tN190.0 E011.2", TAB).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
    }
}
