// src/format/mod.rs
//! Input format detection and dispatch to the matching parser

pub mod basecamp;
pub mod coords;
pub mod device;
pub mod gpx;
pub mod mapsource;
pub mod text;

use crate::error::{ConverterError, Result};
use crate::waypoint::Waypoint;
use log::{error, info};
use std::path::{Path, PathBuf};

pub use coords::{deg_min_to_decimal, to_hemisphere};
pub use text::{detect_dialect, TextDialect};

const COORDINATE_FORMAT_ERROR: &str =
    "There was a problem parsing the waypoint: could not parse the coordinate formatting";

/// Input file kinds, selected by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Garmin Mapsource or Basecamp tab-separated export.
    Text,
    Gpx,
    /// Reserved; no reader exists yet.
    Csv,
}

impl FileFormat {
    /// Pick the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") => Ok(FileFormat::Text),
            Some("gpx") => Ok(FileFormat::Gpx),
            Some("csv") => Ok(FileFormat::Csv),
            _ => {
                error!("unsupported file extension: {}", path.display());
                Err(ConverterError::Parse("unsupported file extension".to_string()))
            }
        }
    }

    pub fn extension(&self) -> &str {
        match self {
            FileFormat::Text => "txt",
            FileFormat::Gpx => "gpx",
            FileFormat::Csv => "csv",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            FileFormat::Text => "Garmin Mapsource/Basecamp text",
            FileFormat::Gpx => "GPX (GPS Exchange)",
            FileFormat::Csv => "CSV",
        }
    }
}

/// Parse every waypoint from `path`, choosing the reader by extension.
pub fn read_waypoints_from_file(path: impl AsRef<Path>) -> Result<Vec<Waypoint>> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        error!("input file path is empty");
        return Err(ConverterError::InvalidState(
            "input file path cannot be empty".to_string(),
        ));
    }

    let format = FileFormat::from_path(path)?;
    info!("reading {} as {}", path.display(), format.display_name());

    match format {
        FileFormat::Text => text::parse_file(path),
        FileFormat::Gpx => gpx::parse_file(path),
        FileFormat::Csv => Err(ConverterError::Unsupported(format!(
            "reading .{} files is not implemented yet",
            format.extension()
        ))),
    }
}

/// Write `waypoints` as a navigation-unit list; see [`device::write_file`].
pub fn write_waypoints_to_file(
    path: impl AsRef<Path>,
    waypoints: &[Waypoint],
    overwrite: bool,
) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        error!("output file path is empty");
        return Err(ConverterError::InvalidState(
            "output file path cannot be empty".to_string(),
        ));
    }

    device::write_file(path, waypoints, overwrite)
}

pub(crate) fn coordinate_error() -> ConverterError {
    ConverterError::Parse(COORDINATE_FORMAT_ERROR.to_string())
}

/// Waypoint validation failures surface from parsers as parse errors.
pub(crate) fn into_parse_error(err: ConverterError) -> ConverterError {
    ConverterError::Parse(format!(
        "There was a problem parsing the waypoint: {}",
        err.message()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.txt")).unwrap(), FileFormat::Text);
        assert_eq!(FileFormat::from_path(Path::new("a.GPX")).unwrap(), FileFormat::Gpx);
        assert_eq!(FileFormat::from_path(Path::new("dir/a.csv")).unwrap(), FileFormat::Csv);
        assert!(matches!(
            FileFormat::from_path(Path::new("a.kml")),
            Err(ConverterError::Parse(_))
        ));
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_empty_paths_rejected() {
        assert!(matches!(
            read_waypoints_from_file(""),
            Err(ConverterError::InvalidState(_))
        ));
        assert!(matches!(
            write_waypoints_to_file("", &[], false),
            Err(ConverterError::InvalidState(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.kml");
        std::fs::write(&path, "<kml/>").unwrap();
        let err = read_waypoints_from_file(&path).unwrap_err();
        assert!(matches!(err, ConverterError::Parse(_)));
        assert_eq!(err.message(), "unsupported file extension");
    }

    #[test]
    fn test_csv_is_capability_gap() {
        let err = read_waypoints_from_file("points.csv").unwrap_err();
        assert!(matches!(err, ConverterError::Unsupported(_)));
        assert!(err.message().contains(".csv"));
    }

    #[test]
    fn test_parse_error_wraps_validation_message() {
        let err = into_parse_error(ConverterError::InvalidState("Names must be non-empty.".into()));
        assert!(matches!(err, ConverterError::Parse(_)));
        assert_eq!(
            err.message(),
            "There was a problem parsing the waypoint: Names must be non-empty."
        );
    }
}
