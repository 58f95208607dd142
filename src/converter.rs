// src/converter.rs
//! Entry point for callers: ties file formats, the repository and settings together

use crate::{
    config::ConverterConfig,
    error::Result,
    format,
    repository::{WaypointObserver, WaypointRepository},
};
use log::info;
use std::path::{Path, PathBuf};

/// Imports files into one repository and exports its selection.
pub struct Converter {
    repository: WaypointRepository,
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_repository(WaypointRepository::new(), config)
    }

    pub fn with_repository(repository: WaypointRepository, config: ConverterConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ConverterConfig {
        &mut self.config
    }

    pub fn repository(&self) -> &WaypointRepository {
        &self.repository
    }

    pub fn subscribe(&mut self, observer: Box<dyn WaypointObserver>) {
        self.repository.subscribe(observer);
    }

    /// Parse `path` and add its waypoints; returns how many were read.
    ///
    /// Parsing finishes before the repository is touched, so a failed import
    /// leaves the collection as it was. With `append_waypoints` off the file
    /// replaces the collection; `overwrite_existing` decides name collisions.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let waypoints = format::read_waypoints_from_file(path)?;
        let overwrite = self.config.overwrite_existing;

        let count = if self.config.append_waypoints {
            self.repository.add_all(waypoints, overwrite)?
        } else {
            self.repository.replace_all(waypoints, overwrite)?
        };

        info!("loaded {} waypoints from {}", count, path.display());
        Ok(count)
    }

    pub fn toggle_waypoint_export(&mut self, name: &str) -> Result<bool> {
        self.repository.toggle_export(name)
    }

    /// Write every waypoint flagged for export; returns the path written.
    pub fn export_waypoints(&self, path: impl AsRef<Path>, overwrite: bool) -> Result<PathBuf> {
        let waypoints = self.repository.export_set();
        let written = format::write_waypoints_to_file(path, &waypoints, overwrite)?;
        info!("exported {} waypoints to {}", waypoints.len(), written.display());
        Ok(written)
    }

    pub fn clear(&mut self) {
        self.repository.clear();
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConverterError;
    use std::fs;

    const MAPSOURCE: &str = "Grid\tLat/Lon hddd.ddddd\n\
Waypoint\tHOME\t\t\t\tN48.123456 E011.654321\n\
Waypoint\tWORK\t\t\t\tN48.200000 E011.600000\n";

    const GPX: &str = r#"<gpx><wpt lat="-48.0" lon="11.5"><name>SOUTH</name></wpt><wpt lat="1" lon="1"><name>HOME</name></wpt></gpx>"#;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let txt = dir.join("mapsource.txt");
        let gpx = dir.join("points.gpx");
        fs::write(&txt, MAPSOURCE).unwrap();
        fs::write(&gpx, GPX).unwrap();
        (txt, gpx)
    }

    #[test]
    fn test_load_toggle_export() {
        let dir = tempfile::tempdir().unwrap();
        let (txt, _) = write_inputs(dir.path());

        let mut converter = Converter::default();
        assert_eq!(converter.load_file(&txt).unwrap(), 2);
        assert!(!converter.toggle_waypoint_export("WORK").unwrap());

        let written = converter.export_waypoints(dir.path().join("out"), false).unwrap();
        assert_eq!(
            fs::read_to_string(written).unwrap(),
            "11.654321,48.123456,\"HOME\"\n"
        );
    }

    #[test]
    fn test_collision_without_overwrite_keeps_collection() {
        let dir = tempfile::tempdir().unwrap();
        let (txt, gpx) = write_inputs(dir.path());

        let mut converter = Converter::default();
        converter.load_file(&txt).unwrap();
        let err = converter.load_file(&gpx).unwrap_err();
        assert!(matches!(err, ConverterError::AlreadyExists(_)));
        assert_eq!(converter.repository().len(), 2);
        assert!(!converter.repository().contains("SOUTH"));
    }

    #[test]
    fn test_overwrite_setting_replaces_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let (txt, gpx) = write_inputs(dir.path());

        let mut converter = Converter::default();
        converter.config_mut().update_overwrite(true);
        converter.load_file(&txt).unwrap();
        converter.load_file(&gpx).unwrap();
        assert_eq!(converter.repository().len(), 3);
        assert_eq!(converter.repository().get("HOME").unwrap().latitude(), 1.0);
    }

    #[test]
    fn test_append_off_replaces_collection() {
        let dir = tempfile::tempdir().unwrap();
        let (txt, gpx) = write_inputs(dir.path());

        let mut converter = Converter::default();
        converter.config_mut().update_append(false);
        converter.load_file(&txt).unwrap();
        converter.load_file(&gpx).unwrap();
        assert_eq!(converter.repository().len(), 2);
        assert!(converter.repository().contains("SOUTH"));
        assert!(!converter.repository().contains("WORK"));
    }

    #[test]
    fn test_failed_import_leaves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let (txt, _) = write_inputs(dir.path());
        let broken = dir.path().join("broken.txt");
        fs::write(&broken, "Grid\nWaypoint\tBAD\t\t\tX1 Y2\n").unwrap();

        let mut converter = Converter::default();
        converter.config_mut().update_append(false);
        converter.load_file(&txt).unwrap();
        assert!(matches!(converter.load_file(&broken), Err(ConverterError::Parse(_))));
        assert_eq!(converter.repository().len(), 2);
    }

    #[test]
    fn test_toggle_unknown_name() {
        let mut converter = Converter::default();
        assert!(matches!(
            converter.toggle_waypoint_export("NOPE"),
            Err(ConverterError::NotFound(_))
        ));
    }
}
