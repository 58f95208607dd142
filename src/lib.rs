// src/lib.rs
//! Waypoint Converter Library
//!
//! Reads waypoint collections exported by Garmin Mapsource, Garmin Basecamp
//! or any GPX producer, keeps them in an observable repository where each
//! waypoint can be selected for export, and writes the selection as the
//! `lon,lat,"name"` list read by in-car navigation units.

pub mod config;
pub mod converter;
pub mod display;
pub mod error;
pub mod format;
pub mod logging;
pub mod repository;
pub mod waypoint;

// Re-export main types for convenience
pub use config::ConverterConfig;
pub use converter::Converter;
pub use error::{ConverterError, Result};
pub use format::{read_waypoints_from_file, write_waypoints_to_file, FileFormat};
pub use repository::{WaypointObserver, WaypointRepository};
pub use waypoint::{Waypoint, WaypointView};
