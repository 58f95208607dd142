// src/format/device.rs
//! Navigation-unit waypoint list writer

use crate::error::{ConverterError, Result};
use crate::waypoint::Waypoint;
use log::{debug, error, info};
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Suffix every device list carries.
pub const DEVICE_EXTENSION: &str = ".txt";

/// Append `.txt` unless the path already ends with it.
pub fn with_device_extension(path: &Path) -> PathBuf {
    if path.to_string_lossy().ends_with(DEVICE_EXTENSION) {
        return path.to_path_buf();
    }
    info!("file was missing extension, added {}", DEVICE_EXTENSION);
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(DEVICE_EXTENSION);
    PathBuf::from(raw)
}

/// Write one device line per waypoint, in the given order.
///
/// Without `overwrite` the target is created with `create_new`, so an
/// existing file is detected before anything is opened for writing and
/// its bytes are never touched. Returns the path actually written.
pub fn write_file(path: &Path, waypoints: &[Waypoint], overwrite: bool) -> Result<PathBuf> {
    let path = with_device_extension(path);

    let file = open_target(&path, overwrite)?;
    debug!("writing {} waypoints to {}", waypoints.len(), path.display());

    let mut writer = BufWriter::new(file);
    write_lines(&mut writer, waypoints).map_err(write_error)?;
    let file = writer.into_inner().map_err(|e| write_error(e.into_error()))?;

    file.sync_all().map_err(|e| {
        let msg = "Could not successfully close the output file";
        error!("{}", msg);
        debug!("{}", e);
        ConverterError::Fatal(msg.to_string())
    })?;

    Ok(path)
}

/// Encode waypoints as device lines into any writer.
pub fn write_lines<W: Write>(writer: &mut W, waypoints: &[Waypoint]) -> io::Result<()> {
    for waypoint in waypoints {
        writeln!(writer, "{}", waypoint.to_device_line())?;
    }
    writer.flush()
}

fn open_target(path: &Path, overwrite: bool) -> Result<File> {
    let opened = if overwrite {
        if path.exists() {
            info!("{} already exists. Cleared for overwrite", path.display());
        }
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    };

    opened.map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            info!("{} already exists", path.display());
            ConverterError::AlreadyExists(format!("{} already exists", path.display()))
        } else {
            write_error(e)
        }
    })
}

fn write_error(e: io::Error) -> ConverterError {
    error!("IO problem: {}", e);
    ConverterError::File("There was an error writing to file".to_string())
}
