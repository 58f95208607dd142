// src/format/text.rs
//! Garmin `.txt` exports: dialect sniffing and record extraction

use super::{basecamp, mapsource};
use crate::error::{ConverterError, Result};
use crate::waypoint::Waypoint;
use encoding_rs::WINDOWS_1252;
use log::{debug, error, info};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

const BYTE_ORDER_MARK: &str = "\u{FEFF}";
const FIELD_SEPARATOR: &str = "\t";

/// Vendor layout of a `.txt` waypoint export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDialect {
    /// Starts with a line holding only a byte-order mark.
    Basecamp,
    /// Starts with a `Grid` header line.
    Mapsource,
}

/// Decide the dialect from the first line of the file.
pub fn detect_dialect(first_line: &str) -> Option<TextDialect> {
    let first_line = first_line.trim_end_matches('\r');
    if first_line == BYTE_ORDER_MARK {
        Some(TextDialect::Basecamp)
    } else if first_line
        .strip_prefix(BYTE_ORDER_MARK)
        .unwrap_or(first_line)
        .starts_with("Grid")
    {
        Some(TextDialect::Mapsource)
    } else {
        None
    }
}

pub fn parse_file(path: &Path) -> Result<Vec<Waypoint>> {
    let file = File::open(path).map_err(|e| {
        error!("could not open {}", path.display());
        debug!("{}", e);
        ConverterError::from(e)
    })?;
    parse_reader(BufReader::new(file))
}

pub fn parse_str(content: &str) -> Result<Vec<Waypoint>> {
    parse_reader(Cursor::new(content))
}

pub fn parse_reader<R: BufRead>(reader: R) -> Result<Vec<Waypoint>> {
    let mut lines = Lines::new(reader);

    let first_line = match lines.next_line()? {
        Some(line) => line,
        None => {
            error!("The file is empty");
            return Err(ConverterError::Parse("The file is empty".to_string()));
        }
    };

    match detect_dialect(&first_line) {
        Some(TextDialect::Basecamp) => {
            info!("recognized basecamp txt file");
            parse_basecamp(&mut lines)
        }
        Some(TextDialect::Mapsource) => {
            info!("recognized mapsource txt file");
            parse_mapsource(&mut lines)
        }
        None => {
            error!("file format not recognized");
            debug!("first line: {:?}", first_line);
            Err(ConverterError::Parse(
                "The file format was not recognized".to_string(),
            ))
        }
    }
}

fn parse_basecamp<R: BufRead>(lines: &mut Lines<R>) -> Result<Vec<Waypoint>> {
    let mut waypoints = Vec::new();

    loop {
        match lines.next_line()? {
            Some(line) if line.starts_with("wpt") => break,
            Some(_) => continue,
            None => {
                info!("basecamp file holds no waypoint section");
                return Ok(waypoints);
            }
        }
    }

    // column labels
    lines.next_line()?;

    while let Some(line) = lines.next_line()? {
        if line.is_empty() || line == BYTE_ORDER_MARK {
            break;
        }
        waypoints.push(basecamp::parse_line(&line, FIELD_SEPARATOR)?);
    }

    debug!("read {} basecamp waypoints", waypoints.len());
    Ok(waypoints)
}

fn parse_mapsource<R: BufRead>(lines: &mut Lines<R>) -> Result<Vec<Waypoint>> {
    let mut waypoints = Vec::new();

    while let Some(line) = lines.next_line()? {
        if line.starts_with("Waypoint") {
            waypoints.push(mapsource::parse_line(&line, FIELD_SEPARATOR)?);
        }
    }

    debug!("read {} mapsource waypoints", waypoints.len());
    Ok(waypoints)
}

/// Line reader that drops `\r` and turns read failures into file errors.
///
/// Lines that are not valid UTF-8 are decoded as Windows-1252, the ANSI
/// code page Mapsource writes its exports in.
struct Lines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => Ok(None),
            Ok(_) => {
                if self.buf.ends_with(b"\n") {
                    self.buf.pop();
                }
                if self.buf.ends_with(b"\r") {
                    self.buf.pop();
                }
                Ok(Some(decode_line(&self.buf)))
            }
            Err(e) => {
                error!("There was a problem reading the requested file");
                debug!("{}", e);
                Err(ConverterError::File(
                    "There was a problem reading the requested file".to_string(),
                ))
            }
        }
    }
}

fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(line) => line.to_string(),
        Err(_) => {
            debug!("line is not UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
        }
    }
}
