// src/format/gpx.rs
//! GPX waypoint extraction

use super::coords::to_hemisphere;
use super::{coordinate_error, into_parse_error};
use crate::error::{ConverterError, Result};
use crate::waypoint::Waypoint;
use log::{debug, error};
use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

pub fn parse_file(path: &Path) -> Result<Vec<Waypoint>> {
    if !path.exists() {
        error!("The requested file was not found");
        debug!("{}", path.display());
        return Err(ConverterError::File(
            "The requested file was not found".to_string(),
        ));
    }

    let content = fs::read(path).map_err(|e| {
        error!("There was a problem reading the requested file");
        debug!("{}", e);
        ConverterError::File("There was a problem reading the requested file".to_string())
    })?;
    parse_bytes(&content)
}

pub fn parse_str(content: &str) -> Result<Vec<Waypoint>> {
    parse_bytes(content.as_bytes())
}

/// Collect every `<wpt lat=".." lon=".."><name>..</name></wpt>` element.
///
/// Only the `lat`/`lon` attributes and the first `<name>` child are read.
/// An element missing any of them fails the whole document. Text is decoded
/// with the encoding named in the XML declaration (UTF-8 when absent).
pub fn parse_bytes(content: &[u8]) -> Result<Vec<Waypoint>> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut waypoints = Vec::new();
    let mut current: Option<PendingWaypoint> = None;
    let mut in_name = false;
    let mut saw_element = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                saw_element = true;
                match e.local_name().as_ref() {
                    b"wpt" => {
                        current = Some(PendingWaypoint::from_element(&e, reader.decoder())?)
                    }
                    b"name" => {
                        if let Some(pending) = current.as_mut() {
                            in_name = pending.start_name();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                match e.local_name().as_ref() {
                    b"wpt" => waypoints
                        .push(PendingWaypoint::from_element(&e, reader.decoder())?.finish()?),
                    b"name" => {
                        if let Some(pending) = current.as_mut() {
                            pending.start_name();
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) if in_name => {
                let text = t.unescape().map_err(xml_error)?;
                if let Some(pending) = current.as_mut() {
                    pending.push_name(&text);
                }
            }
            Ok(Event::CData(c)) if in_name => {
                let text = reader.decoder().decode(&c).map_err(xml_error)?;
                if let Some(pending) = current.as_mut() {
                    pending.push_name(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"name" => in_name = false,
                b"wpt" => {
                    if let Some(pending) = current.take() {
                        waypoints.push(pending.finish()?);
                    }
                }
                _ => {}
            },
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_element {
        return Err(xml_error("document has no root element"));
    }
    if current.is_some() {
        return Err(xml_error("unexpected end of document inside <wpt>"));
    }

    debug!("found {} waypoints in the file", waypoints.len());
    Ok(waypoints)
}

#[derive(Debug, Default)]
struct PendingWaypoint {
    latitude: Option<String>,
    longitude: Option<String>,
    name: Option<String>,
    name_closed: bool,
}

impl PendingWaypoint {
    fn from_element(element: &BytesStart, decoder: Decoder) -> Result<Self> {
        let mut pending = PendingWaypoint::default();
        for attr in element.attributes() {
            let attr = attr.map_err(xml_error)?;
            let slot = match attr.key.local_name().as_ref() {
                b"lat" => &mut pending.latitude,
                b"lon" => &mut pending.longitude,
                _ => continue,
            };
            let raw = decoder.decode(&attr.value).map_err(xml_error)?;
            *slot = Some(unescape(&raw).map_err(xml_error)?.into_owned());
        }
        Ok(pending)
    }

    /// Returns whether text should be collected for this `<name>`.
    fn start_name(&mut self) -> bool {
        if self.name.is_some() {
            self.name_closed = true;
            return false;
        }
        self.name = Some(String::new());
        true
    }

    fn push_name(&mut self, text: &str) {
        if self.name_closed {
            return;
        }
        if let Some(name) = self.name.as_mut() {
            name.push_str(text);
        }
    }

    fn finish(self) -> Result<Waypoint> {
        let latitude = parse_attribute("lat", self.latitude)?;
        let longitude = parse_attribute("lon", self.longitude)?;
        let name = self.name.ok_or_else(|| {
            error!("waypoint element without a <name>");
            ConverterError::Parse(
                "There was a problem parsing the waypoint: missing <name>".to_string(),
            )
        })?;

        let (latitude, north) = to_hemisphere(latitude);
        let (longitude, east) = to_hemisphere(longitude);
        Waypoint::new(name, latitude, north, longitude, east).map_err(into_parse_error)
    }
}

fn parse_attribute(key: &str, value: Option<String>) -> Result<f64> {
    let value = value.ok_or_else(|| {
        error!("waypoint element without a {} attribute", key);
        ConverterError::Parse(format!(
            "There was a problem parsing the waypoint: missing {} attribute",
            key
        ))
    })?;
    value.trim().parse::<f64>().map_err(|e| {
        error!("could not parse the coordinate formatting");
        debug!("{}={:?}: {}", key, value, e);
        coordinate_error()
    })
}

fn xml_error(e: impl std::fmt::Display) -> ConverterError {
    let msg = format!("There was a problem parsing the requested file: {}", e);
    error!("{}", msg);
    ConverterError::Parse(msg)
}
