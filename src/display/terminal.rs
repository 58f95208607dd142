// src/display/terminal.rs
//! Terminal table of the loaded waypoints

use crate::{error::Result, repository::WaypointObserver, waypoint::WaypointView};
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use log::warn;
use std::io::{self, Write};

const RULE_WIDTH: usize = 64;

/// Renders every snapshot it is notified with as a colored table.
pub struct TerminalDisplay<W: Write> {
    out: W,
}

impl TerminalDisplay<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render the waypoint views to the terminal
    pub fn render(&mut self, waypoints: &[WaypointView]) -> Result<()> {
        let out = &mut self.out;

        // Header
        queue!(
            out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(RULE_WIDTH)),
            Print("\n"),
            Print(format!("{:<10} {:<24} {:>13} {:>13}\n", "STATUS", "NAME", "LATITUDE", "LONGITUDE")),
            Print("=".repeat(RULE_WIDTH)),
            Print("\n"),
            ResetColor
        )?;

        for view in waypoints {
            let (status, color) = if view.is_export() {
                ("export", Color::Green)
            } else {
                ("withhold", Color::DarkGrey)
            };
            queue!(
                out,
                SetForegroundColor(color),
                Print(format!("{:<10}", status)),
                ResetColor,
                Print(format!(
                    " {:<24} {:>13} {:>13}\n",
                    view.name(),
                    view.latitude(),
                    view.longitude()
                ))
            )?;
        }

        let selected = waypoints.iter().filter(|view| view.is_export()).count();

        // Footer
        queue!(
            out,
            SetForegroundColor(Color::Green),
            Print("=".repeat(RULE_WIDTH)),
            Print("\n"),
            ResetColor,
            Print(format!("{} waypoints, {} selected for export\n", waypoints.len(), selected))
        )?;

        out.flush()?;
        Ok(())
    }
}

impl<W: Write> WaypointObserver for TerminalDisplay<W> {
    fn notify(&mut self, waypoints: &[WaypointView]) {
        if let Err(e) = self.render(waypoints) {
            warn!("could not render waypoint table: {}", e);
        }
    }
}
