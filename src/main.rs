// src/main.rs v2
//! Waypoint Converter - Garmin/GPX waypoints to navigation-unit lists

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::error;
use std::path::PathBuf;
use std::process;
use waypoint_converter::{
    display::TerminalDisplay, logging, Converter, ConverterConfig, ConverterError,
};

#[derive(Parser)]
#[command(name = "waypoint-converter", version, about)]
struct Cli {
    /// Settings file (defaults to ~/.config/waypoint-converter/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// trace, debug, info, warn or error
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write rotating log files here instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load waypoint files and print them
    List {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Load waypoint files and write the navigation-unit list
    Convert {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target file; `.txt` is appended when missing
        #[arg(short, long)]
        output: PathBuf,

        /// Replace the target file if it exists
        #[arg(long)]
        overwrite: bool,

        /// Leave a waypoint out of the export (repeatable)
        #[arg(long, value_name = "NAME")]
        exclude: Vec<String>,
    },
    /// Show the settings, storing any values given
    Config {
        #[arg(long)]
        language: Option<String>,

        /// Keep loaded waypoints when importing another file
        #[arg(long, value_name = "BOOL")]
        append: Option<bool>,

        /// Replace same-named waypoints and existing output files
        #[arg(long, value_name = "BOOL")]
        overwrite_existing: Option<bool>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(&cli.log_level, cli.log_dir.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        let fatal = e
            .downcast_ref::<ConverterError>()
            .map_or(false, ConverterError::is_fatal);
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        if matches!(e.downcast_ref::<ConverterError>(), Some(ConverterError::AlreadyExists(_))) {
            eprintln!("Re-run with --overwrite to replace it.");
        }
        process::exit(if fatal { 2 } else { 1 });
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ConverterConfig::load_from(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => ConverterConfig::load_or_default(),
    };

    let mut converter = Converter::new(config);

    match cli.command {
        Command::List { inputs } => {
            converter.subscribe(Box::new(TerminalDisplay::stdout()));
            load_all(&mut converter, &inputs)?;
        }
        Command::Convert {
            inputs,
            output,
            overwrite,
            exclude,
        } => {
            load_all(&mut converter, &inputs)?;
            for name in &exclude {
                if converter.repository().get(name)?.is_export() {
                    converter.toggle_waypoint_export(name)?;
                }
            }

            let overwrite = overwrite || converter.config().overwrite_existing;
            let written = converter
                .export_waypoints(&output, overwrite)
                .with_context(|| format!("exporting to {}", output.display()))?;
            println!(
                "Wrote {} waypoints to {}",
                converter.repository().export_set().len(),
                written.display()
            );
        }
        Command::Config {
            language,
            append,
            overwrite_existing,
        } => {
            let changed = language.is_some() || append.is_some() || overwrite_existing.is_some();
            let config = converter.config_mut();
            if let Some(language) = &language {
                config.update_language(language);
            }
            if let Some(append) = append {
                config.update_append(append);
            }
            if let Some(overwrite) = overwrite_existing {
                config.update_overwrite(overwrite);
            }

            if changed {
                match &cli.config {
                    Some(path) => config.save_to(path),
                    None => config.save(),
                }
                .context("saving settings")?;
            }
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }

    Ok(())
}

fn load_all(converter: &mut Converter, inputs: &[PathBuf]) -> anyhow::Result<()> {
    for input in inputs {
        converter
            .load_file(input)
            .with_context(|| format!("importing {}", input.display()))?;
    }
    Ok(())
}
