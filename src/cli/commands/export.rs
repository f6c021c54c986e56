//! `packlist export` command - Export a vehicle's packing list as CSV
//!
//! The inverse projection of import: one row per (place, item) pair in
//! display order, columns `Vehicle,Place,Item,Quantity,Note`.

use console::style;
use csv::WriterBuilder;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::open_store;
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::reconcile::export_filename;
use crate::core::store::ExportRow;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// Write to this file (or into this directory) instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Field delimiter (default: the configured csv_delimiter, ',')
    #[arg(long)]
    pub delimiter: Option<char>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let config = Config::load_for(&project);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let rows = store
        .export_rows(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let delimiter = match args.delimiter {
        Some(ch) if ch.is_ascii() => ch as u8,
        Some(ch) => {
            return Err(miette::miette!("delimiter must be an ASCII character, got '{ch}'"));
        }
        None => config.csv_delimiter(),
    };

    let buffer = render_csv(&rows, delimiter).into_diagnostic()?;

    match args.output {
        None => {
            print!("{buffer}");
        }
        Some(path) => {
            let path = if path.is_dir() {
                path.join(export_filename(&vehicle.name))
            } else {
                path
            };
            std::fs::write(&path, buffer).into_diagnostic()?;
            eprintln!(
                "{} Exported {} row(s) to {}",
                style("✓").green(),
                rows.len(),
                style(path.display()).cyan()
            );
        }
    }

    Ok(())
}

/// Render export rows with the standard header
fn render_csv(rows: &[ExportRow], delimiter: u8) -> csv::Result<String> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(["Vehicle", "Place", "Item", "Quantity", "Note"])?;
    for row in rows {
        writer.write_record([
            row.vehicle.as_str(),
            row.place.as_str(),
            row.item.as_str(),
            &row.quantity.to_string(),
            row.note.as_str(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).to_string())
}
