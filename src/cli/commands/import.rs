//! `packlist import` command - Import places and items from CSV
//!
//! Accepts the 5-column `Vehicle,Place,Item,Quantity,Note` layout or the
//! 4-column `Place,Item,Quantity,Note` layout (Danish synonyms accepted).
//! Everything commits in one transaction; a bad header imports nothing.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::GlobalOpts;
use crate::core::auth::AuthContext;
use crate::core::config::Config;
use crate::core::reconcile::{self, ImportOptions};

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,

    /// Vehicle (id or name) receiving 4-column files and rows with a
    /// blank vehicle cell
    #[arg(long)]
    pub vehicle: Option<String>,

    /// Field delimiter (default: auto-detect from the header, ';'
    /// preferred over ',')
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Resolve and validate everything, then roll back
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    if !args.file.exists() {
        return Err(miette::miette!("File not found: {}", args.file.display()));
    }

    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let delimiter = match args.delimiter {
        Some(ch) if ch.is_ascii() => Some(ch as u8),
        Some(ch) => {
            return Err(miette::miette!("delimiter must be an ASCII character, got '{ch}'"));
        }
        None => None,
    };

    // The --vehicle context may be an id; resolve it to the display name
    // the reconciler matches on.
    let vehicle_context = match &args.vehicle {
        Some(reference) => Some(
            store
                .resolve_vehicle(reference)
                .map_err(|e| miette::miette!("{}", e))?
                .name,
        ),
        None => None,
    };

    let fallback_vehicle = args
        .file
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string());

    let bytes = fs::read(&args.file).into_diagnostic()?;

    println!(
        "{} Importing from {}{}",
        style("→").blue(),
        style(args.file.display()).yellow(),
        if args.dry_run {
            style(" (dry run)").dim().to_string()
        } else {
            String::new()
        }
    );
    println!();

    let options = ImportOptions {
        vehicle: vehicle_context,
        delimiter,
        dry_run: args.dry_run,
        fallback_vehicle,
    };

    let report = reconcile::import(&mut store, &auth, &bytes, &options)
        .map_err(|e| miette::miette!("{}", e))?;

    for skip in &report.skipped {
        eprintln!(
            "{} Row {}: {}",
            style("✗").red(),
            skip.row,
            truncate_str(&skip.reason, 60)
        );
    }

    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:   {}", style(report.rows_processed).cyan());
    println!("  Items created:    {}", style(report.items_created).green());
    if report.places_created > 0 {
        println!("  Places created:   {}", style(report.places_created).green());
    }
    if report.vehicles_created > 0 {
        println!(
            "  Vehicles created: {}",
            style(report.vehicles_created).green()
        );
    }
    if !report.skipped.is_empty() {
        println!(
            "  Skipped:          {}",
            style(report.skipped.len()).dim()
        );
    }

    if args.dry_run {
        println!();
        println!(
            "{}",
            style("Dry run complete. Nothing was committed.").yellow()
        );
    }

    Ok(())
}
