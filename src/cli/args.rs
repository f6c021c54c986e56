//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs,
    config::ConfigCommands,
    doc::DocCommands,
    export::ExportArgs,
    history::HistoryArgs,
    import::ImportArgs,
    init::InitArgs,
    item::ItemCommands,
    place::PlaceCommands,
    search::SearchArgs,
    vehicle::VehicleCommands,
};

#[derive(Parser)]
#[command(name = "packlist")]
#[command(author, version, about = "Vehicle stowage tracking")]
#[command(
    long_about = "A Unix-style toolkit for tracking the equipment stowed aboard a fleet of vehicles: ordered places and items, documents, CSV import/export and search."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Project root (default: auto-detect by finding .packlist/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new packlist project
    Init(InitArgs),

    /// Vehicle management
    #[command(subcommand)]
    Vehicle(VehicleCommands),

    /// Storage place management (compartments, lockers, shelves)
    #[command(subcommand)]
    Place(PlaceCommands),

    /// Item management (equipment within a place)
    #[command(subcommand)]
    Item(ItemCommands),

    /// Document attachments on a vehicle
    #[command(subcommand)]
    Doc(DocCommands),

    /// Import places and items from a CSV file
    Import(ImportArgs),

    /// Export a vehicle's packing list as CSV
    Export(ExportArgs),

    /// Search items across vehicles and places
    Search(SearchArgs),

    /// Show the audit trail of recent changes
    History(HistoryArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context
    #[default]
    Auto,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
