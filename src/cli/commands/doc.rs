//! `packlist doc` command - Document attachments on a vehicle

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{confirm_delete, open_store, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::auth::AuthContext;
use crate::core::blob::BlobStore;
use crate::core::config::Config;

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// Attach a file to a vehicle
    Attach(AttachArgs),

    /// List a vehicle's documents
    List(ListArgs),

    /// Print the on-disk path of a stored document
    Path(PathArgs),

    /// Remove a document record
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// File to attach
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Vehicle id or name
    pub vehicle: String,
}

#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Document id
    pub id: i64,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Document id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: DocCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DocCommands::Attach(args) => run_attach(args, global),
        DocCommands::List(args) => run_list(args, global),
        DocCommands::Path(args) => run_path(args, global),
        DocCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_attach(args: AttachArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;

    let blobs = BlobStore::open(&project);
    let blob = blobs
        .store(&args.file)
        .map_err(|e| miette::miette!("{}", e))?;
    let document = store
        .attach_document(&auth, vehicle.id, &blob.original_name, &blob.stored_name)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Attached {} to {} (id {})",
        style("✓").green(),
        style(&document.original_name).cyan(),
        vehicle.name,
        document.id
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let documents = store
        .list_documents(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if documents.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            _ => println!("No documents attached to {}.", vehicle.name),
        }
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&documents).unwrap());
        }
        OutputFormat::Id => {
            for document in &documents {
                println!("{}", document.id);
            }
        }
        _ => {
            println!(
                "{:<5} {:<32} {:<20}",
                style("ID").bold(),
                style("NAME").bold(),
                style("UPLOADED").bold()
            );
            println!("{}", "-".repeat(60));
            for document in &documents {
                println!(
                    "{:<5} {:<32} {:<20}",
                    document.id,
                    truncate_str(&document.original_name, 30),
                    document.uploaded.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}

fn run_path(args: PathArgs, global: &GlobalOpts) -> Result<()> {
    let (project, store) = open_store(global)?;
    let document = store
        .document_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let blobs = BlobStore::open(&project);
    println!("{}", blobs.path_for(&document.stored_name).display());
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let document = store
        .document_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let prompt = format!("Remove document '{}'?", document.original_name);
    if !confirm_delete(&prompt, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let vehicle_id = store
        .delete_document(&auth, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Removed document {} (vehicle {})",
        style("✓").green(),
        style(&document.original_name).cyan(),
        vehicle_id
    );
    Ok(())
}
