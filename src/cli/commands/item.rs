//! `packlist item` command - Item management

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{confirm_delete, open_store, truncate_str, MoveDirection};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::auth::AuthContext;
use crate::core::blob::BlobStore;
use crate::core::config::Config;
use crate::core::ordering::Direction;
use crate::core::store::ItemPatch;

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item to a place (appends at the end)
    Add(AddArgs),

    /// List a place's items in display order
    List(ListArgs),

    /// Edit an item's fields, optionally moving it to another place
    Edit(EditArgs),

    /// Move an item up or down within its place
    Move(MoveArgs),

    /// Attach a photo to an item (replaces any previous photo)
    Photo(PhotoArgs),

    /// Delete an item
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Place id the item goes into
    pub place: i64,

    /// Item name
    pub name: String,

    /// Quantity carried
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(0..))]
    pub quantity: i64,

    /// Free-text note
    #[arg(long, default_value = "")]
    pub note: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Place id
    pub place: i64,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Item id
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New quantity
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub quantity: Option<i64>,

    /// New note
    #[arg(long)]
    pub note: Option<String>,

    /// Move the item to this place id (appends at the end there)
    #[arg(long)]
    pub place: Option<i64>,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Item id
    pub id: i64,

    /// Direction to move
    #[arg(value_enum)]
    pub direction: MoveDirection,
}

#[derive(clap::Args, Debug)]
pub struct PhotoArgs {
    /// Item id
    pub id: i64,

    /// Image file to attach
    pub file: PathBuf,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Item id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: ItemCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ItemCommands::Add(args) => run_add(args, global),
        ItemCommands::List(args) => run_list(args, global),
        ItemCommands::Edit(args) => run_edit(args, global),
        ItemCommands::Move(args) => run_move(args, global),
        ItemCommands::Photo(args) => run_photo(args, global),
        ItemCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let place = store
        .place_by_id(args.place)
        .map_err(|e| miette::miette!("{}", e))?;
    let item = store
        .create_item(&auth, args.place, &args.name, args.quantity, &args.note)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Added {} x{} to {} (id {})",
        style("✓").green(),
        style(&item.name).cyan(),
        item.quantity,
        place.name,
        item.id
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let place = store
        .place_by_id(args.place)
        .map_err(|e| miette::miette!("{}", e))?;
    let items = store
        .list_items(args.place)
        .map_err(|e| miette::miette!("{}", e))?;

    if items.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            _ => println!("No items in {} yet.", place.name),
        }
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items).unwrap());
        }
        OutputFormat::Csv => {
            println!("id,name,quantity,note,photo");
            for item in &items {
                println!(
                    "{},{},{},{},{}",
                    item.id,
                    crate::cli::helpers::escape_csv(&item.name),
                    item.quantity,
                    crate::cli::helpers::escape_csv(&item.note),
                    item.photo_path.as_deref().unwrap_or("")
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Qty | Note |");
            println!("|---|---|---|---|");
            for item in &items {
                println!(
                    "| {} | {} | {} | {} |",
                    item.id, item.name, item.quantity, item.note
                );
            }
        }
        OutputFormat::Id => {
            for item in &items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<5} {:<28} {:>4}  {:<24}",
                style("ID").bold(),
                style("NAME").bold(),
                style("QTY").bold(),
                style("NOTE").bold()
            );
            println!("{}", "-".repeat(66));
            for item in &items {
                let mut note = truncate_str(&item.note, 22);
                if item.photo_path.is_some() {
                    note = format!("{note} [photo]").trim_start().to_string();
                }
                println!(
                    "{:<5} {:<28} {:>4}  {:<24}",
                    item.id,
                    truncate_str(&item.name, 26),
                    item.quantity,
                    note
                );
            }
        }
    }

    Ok(())
}

fn run_edit(args: EditArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let patch = ItemPatch {
        name: args.name,
        quantity: args.quantity,
        note: args.note,
        place_id: args.place,
    };
    let item = store
        .update_item(&auth, args.id, patch)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Updated {} (id {})",
        style("✓").green(),
        style(&item.name).cyan(),
        item.id
    );
    Ok(())
}

fn run_move(args: MoveArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let item = store
        .item_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let direction: Direction = args.direction.into();
    let moved = store
        .move_item(&auth, args.id, direction)
        .map_err(|e| miette::miette!("{}", e))?;

    if moved {
        println!(
            "{} Moved {} {}",
            style("✓").green(),
            style(&item.name).cyan(),
            direction
        );
    } else {
        println!(
            "{} {} is already at that end of the order",
            style("○").dim(),
            item.name
        );
    }
    Ok(())
}

fn run_photo(args: PhotoArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let item = store
        .item_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let blobs = BlobStore::open(&project);
    let blob = blobs
        .store(&args.file)
        .map_err(|e| miette::miette!("{}", e))?;
    store
        .attach_photo(&auth, args.id, &blob.stored_name)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Attached photo to {} ({})",
        style("✓").green(),
        style(&item.name).cyan(),
        blobs.path_for(&blob.stored_name).display()
    );
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let item = store
        .item_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let prompt = format!("Delete item '{}'?", item.name);
    if !confirm_delete(&prompt, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let vehicle_id = store
        .delete_item(&auth, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted item {} (vehicle {})",
        style("✓").green(),
        style(&item.name).cyan(),
        vehicle_id
    );
    Ok(())
}
