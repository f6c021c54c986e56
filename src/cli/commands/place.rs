//! `packlist place` command - Storage place management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{confirm_delete, open_store, truncate_str, MoveDirection};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::auth::AuthContext;
use crate::core::config::Config;
use crate::core::ordering::Direction;

#[derive(Subcommand, Debug)]
pub enum PlaceCommands {
    /// Add a storage place to a vehicle (appends at the end)
    Add(AddArgs),

    /// List a vehicle's places in display order
    List(ListArgs),

    /// Rename a place
    Rename(RenameArgs),

    /// Move a place up or down within its vehicle
    Move(MoveArgs),

    /// Delete a place and its items
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// Place name (e.g. "Cab", "Rear Locker")
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Vehicle id or name
    pub vehicle: String,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Place id
    pub id: i64,

    /// New name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Place id
    pub id: i64,

    /// Direction to move
    #[arg(value_enum)]
    pub direction: MoveDirection,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Place id
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: PlaceCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        PlaceCommands::Add(args) => run_add(args, global),
        PlaceCommands::List(args) => run_list(args, global),
        PlaceCommands::Rename(args) => run_rename(args, global),
        PlaceCommands::Move(args) => run_move(args, global),
        PlaceCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let place = store
        .create_place(&auth, vehicle.id, &args.name)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Added place {} to {} (id {})",
        style("✓").green(),
        style(&place.name).cyan(),
        vehicle.name,
        place.id
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let places = store
        .list_places(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let counts = store
        .place_counts(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if places.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            _ => println!("No places in {} yet.", vehicle.name),
        }
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json_rows: Vec<serde_json::Value> = places
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "id": p.id,
                        "name": p.name,
                        "items": counts.get(&p.id).copied().unwrap_or(0),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json_rows).unwrap());
        }
        OutputFormat::Csv => {
            println!("id,name,items");
            for p in &places {
                println!(
                    "{},{},{}",
                    p.id,
                    crate::cli::helpers::escape_csv(&p.name),
                    counts.get(&p.id).copied().unwrap_or(0)
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Items |");
            println!("|---|---|---|");
            for p in &places {
                println!(
                    "| {} | {} | {} |",
                    p.id,
                    p.name,
                    counts.get(&p.id).copied().unwrap_or(0)
                );
            }
        }
        OutputFormat::Id => {
            for p in &places {
                println!("{}", p.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<5} {:<28} {:>6}",
                style("ID").bold(),
                style("NAME").bold(),
                style("ITEMS").bold()
            );
            println!("{}", "-".repeat(42));
            for p in &places {
                println!(
                    "{:<5} {:<28} {:>6}",
                    p.id,
                    truncate_str(&p.name, 26),
                    counts.get(&p.id).copied().unwrap_or(0)
                );
            }
        }
    }

    Ok(())
}

fn run_rename(args: RenameArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let place = store
        .rename_place(&auth, args.id, &args.name)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Renamed place to {}",
        style("✓").green(),
        style(&place.name).cyan()
    );
    Ok(())
}

fn run_move(args: MoveArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let place = store
        .place_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let direction: Direction = args.direction.into();
    let moved = store
        .move_place(&auth, args.id, direction)
        .map_err(|e| miette::miette!("{}", e))?;

    if moved {
        println!(
            "{} Moved {} {}",
            style("✓").green(),
            style(&place.name).cyan(),
            direction
        );
    } else {
        println!(
            "{} {} is already at that end of the order",
            style("○").dim(),
            place.name
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let place = store
        .place_by_id(args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    let prompt = format!("Delete place '{}' and its items?", place.name);
    if !confirm_delete(&prompt, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    let vehicle_id = store
        .delete_place(&auth, args.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted place {} (vehicle {})",
        style("✓").green(),
        style(&place.name).cyan(),
        vehicle_id
    );
    Ok(())
}
