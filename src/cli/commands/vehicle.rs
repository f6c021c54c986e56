//! `packlist vehicle` command - Vehicle management

use clap::Subcommand;
use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{
    confirm_delete, open_store, truncate_str, MoveDirection,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::auth::AuthContext;
use crate::core::config::Config;
use crate::core::ordering::Direction;

#[derive(Subcommand, Debug)]
pub enum VehicleCommands {
    /// List vehicles in display order
    List(ListArgs),

    /// Create a new vehicle
    New(NewArgs),

    /// Show a vehicle's full packing list
    Show(ShowArgs),

    /// Rename a vehicle
    Rename(RenameArgs),

    /// Set a vehicle's free-text description
    Describe(DescribeArgs),

    /// Move a vehicle up or down in display order
    Move(MoveArgs),

    /// Delete a vehicle and everything aboard it
    Rm(RmArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show count only, not the vehicles
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Vehicle name (unique, case-insensitive)
    pub name: String,

    /// Free-text description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Vehicle id or name
    pub vehicle: String,
}

#[derive(clap::Args, Debug)]
pub struct RenameArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// New name
    pub name: String,
}

#[derive(clap::Args, Debug)]
pub struct DescribeArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// Description text (empty clears it)
    pub text: String,
}

#[derive(clap::Args, Debug)]
pub struct MoveArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// Direction to move
    #[arg(value_enum)]
    pub direction: MoveDirection,
}

#[derive(clap::Args, Debug)]
pub struct RmArgs {
    /// Vehicle id or name
    pub vehicle: String,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: VehicleCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        VehicleCommands::List(args) => run_list(args, global),
        VehicleCommands::New(args) => run_new(args, global),
        VehicleCommands::Show(args) => run_show(args, global),
        VehicleCommands::Rename(args) => run_rename(args, global),
        VehicleCommands::Describe(args) => run_describe(args, global),
        VehicleCommands::Move(args) => run_move(args, global),
        VehicleCommands::Rm(args) => run_rm(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let vehicles = store.list_vehicles().map_err(|e| miette::miette!("{}", e))?;

    if args.count {
        println!("{}", vehicles.len());
        return Ok(());
    }

    if vehicles.is_empty() {
        match global.format {
            OutputFormat::Json => println!("[]"),
            _ => {
                println!("No vehicles yet.");
                println!();
                println!(
                    "Create one with: {}",
                    style("packlist vehicle new \"Engine 7\"").yellow()
                );
            }
        }
        return Ok(());
    }

    // Precompute place/item counts per vehicle
    let mut rows = Vec::new();
    for vehicle in &vehicles {
        let counts = store
            .place_counts(vehicle.id)
            .map_err(|e| miette::miette!("{}", e))?;
        let places = counts.len();
        let items: i64 = counts.values().sum();
        rows.push((vehicle, places, items));
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            let json_rows: Vec<serde_json::Value> = rows
                .iter()
                .map(|(v, places, items)| {
                    serde_json::json!({
                        "id": v.id,
                        "name": v.name,
                        "description": v.description,
                        "places": places,
                        "items": items,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json_rows).unwrap());
        }
        OutputFormat::Csv => {
            println!("id,name,places,items,description");
            for (v, places, items) in &rows {
                println!(
                    "{},{},{},{},{}",
                    v.id,
                    crate::cli::helpers::escape_csv(&v.name),
                    places,
                    items,
                    crate::cli::helpers::escape_csv(&v.description)
                );
            }
        }
        OutputFormat::Md => {
            println!("| ID | Name | Places | Items |");
            println!("|---|---|---|---|");
            for (v, places, items) in &rows {
                println!("| {} | {} | {} | {} |", v.id, v.name, places, items);
            }
        }
        OutputFormat::Id => {
            for (v, _, _) in &rows {
                println!("{}", v.id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{:<5} {:<28} {:>7} {:>6}",
                style("ID").bold(),
                style("NAME").bold(),
                style("PLACES").bold(),
                style("ITEMS").bold()
            );
            println!("{}", "-".repeat(50));
            for (v, places, items) in &rows {
                println!(
                    "{:<5} {:<28} {:>7} {:>6}",
                    v.id,
                    truncate_str(&v.name, 26),
                    places,
                    items
                );
            }
            if !global.quiet {
                println!();
                println!(
                    "{} vehicle(s). Use {} for the packing list.",
                    rows.len(),
                    style("packlist vehicle show <name>").cyan()
                );
            }
        }
    }

    Ok(())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .create_vehicle(&auth, &args.name, &args.description)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Created vehicle {} (id {})",
        style("✓").green(),
        style(&vehicle.name).cyan(),
        vehicle.id
    );
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let places = store
        .list_places(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;
    let documents = store
        .list_documents(vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;

    if global.format == OutputFormat::Json {
        let mut place_views = Vec::new();
        for place in &places {
            let items = store
                .list_items(place.id)
                .map_err(|e| miette::miette!("{}", e))?;
            place_views.push(serde_json::json!({
                "id": place.id,
                "name": place.name,
                "items": items,
            }));
        }
        let view = serde_json::json!({
            "id": vehicle.id,
            "name": vehicle.name,
            "description": vehicle.description,
            "documents": documents,
            "places": place_views,
        });
        println!("{}", serde_json::to_string_pretty(&view).unwrap());
        return Ok(());
    }

    println!(
        "{}  {}",
        style(&vehicle.name).bold().cyan(),
        style(format!("(vehicle {})", vehicle.id)).dim()
    );
    if !vehicle.description.is_empty() {
        println!("{}", vehicle.description);
    }
    if !documents.is_empty() {
        println!(
            "{} document(s) attached - see {}",
            documents.len(),
            style(format!("packlist doc list {}", vehicle.id)).cyan()
        );
    }
    println!();

    if places.is_empty() {
        println!("No places yet.");
        println!();
        println!(
            "Add one with: {}",
            style(format!("packlist place add {} \"Cab\"", vehicle.id)).yellow()
        );
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Place", "Item", "Qty", "Note"]);
    for place in &places {
        let items = store
            .list_items(place.id)
            .map_err(|e| miette::miette!("{}", e))?;
        if items.is_empty() {
            builder.push_record([place.name.as_str(), "-", "", ""]);
            continue;
        }
        for (index, item) in items.iter().enumerate() {
            let place_cell = if index == 0 { place.name.as_str() } else { "" };
            let quantity = item.quantity.to_string();
            builder.push_record([
                place_cell,
                item.name.as_str(),
                quantity.as_str(),
                item.note.as_str(),
            ]);
        }
    }

    let mut table = builder.build();
    match global.format {
        OutputFormat::Md => {
            table.with(Style::markdown());
        }
        _ => {
            table.with(Style::sharp());
        }
    }
    println!("{table}");

    Ok(())
}

fn run_rename(args: RenameArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let renamed = store
        .rename_vehicle(&auth, vehicle.id, &args.name)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Renamed vehicle to {}",
        style("✓").green(),
        style(&renamed.name).cyan()
    );
    Ok(())
}

fn run_describe(args: DescribeArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    store
        .set_description(&auth, vehicle.id, &args.text)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Updated description of {}",
        style("✓").green(),
        style(&vehicle.name).cyan()
    );
    Ok(())
}

fn run_move(args: MoveArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;
    let direction: Direction = args.direction.into();
    let moved = store
        .move_vehicle(&auth, vehicle.id, direction)
        .map_err(|e| miette::miette!("{}", e))?;

    if moved {
        println!(
            "{} Moved {} {}",
            style("✓").green(),
            style(&vehicle.name).cyan(),
            direction
        );
    } else {
        println!(
            "{} {} is already at that end of the order",
            style("○").dim(),
            vehicle.name
        );
    }
    Ok(())
}

fn run_rm(args: RmArgs, global: &GlobalOpts) -> Result<()> {
    let (project, mut store) = open_store(global)?;
    let config = Config::load_for(&project);
    let auth = AuthContext::resolve(&config);

    let vehicle = store
        .resolve_vehicle(&args.vehicle)
        .map_err(|e| miette::miette!("{}", e))?;

    let prompt = format!(
        "Delete vehicle '{}' and everything aboard it?",
        vehicle.name
    );
    if !confirm_delete(&prompt, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    store
        .delete_vehicle(&auth, vehicle.id)
        .map_err(|e| miette::miette!("{}", e))?;

    println!(
        "{} Deleted vehicle {}",
        style("✓").green(),
        style(&vehicle.name).cyan()
    );
    Ok(())
}
