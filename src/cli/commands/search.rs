//! `packlist search` command - Search items across vehicles and places
//!
//! Every whitespace-separated token must match somewhere in the combined
//! item/place/vehicle names ("fire hose" finds a "Fire-Hose Nozzle").

use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search terms (all must match; substrings are enough)
    pub query: String,

    /// Restrict results to one vehicle (id or name)
    #[arg(long)]
    pub vehicle: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n', default_value = "50")]
    pub limit: usize,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;

    let vehicle_filter = match &args.vehicle {
        Some(reference) => Some(
            store
                .resolve_vehicle(reference)
                .map_err(|e| miette::miette!("{}", e))?
                .id,
        ),
        None => None,
    };

    let mut hits = store
        .search(&args.query, vehicle_filter)
        .map_err(|e| miette::miette!("{}", e))?;
    hits.truncate(args.limit);

    if args.count {
        println!("{}", hits.len());
        return Ok(());
    }

    if hits.is_empty() {
        println!("No results found for '{}'.", style(&args.query).yellow());
        return Ok(());
    }

    let format = match global.format {
        OutputFormat::Auto => OutputFormat::Tsv,
        f => f,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&hits).unwrap());
        }
        OutputFormat::Csv => {
            println!("item_id,item,quantity,place,vehicle");
            for hit in &hits {
                println!(
                    "{},{},{},{},{}",
                    hit.item_id,
                    crate::cli::helpers::escape_csv(&hit.item_name),
                    hit.quantity,
                    crate::cli::helpers::escape_csv(&hit.place_name),
                    crate::cli::helpers::escape_csv(&hit.vehicle_name)
                );
            }
        }
        OutputFormat::Md => {
            println!("| Item | Qty | Place | Vehicle |");
            println!("|---|---|---|---|");
            for hit in &hits {
                println!(
                    "| {} | {} | {} | {} |",
                    hit.item_name, hit.quantity, hit.place_name, hit.vehicle_name
                );
            }
        }
        OutputFormat::Id => {
            for hit in &hits {
                println!("{}", hit.item_id);
            }
        }
        OutputFormat::Tsv | OutputFormat::Auto => {
            println!(
                "{} result(s) for '{}':",
                style(hits.len()).cyan(),
                style(&args.query).yellow()
            );
            println!();
            println!(
                "{:<5} {:<26} {:>4}  {:<20} {:<20}",
                style("ID").bold(),
                style("ITEM").bold(),
                style("QTY").bold(),
                style("PLACE").bold(),
                style("VEHICLE").bold()
            );
            println!("{}", "-".repeat(80));
            for hit in &hits {
                println!(
                    "{:<5} {:<26} {:>4}  {:<20} {:<20}",
                    hit.item_id,
                    truncate_str(&hit.item_name, 24),
                    hit.quantity,
                    truncate_str(&hit.place_name, 18),
                    truncate_str(&hit.vehicle_name, 18)
                );
            }
        }
    }

    Ok(())
}
