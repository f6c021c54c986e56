//! `packlist history` command - Audit trail of recent changes

use console::style;
use miette::Result;

use crate::cli::helpers::{open_store, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};

#[derive(clap::Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(long, short = 'n', default_value = "20")]
    pub limit: usize,
}

pub fn run(args: HistoryArgs, global: &GlobalOpts) -> Result<()> {
    let (_project, store) = open_store(global)?;
    let entries = store
        .list_audit(args.limit)
        .map_err(|e| miette::miette!("{}", e))?;

    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries).unwrap());
        }
        _ => {
            println!(
                "{:<17} {:<14} {:<16} {:<28}",
                style("WHEN").bold(),
                style("OPERATOR").bold(),
                style("ACTION").bold(),
                style("DETAIL").bold()
            );
            println!("{}", "-".repeat(78));
            for entry in &entries {
                println!(
                    "{:<17} {:<14} {:<16} {:<28}",
                    entry.at.format("%Y-%m-%d %H:%M"),
                    truncate_str(&entry.operator, 12),
                    entry.action,
                    truncate_str(&entry.detail, 26)
                );
            }
        }
    }

    Ok(())
}
