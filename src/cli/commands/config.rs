//! `packlist config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::open_project;
use crate::cli::GlobalOpts;
use crate::core::config::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show,

    /// Show paths to configuration files
    Path,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show => run_show(global),
        ConfigCommands::Path => run_path(global),
    }
}

fn run_show(global: &GlobalOpts) -> Result<()> {
    let config = match open_project(global) {
        Ok(project) => Config::load_for(&project),
        Err(_) => Config::load(),
    };

    println!("{:<16} {}", style("operator").bold(), config.operator());
    println!(
        "{:<16} {}",
        style("default_format").bold(),
        config.default_format.as_deref().unwrap_or("auto")
    );
    println!(
        "{:<16} {}",
        style("csv_delimiter").bold(),
        (config.csv_delimiter() as char)
    );
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    if let Some(global_path) = Config::global_config_path() {
        println!("global:  {}", global_path.display());
    }
    if let Ok(project) = open_project(global) {
        println!(
            "project: {}",
            project.packlist_dir().join("config.yaml").display()
        );
    }
    Ok(())
}
