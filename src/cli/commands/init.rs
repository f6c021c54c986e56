//! `packlist init` command - Project initialization

use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::core::project::{Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Re-initialize even if a project already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    if args.force {
        let project = Project::init_force(&args.path).map_err(|e| miette::miette!("{}", e))?;
        println!(
            "{} Initialized packlist project at {}",
            style("✓").green(),
            style(project.root().display()).cyan()
        );
        return Ok(());
    }

    match Project::init(&args.path) {
        Ok(project) => {
            println!(
                "{} Initialized packlist project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            println!(
                "Add a vehicle with: {}",
                style("packlist vehicle new \"Engine 7\"").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(root)) => {
            println!(
                "{} packlist project already exists at {}",
                style("!").yellow(),
                root.display()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
