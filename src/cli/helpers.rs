//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use clap::ValueEnum;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::ordering::Direction;
use crate::core::project::Project;
use crate::core::store::CatalogStore;

/// Open the project, honoring an explicit `--project` root
pub fn open_project(global: &GlobalOpts) -> Result<Project> {
    let result = match &global.project {
        Some(path) => Project::discover_from(path),
        None => Project::discover(),
    };
    result.map_err(|e| miette::miette!("{}", e))
}

/// Open the project and its catalog store
pub fn open_store(global: &GlobalOpts) -> Result<(Project, CatalogStore)> {
    let project = open_project(global)?;
    let store = CatalogStore::open(&project).map_err(|e| miette::miette!("{}", e))?;
    Ok((project, store))
}

/// Move direction as a CLI value
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(direction: MoveDirection) -> Self {
        match direction {
            MoveDirection::Up => Direction::Up,
            MoveDirection::Down => Direction::Down,
        }
    }
}

/// Ask before a destructive cascade delete.
///
/// `--yes` skips the prompt; without a terminal the answer is "no", so
/// scripts must pass `--yes` explicitly.
pub fn confirm_delete(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !console::user_attended() {
        eprintln!(
            "{} Refusing to delete without confirmation; pass {} in scripts.",
            style("✗").red(),
            style("--yes").yellow()
        );
        return Ok(false);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
