//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::PathBuf;

use crate::core::Project;

/// packlist configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Operator name recorded in the audit trail
    pub operator: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// CSV field delimiter for export and as import fallback
    pub csv_delimiter: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/packlist/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        // 3. Project config (.packlist/config.yaml)
        if let Ok(project) = Project::discover() {
            config.merge_project(&project);
        }

        // 4. Environment variables
        config.merge_env();

        config
    }

    /// Load configuration for an already-discovered project
    ///
    /// Same cascade as `load`, but does not re-run project discovery, so it
    /// honors an explicit `--project` override.
    pub fn load_for(project: &Project) -> Self {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<Config>(&contents) {
                        config.merge(global);
                    }
                }
            }
        }

        config.merge_project(project);
        config.merge_env();
        config
    }

    fn merge_project(&mut self, project: &Project) {
        let project_config_path = project.packlist_dir().join("config.yaml");
        if project_config_path.exists() {
            if let Ok(contents) = std::fs::read_to_string(&project_config_path) {
                if let Ok(project_config) = serde_yml::from_str::<Config>(&contents) {
                    self.merge(project_config);
                }
            }
        }
    }

    fn merge_env(&mut self) {
        if let Ok(operator) = std::env::var("PACKLIST_OPERATOR") {
            self.operator = Some(operator);
        }
        if let Ok(delimiter) = std::env::var("PACKLIST_DELIMITER") {
            self.csv_delimiter = Some(delimiter);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "packlist")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.operator.is_some() {
            self.operator = other.operator;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.csv_delimiter.is_some() {
            self.csv_delimiter = other.csv_delimiter;
        }
    }

    /// Get the operator name, falling back to git config or username
    pub fn operator(&self) -> String {
        if let Some(ref operator) = self.operator {
            return operator.clone();
        }

        // Try git config
        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return name;
                }
            }
        }

        // Fall back to username
        std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "operator".to_string())
    }

    /// Get the CSV delimiter as a single byte, defaulting to ','
    pub fn csv_delimiter(&self) -> u8 {
        self.csv_delimiter
            .as_deref()
            .and_then(|s| s.as_bytes().first().copied())
            .unwrap_or(b',')
    }
}
