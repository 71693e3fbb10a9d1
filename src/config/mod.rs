mod file_config;

pub use file_config::FileConfig;

use anyhow::{anyhow, bail, Result};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Command line values that take part in config resolution.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: LevelFilter,
    pub history_file: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow!("db_path must be specified on the command line or in the config file")
            })?;
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }

        let log_level = match file.log_level.or_else(|| cli.log_level.clone()) {
            Some(level) => parse_log_level(&level)
                .ok_or_else(|| anyhow!("Invalid log level: {}", level))?,
            None => LevelFilter::INFO,
        };

        let history_file = file
            .history_file
            .map(PathBuf::from)
            .or_else(|| cli.history_file.clone());

        Ok(AppConfig {
            db_path,
            log_level,
            history_file,
        })
    }
}

fn parse_log_level(s: &str) -> Option<LevelFilter> {
    s.trim().parse().ok()
}
