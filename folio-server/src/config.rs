use crate::catalog::Catalog;
use crate::error::{CatalogError, ConfigError, Result};
use serde::Deserialize;
use std::fs::read_to_string;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_bind() -> String {
    "[::]:8000".into()
}

fn default_workers() -> usize {
    4
}

fn default_connection_rate() -> usize {
    256
}

fn default_enable_compression() -> bool {
    false
}

fn default_database_path() -> PathBuf {
    PathBuf::from("catalog.sqlite")
}

fn default_query_log_path() -> PathBuf {
    PathBuf::from("analyze-queries.csv")
}

fn default_library_cache_ttl() -> u64 {
    // 15 minutes
    60 * 15
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    #[serde(default = "default_bind")]
    pub(crate) bind: String,
    #[serde(default = "default_workers")]
    pub(crate) workers: usize,
    #[serde(default = "default_connection_rate")]
    pub(crate) max_connection_rate: usize,

    #[serde(default = "default_enable_compression")]
    pub(crate) enable_compression: bool,

    #[serde(default = "default_database_path")]
    pub(crate) database_path: PathBuf,
    #[serde(default = "default_query_log_path")]
    pub(crate) query_log_path: PathBuf,
    #[serde(default = "default_library_cache_ttl")]
    pub(crate) library_cache_ttl_secs: u64,

    #[serde(skip)]
    pub(crate) catalog: Catalog,
}

impl Config {
    pub(crate) fn load(settings_file: &Path) -> Result<Config> {
        let contents = read_to_string(settings_file).map_err(|e| ConfigError::ReadFile {
            path: settings_file.display().to_string(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    pub(crate) fn parse(contents: &str) -> Result<Config> {
        toml::from_str(contents).map_err(|e| CatalogError::from(ConfigError::from(e)))
    }
}

pub(crate) fn load() -> Result<Config> {
    let mut settings = match std::env::var("CONFIG_FILE") {
        Err(_) => {
            if Path::new("settings.toml").exists() {
                Config::load(Path::new("settings.toml"))?
            } else {
                // No config file: every key has a default
                Config::parse("")?
            }
        }
        Ok(settings_file) => Config::load(Path::new(&settings_file))?,
    };

    if settings.workers == 0 {
        return Err(ConfigError::Invalid {
            reason: "workers must be greater than 0".to_string(),
        }
        .into());
    }

    settings.catalog = Catalog::new(
        settings.database_path.clone(),
        settings.query_log_path.clone(),
        Duration::from_secs(settings.library_cache_ttl_secs),
    );
    Ok(settings)
}
