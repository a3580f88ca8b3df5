use std::{
    fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::{ConfigError, Result},
    path::{resolve_path, xdg_config_home, xdg_data_home},
};

pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Storefront configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Path to the SQLite database holding products and orders.
    /// Default: $XDG_DATA_HOME/storefront/storefront.db
    pub db_path: Option<String>,

    /// Maximum number of orders shown by `orders list`.
    /// Default: 50
    pub list_limit: Option<i64>,

    /// Colored terminal output.
    /// Default: true
    pub color: Option<bool>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("STOREFRONT_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("storefront").join("config.toml"),
    })
});

fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|path| path.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

/// Points the global configuration at another file.
pub fn set_config_path(path: PathBuf) {
    let mut config_path = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *config_path = path;
}

/// Loads the configuration file into the global slot.
pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *global_config = Some(config);
    Ok(())
}

/// Returns the loaded configuration, or the defaults when none was loaded.
pub fn get_config() -> Config {
    CONFIG
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
        .unwrap_or_default()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: Some(format!(
                "{}/storefront/storefront.db",
                xdg_data_home().display()
            )),
            list_limit: Some(DEFAULT_LIST_LIMIT),
            color: Some(true),
        }
    }
}

impl Config {
    /// Creates a new configuration by loading it from the configuration file.
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load(&config_path())
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        let limit = *self.list_limit.get_or_insert(DEFAULT_LIST_LIMIT);
        if limit <= 0 {
            return Err(ConfigError::InvalidListLimit(limit));
        }

        self.color.get_or_insert(true);

        Ok(())
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("STOREFRONT_DB") {
            return resolve_path(&env_path);
        }
        if let Some(db_path) = &self.db_path {
            return resolve_path(db_path);
        }
        Ok(xdg_data_home().join("storefront").join("storefront.db"))
    }

    pub fn list_limit(&self) -> i64 {
        self.list_limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }

    pub fn color(&self) -> bool {
        self.color.unwrap_or(true)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

/// Writes the default configuration to the configured path.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    Config::default().save()?;
    info!(
        "Default configuration file generated at: {}",
        config_path.display()
    );
    Ok(config_path)
}
