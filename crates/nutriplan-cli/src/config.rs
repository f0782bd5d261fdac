//! Configuration file management for nutriplan.
//!
//! Provides a TOML-based config file at `~/.config/nutriplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nutriplan_core::generation::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use nutriplan_core::store::default_data_dir;
use nutriplan_db::config::DbConfig;

pub const GENERATION_URL_ENV: &str = "NUTRIPLAN_GENERATION_URL";
pub const MODEL_ENV: &str = "NUTRIPLAN_MODEL";
pub const DATA_DIR_ENV: &str = "NUTRIPLAN_DATA_DIR";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    pub owner: OwnerSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerSection {
    /// Identifies this user's saved plans and profile.
    pub id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSection {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the nutriplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/nutriplan` or `~/.config/nutriplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("nutriplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("nutriplan")
}

/// Return the path to the nutriplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

/// Write `config` to `path` with mode 0600 on Unix.
pub fn save_config_to(config: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Generation endpoint settings after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct NutriplanConfig {
    pub db_config: DbConfig,
    pub owner_id: Option<Uuid>,
    pub generation: GenerationSettings,
    pub data_dir: PathBuf,
}

/// Overrides taken from command-line flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub database_url: Option<&'a str>,
    pub generation_url: Option<&'a str>,
    pub model: Option<&'a str>,
}

impl NutriplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - DB URL: flag > `NUTRIPLAN_DATABASE_URL` > `database.url` > `DbConfig::DEFAULT_URL`
    /// - Generation URL/model: flag > env > `[generation]` > built-in default
    /// - Data dir: `NUTRIPLAN_DATA_DIR` > `$XDG_DATA_HOME/nutriplan`
    /// - Owner id: config file only
    pub fn resolve(cli: CliOverrides<'_>) -> Self {
        Self::from_sources(cli, load_config().ok())
    }

    pub fn from_sources(cli: CliOverrides<'_>, file_config: Option<ConfigFile>) -> Self {
        let db_url = if let Some(url) = cli.database_url {
            url.to_string()
        } else if let Ok(url) = std::env::var(DbConfig::ENV_VAR) {
            url
        } else if let Some(ref cfg) = file_config {
            cfg.database.url.clone()
        } else {
            DbConfig::DEFAULT_URL.to_string()
        };

        let file_generation = file_config
            .as_ref()
            .map(|cfg| cfg.generation.clone())
            .unwrap_or_default();

        let base_url = pick(cli.generation_url, GENERATION_URL_ENV, file_generation.base_url);
        let model = pick(cli.model, MODEL_ENV, file_generation.model);

        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            db_config: DbConfig::new(db_url),
            owner_id: file_config.as_ref().map(|cfg| cfg.owner.id),
            generation: GenerationSettings {
                base_url,
                model,
                timeout: Duration::from_secs(file_generation.timeout_secs),
            },
            data_dir,
        }
    }

    /// The owner id, or an error telling the user to run `nutriplan init`.
    pub fn require_owner(&self) -> Result<Uuid> {
        self.owner_id.context(
            "owner id not found; run `nutriplan init` to create a config file",
        )
    }
}

fn pick(flag: Option<&str>, env_var: &str, fallback: String) -> String {
    flag.map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or(fallback)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
