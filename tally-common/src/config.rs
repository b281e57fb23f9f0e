//! Configuration loading and root folder resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument or environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! A missing config file is not an error; the service starts on defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "TALLY_ROOT_FOLDER";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Password used when nothing else is configured
pub const DEFAULT_ADMIN_PASS: &str = "change-me";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "elections.db";

/// Candidate CSV picked up by sync-file when no path is given
pub const CANDIDATES_CSV_FILE: &str = "candidates.csv";

/// Logging section of the TOML config
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "tally_server=debug"
    pub level: Option<String>,
}

/// On-disk TOML configuration; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub admin_pass: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub candidates_csv: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load config from disk
    ///
    /// An explicit path must exist. Without one, the platform config locations
    /// are searched and compiled defaults are used if none is present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    info!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = std::fs::read_to_string(&path)?;
        let config = Self::parse(&content)?;
        info!("Loaded config file: {}", path.display());
        Ok(config)
    }
}

/// Values supplied on the command line (or via their env fallbacks)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_folder: Option<PathBuf>,
    pub admin_pass: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub candidates_csv: Option<PathBuf>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct TallyConfig {
    pub root_folder: PathBuf,
    pub admin_pass: String,
    pub bind: String,
    pub port: u16,
    pub candidates_csv: PathBuf,
    pub log_level: Option<String>,
}

impl TallyConfig {
    /// Merge overrides, TOML and compiled defaults
    pub fn resolve(overrides: ConfigOverrides, toml_config: TomlConfig) -> Self {
        let root_folder =
            resolve_root_folder(overrides.root_folder.as_deref(), ROOT_FOLDER_ENV, &toml_config);

        let admin_pass = match overrides.admin_pass.or(toml_config.admin_pass) {
            Some(pass) if !pass.is_empty() => pass,
            _ => {
                warn!(
                    "No admin password configured, using the default '{}'",
                    DEFAULT_ADMIN_PASS
                );
                DEFAULT_ADMIN_PASS.to_string()
            }
        };

        let candidates_csv = overrides
            .candidates_csv
            .or(toml_config.candidates_csv)
            .unwrap_or_else(|| root_folder.join(CANDIDATES_CSV_FILE));

        Self {
            admin_pass,
            bind: overrides
                .bind
                .or(toml_config.bind)
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: overrides.port.or(toml_config.port).unwrap_or(DEFAULT_PORT),
            candidates_csv,
            log_level: toml_config.logging.level,
            root_folder,
        }
    }

    /// Path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Create the root folder if missing
    pub fn ensure_root_folder(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }
}

/// Resolve the root folder: CLI argument, then environment, then TOML, then default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    toml_config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Platform config file location, if one exists
///
/// Linux checks `~/.config/tally/config.toml` then `/etc/tally/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("tally").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tally/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tally"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_toml() {
        let config = TomlConfig::parse(
            r#"
            root_folder = "/srv/tally"
            admin_pass = "secret"
            bind = "0.0.0.0"
            port = 8080
            candidates_csv = "/srv/tally/list.csv"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/tally")));
        assert_eq!(config.admin_pass.as_deref(), Some("secret"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.root_folder.is_none());
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = TomlConfig::parse("port = \"not a number\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides_beat_toml() {
        let toml_config = TomlConfig {
            root_folder: Some(PathBuf::from("/from/toml")),
            admin_pass: Some("toml-pass".to_string()),
            port: Some(4000),
            ..Default::default()
        };
        let overrides = ConfigOverrides {
            root_folder: Some(PathBuf::from("/from/cli")),
            admin_pass: Some("cli-pass".to_string()),
            ..Default::default()
        };

        let config = TallyConfig::resolve(overrides, toml_config);
        assert_eq!(config.root_folder, PathBuf::from("/from/cli"));
        assert_eq!(config.admin_pass, "cli-pass");
        assert_eq!(config.port, 4000);
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.database_path(), PathBuf::from("/from/cli/elections.db"));
        assert_eq!(
            config.candidates_csv,
            PathBuf::from("/from/cli/candidates.csv")
        );
    }

    #[test]
    fn test_empty_password_falls_back_to_default() {
        let overrides = ConfigOverrides {
            root_folder: Some(PathBuf::from("/tmp/x")),
            admin_pass: Some(String::new()),
            ..Default::default()
        };
        let config = TallyConfig::resolve(overrides, TomlConfig::default());
        assert_eq!(config.admin_pass, DEFAULT_ADMIN_PASS);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let result = TomlConfig::load(Some(Path::new("/nonexistent/tally/config.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
