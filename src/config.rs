//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::auth::{AuthResult, CredentialHasher};
use crate::storage::{DIRECTORY_KEY, SESSION_KEY};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the credential directory lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryBackend {
    /// JSON array inside the local storage file
    Json,
    /// Indexed SQLite table
    Sqlite,
}

impl std::str::FromStr for DirectoryBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(DirectoryBackend::Json),
            "sqlite" => Ok(DirectoryBackend::Sqlite),
            _ => Err(format!("Unknown storage backend: {}", s)),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_backend")]
    pub backend: DirectoryBackend,

    #[serde(default = "default_directory_key")]
    pub directory_key: String,

    #[serde(default = "default_session_key")]
    pub session_key: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("bepawa").to_string_lossy().to_string())
        .unwrap_or_else(|| "./bepawa_data".to_string())
}

fn default_backend() -> DirectoryBackend {
    DirectoryBackend::Json
}

fn default_directory_key() -> String {
    DIRECTORY_KEY.to_string()
}

fn default_session_key() -> String {
    SESSION_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: default_backend(),
            directory_key: default_directory_key(),
            session_key: default_session_key(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~` expanded to the home directory
    pub fn data_path(&self) -> PathBuf {
        expand_home(&self.data_dir)
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return PathBuf::from(path),
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => {
            tracing::warn!(path = %path, "No home directory to expand ~ against");
            PathBuf::from(path)
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_seed_demo_accounts")]
    pub seed_demo_accounts: bool,

    #[serde(default = "default_hash_memory")]
    pub hash_memory_kib: u32,

    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

fn default_seed_demo_accounts() -> bool {
    true
}

fn default_hash_memory() -> u32 {
    19 * 1024 // 19 MiB
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            seed_demo_accounts: default_seed_demo_accounts(),
            hash_memory_kib: default_hash_memory(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

impl AuthConfig {
    /// Credential hasher with the configured cost
    pub fn hasher(&self) -> AuthResult<CredentialHasher> {
        CredentialHasher::new(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("bepawa").join("config.toml")),
            Some(PathBuf::from("./bepawa.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_dir) = std::env::var("BEPAWA_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }
        if let Ok(backend) = std::env::var("BEPAWA_STORAGE_BACKEND") {
            match backend.parse() {
                Ok(b) => self.storage.backend = b,
                Err(e) => tracing::warn!("Ignoring BEPAWA_STORAGE_BACKEND: {}", e),
            }
        }

        if let Ok(level) = std::env::var("BEPAWA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("BEPAWA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Bepawa Configuration
#
# Environment variables override these settings:
# - BEPAWA_DATA_DIR
# - BEPAWA_STORAGE_BACKEND
# - BEPAWA_LOG_LEVEL
# - BEPAWA_LOG_FORMAT

[storage]
# Directory holding local_storage.json (and directory.db for sqlite)
data_dir = "~/.local/share/bepawa"

# Credential directory backend: json (flat array) or sqlite (indexed table)
backend = "json"

# Local storage keys
directory_key = "bepawa_users"
session_key = "bepawa_current_user"

[auth]
# Write the five demo accounts into an empty directory
seed_demo_accounts = true

# Argon2id cost
hash_memory_kib = 19456
hash_iterations = 2
hash_parallelism = 1

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.storage.backend, DirectoryBackend::Json);
        assert_eq!(config.storage.directory_key, "bepawa_users");
        assert_eq!(config.storage.session_key, "bepawa_current_user");
        assert!(config.auth.seed_demo_accounts);
        assert_eq!(config.auth.hash_memory_kib, 19456);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[storage]\nbackend = \"sqlite\"\n").unwrap();
        assert_eq!(config.storage.backend, DirectoryBackend::Sqlite);
        assert_eq!(config.storage.session_key, SESSION_KEY);
        assert_eq!(config.auth.hash_iterations, 2);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::parse("[storage]\nbackend = \"redis\"\n").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\nhash_iterations = \"many\"\n").unwrap();

        match Config::load(&path) {
            Err(ConfigError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_data_path_expands_home() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let path = config.storage.data_path();
        assert!(!path.starts_with("~"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join(".local/share/bepawa"));
        }

        let plain = StorageConfig {
            data_dir: "./data/~cache".to_string(),
            ..Default::default()
        };
        assert_eq!(plain.data_path(), PathBuf::from("./data/~cache"));
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_hasher_from_config() {
        let auth = AuthConfig {
            hash_memory_kib: 64,
            hash_iterations: 1,
            ..Default::default()
        };
        assert!(auth.hasher().is_ok());
    }
}
