//! Configuration file management for trailhead.
//!
//! Provides a TOML config file at `~/.config/trailhead/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use trailhead_core::generate::{GenerationConfig, GenerationError};
use trailhead_db::config::DbConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Generation endpoint URL. Empty means the built-in default.
    #[serde(default)]
    pub endpoint: String,
    /// API key for the generation endpoint.
    #[serde(default)]
    pub api_key: String,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the trailhead config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/trailhead` or
/// `~/.config/trailhead`, never the platform-specific config dir.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("trailhead");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("trailhead")
}

/// Return the path to the trailhead config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file at the default path. Returns an error
/// if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file at the default path, creating
/// parent dirs as needed. The file holds the API key, so permissions are
/// set to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &ConfigFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create config directory {}", dir.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Pick the database URL: flag > env > config file > default.
pub fn resolve_db_url(
    flag: Option<&str>,
    env_url: Option<&str>,
    file: Option<&ConfigFile>,
) -> String {
    if let Some(url) = flag {
        return url.to_owned();
    }
    if let Some(url) = env_url {
        return url.to_owned();
    }
    if let Some(file) = file {
        return file.database.url.clone();
    }
    DbConfig::DEFAULT_URL.to_owned()
}

/// Resolve the database config, reading the environment and the config
/// file (if present).
pub fn resolve_db(flag: Option<&str>) -> DbConfig {
    let env_url = std::env::var(DbConfig::URL_ENV).ok();
    let file = load_config().ok();
    DbConfig::new(resolve_db_url(flag, env_url.as_deref(), file.as_ref()))
}

/// Pick the generation config: env > config file > default endpoint.
///
/// A key available nowhere is a configuration error; generation cannot
/// proceed without one.
pub fn resolve_generation_from(
    env_endpoint: Option<&str>,
    env_key: Option<&str>,
    file: Option<&ConfigFile>,
) -> Result<GenerationConfig> {
    let file_generation = file.map(|f| &f.generation);

    let endpoint = env_endpoint
        .map(str::to_owned)
        .or_else(|| {
            file_generation
                .map(|g| g.endpoint.clone())
                .filter(|e| !e.is_empty())
        })
        .unwrap_or_else(|| GenerationConfig::DEFAULT_ENDPOINT.to_owned());

    let api_key = env_key
        .map(str::to_owned)
        .filter(|k| !k.trim().is_empty())
        .or_else(|| {
            file_generation
                .map(|g| g.api_key.clone())
                .filter(|k| !k.trim().is_empty())
        });

    match api_key {
        Some(key) => Ok(GenerationConfig::new(endpoint, key)),
        None => bail!(GenerationError::MissingApiKey),
    }
}

/// Resolve the generation config from the environment and the config file.
pub fn resolve_generation() -> Result<GenerationConfig> {
    let env_endpoint = std::env::var(GenerationConfig::ENDPOINT_ENV).ok();
    let env_key = std::env::var(GenerationConfig::API_KEY_ENV).ok();
    let file = load_config().ok();
    resolve_generation_from(env_endpoint.as_deref(), env_key.as_deref(), file.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> ConfigFile {
        ConfigFile {
            database: DatabaseSection {
                url: "postgresql://localhost:5432/trailhead".to_string(),
            },
            generation: GenerationSection {
                endpoint: "http://localhost:9000/generate".to_string(),
                api_key: "file-key".to_string(),
            },
        }
    }

    #[test]
    fn config_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        save_config_to(&path, &sample()).unwrap();
        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.database.url, sample().database.url);
        assert_eq!(loaded.generation.api_key, "file-key");
    }

    #[test]
    fn missing_generation_section_defaults_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\nurl = \"postgresql://h/db\"\n").unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert!(loaded.generation.endpoint.is_empty());
        assert!(loaded.generation.api_key.is_empty());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        save_config_to(&path, &sample()).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn db_url_resolution_order() {
        let file = sample();
        assert_eq!(
            resolve_db_url(Some("flag://db"), Some("env://db"), Some(&file)),
            "flag://db"
        );
        assert_eq!(
            resolve_db_url(None, Some("env://db"), Some(&file)),
            "env://db"
        );
        assert_eq!(
            resolve_db_url(None, None, Some(&file)),
            "postgresql://localhost:5432/trailhead"
        );
        assert_eq!(resolve_db_url(None, None, None), DbConfig::DEFAULT_URL);
    }

    #[test]
    fn generation_resolution_prefers_env() {
        let file = sample();
        let config =
            resolve_generation_from(Some("http://env/g"), Some("env-key"), Some(&file)).unwrap();
        assert_eq!(config.endpoint, "http://env/g");
        assert_eq!(config.api_key, "env-key");
    }

    #[test]
    fn generation_falls_back_to_file_then_default_endpoint() {
        let file = sample();
        let config = resolve_generation_from(None, None, Some(&file)).unwrap();
        assert_eq!(config.endpoint, "http://localhost:9000/generate");
        assert_eq!(config.api_key, "file-key");

        let mut no_endpoint = sample();
        no_endpoint.generation.endpoint.clear();
        let config = resolve_generation_from(None, Some("k"), Some(&no_endpoint)).unwrap();
        assert_eq!(config.endpoint, GenerationConfig::DEFAULT_ENDPOINT);
    }

    #[test]
    fn generation_without_any_key_is_an_error() {
        let mut file = sample();
        file.generation.api_key.clear();
        let err = resolve_generation_from(None, None, Some(&file)).unwrap_err();
        assert!(err.to_string().contains("not configured"));

        assert!(resolve_generation_from(None, Some("  "), None).is_err());
    }
}
