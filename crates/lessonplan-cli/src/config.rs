//! Configuration file management for lessonplan.
//!
//! Provides a TOML-based config file at `~/.config/lessonplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use lessonplan_core::client::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use lessonplan_core::GeminiConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

pub const ENV_BIND: &str = "LESSONPLAN_BIND";
pub const ENV_PORT: &str = "LESSONPLAN_PORT";
pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_MODEL: &str = "LESSONPLAN_MODEL";
pub const ENV_BASE_URL: &str = "LESSONPLAN_GEMINI_BASE_URL";
pub const ENV_TIMEOUT: &str = "LESSONPLAN_TIMEOUT_SECS";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub generation: GenerationSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationSection {
    /// Gemini API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the lessonplan config directory.
///
/// Uses `$XDG_CONFIG_HOME/lessonplan` when set, `~/.config/lessonplan`
/// otherwise, on every platform.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("lessonplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("lessonplan")
}

/// Return the path to the lessonplan config file.
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
    toml::from_str(&contents).context("failed to parse config file")
}

pub fn save_config(config: &ConfigFile) -> Result<()> {
    save_config_to(config, &config_path())
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since the file holds the API key.
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

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct LessonplanConfig {
    pub bind: String,
    pub port: u16,
    pub gemini: GeminiConfig,
}

impl LessonplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// A missing or unreadable config file is treated as empty. A missing API
    /// key is not an error here: generation requests fail individually.
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let file_config = load_config().ok();
        Self::resolve_with(cli, file_config.as_ref())
    }

    pub fn resolve_with(cli: &CliOverrides, file: Option<&ConfigFile>) -> Result<Self> {
        let server = file.map(|f| &f.server);
        let generation = file.map(|f| &f.generation);

        let bind = match &cli.bind {
            Some(b) => b.clone(),
            None => env_var(ENV_BIND)
                .or_else(|| server.and_then(|s| s.bind.clone()))
                .unwrap_or_else(|| DEFAULT_BIND.to_string()),
        };

        let port = match cli.port {
            Some(p) => p,
            None => match env_var(ENV_PORT) {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("{ENV_PORT} is not a valid port: {raw:?}"))?,
                None => server.and_then(|s| s.port).unwrap_or(DEFAULT_PORT),
            },
        };

        let api_key = env_var(ENV_API_KEY)
            .or_else(|| generation.and_then(|g| g.api_key.clone()))
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from);

        let model = env_var(ENV_MODEL)
            .or_else(|| generation.and_then(|g| g.model.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = env_var(ENV_BASE_URL)
            .or_else(|| generation.and_then(|g| g.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match env_var(ENV_TIMEOUT) {
            Some(raw) => Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("{ENV_TIMEOUT} is not a whole number of seconds: {raw:?}"))?,
            ),
            None => generation
                .and_then(|g| g.timeout_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        Ok(Self {
            bind,
            port,
            gemini: GeminiConfig {
                api_key,
                model,
                base_url,
                timeout,
            },
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
