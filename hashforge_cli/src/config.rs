use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use hashforge_core::HashConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys use `__`, e.g. `HASHFORGE_HASHING__CHUNK_TARGET`
pub const ENV_PREFIX: &str = "HASHFORGE_";

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub hashing: HashConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// `text`, `json` or `csv`
    pub format: String,
    pub color_enabled: bool,
    pub progress_enabled: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            color_enabled: true,
            progress_enabled: true,
        }
    }
}

/// Configuration manager that handles XDG-compliant paths and layered configuration
pub struct ConfigManager {
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Create a new ConfigManager with default XDG-compliant paths
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a ConfigManager with a specific path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn default_config_path() -> PathBuf {
        #[cfg(not(target_os = "windows"))]
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return PathBuf::from(xdg_config).join("hashforge/config.toml");
        }

        #[cfg(target_os = "linux")]
        {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config/hashforge/config.toml")
        }

        #[cfg(not(target_os = "linux"))]
        {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("hashforge")
                .join("config.toml")
        }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if self.config_path.exists() {
            figment = figment.merge(Toml::file(&self.config_path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment.extract().context("Failed to load configuration")?;
        config
            .hashing
            .validate()
            .with_context(|| format!("Invalid configuration in {}", self.config_path.display()))?;
        Ok(config)
    }

    /// Effective configuration rendered as TOML
    pub fn show(&self) -> Result<String> {
        let config = self.load()?;
        toml::to_string_pretty(&config).context("Failed to render configuration")
    }

    /// Write the default configuration file
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(&self, force: bool) -> Result<&Path> {
        if self.config_path.exists() && !force {
            anyhow::bail!(
                "Configuration file already exists: {} (use --force to overwrite)",
                self.config_path.display()
            );
        }

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(&AppConfig::default())?;
        fs::write(&self.config_path, contents)
            .with_context(|| format!("Failed to write {}", self.config_path.display()))?;
        log::debug!("Wrote default configuration to {}", self.config_path.display());

        Ok(&self.config_path)
    }
}
