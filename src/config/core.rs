use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};

use super::ForEachConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Repository-level config file, relative to the working directory
pub const CONFIG_FILE: &str = "fanout.toml";

/// Prefix for environment overrides (`FANOUT_MAX_WORKERS=8`)
pub const ENV_PREFIX: &str = "FANOUT_";

impl ForEachConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        Self::figment(custom_config)
            .extract()
            .context("failed to load fanout configuration")
    }

    /// The layered figment behind [`load_with_custom_config`](Self::load_with_custom_config).
    pub fn figment(custom_config: Option<&str>) -> Figment {
        tracing::trace!("CONFIG LOAD: custom config = {:?}", custom_config);
        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        figment = match custom_config {
            Some(custom_path) => figment.merge(Toml::file(custom_path)),
            None => figment.merge(Toml::file(CONFIG_FILE)),
        };

        // Environment variables always have highest priority
        figment.merge(Env::prefixed(ENV_PREFIX))
    }
}
