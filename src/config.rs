//! Input configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::input::{ButtonPolicy, ValidKeySet};

/// Recognized key configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Start from the built-in key table
    pub include_defaults: bool,
    /// Additional identifiers to recognize, matched exactly
    pub extra: Vec<String>,
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            include_defaults: true,
            extra: Vec::new(),
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Treatment of pointer button codes outside Left/Middle/Right
    pub button_policy: ButtonPolicy,
    pub keys: KeysConfig,
}

impl InputConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources are layered in the following order:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{profile}.toml (profile-specific overrides)
    /// 3. Environment variables with prefix INPUT_ (e.g., INPUT_BUTTON_POLICY=permissive)
    ///
    /// Every file is optional; missing values fall back to [`Default`].
    pub fn load(profile: &str) -> Result<Self, InputError> {
        Self::load_with_env(profile, Self::environment())
    }

    fn load_with_env(profile: &str, environment: Environment) -> Result<Self, InputError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", profile)).required(false))
            .add_source(environment)
            .set_override("profile", profile)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// INPUT_-prefixed variables; __ separates nested fields (e.g., INPUT_KEYS__EXTRA=Home,End)
    fn environment() -> Environment {
        Environment::with_prefix("INPUT")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("keys.extra")
            .try_parsing(true)
    }

    /// Loads configuration using the INPUT_PROFILE environment variable,
    /// defaulting to "debug" if not set
    pub fn load_from_env() -> Result<Self, InputError> {
        let profile = std::env::var("INPUT_PROFILE").unwrap_or_else(|_| "debug".to_string());
        Self::load(&profile)
    }

    /// Builds the recognized key set described by this configuration
    pub fn key_set(&self) -> ValidKeySet {
        let base = if self.keys.include_defaults {
            ValidKeySet::default()
        } else {
            ValidKeySet::empty()
        };
        base.with(self.keys.extra.iter().cloned())
    }
}
