// src/core/settings.rs

use crate::{
    constants::{SETTINGS_FILENAME, SITES_DIRNAME},
    core::paths::{self, PathError},
    models::Settings,
};
use std::fs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    ConfigDir(#[from] PathError),
    #[error("Could not read or write the settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not serialize default settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads `sitealias.toml` from the configuration directory, writing a
/// default file on first run. An empty alias-directory list falls back to
/// the `sites` directory next to the settings file.
pub fn load_settings() -> Result<Settings, SettingsError> {
    let config_dir = paths::get_config_dir()?;
    let settings_path = config_dir.join(SETTINGS_FILENAME);

    let mut settings = if settings_path.exists() {
        let content = fs::read_to_string(&settings_path)?;
        settings_from_str(&content)?
    } else {
        let defaults = Settings::default();
        let toml_string = toml::to_string_pretty(&defaults)?;
        fs::write(&settings_path, toml_string)?;
        defaults
    };

    if settings.alias_directories.is_empty() {
        settings.alias_directories.push(config_dir.join(SITES_DIRNAME));
    }

    log::debug!(
        "Settings loaded: {} known site(s), {} alias director(ies).",
        settings.sites.len(),
        settings.alias_directories.len()
    );
    Ok(settings)
}

/// Parses settings from TOML. Missing sections fall back to their defaults.
pub fn settings_from_str(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}

// MARK: --- UNIT TESTS ---
