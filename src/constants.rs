// src/constants.rs

/// The name of the settings file (in ~/.config/sitealias/).
pub const SETTINGS_FILENAME: &str = "sitealias.toml";

/// The default directory for generated alias records (in ~/.config/sitealias/).
pub const SITES_DIRNAME: &str = "sites";

/// The marker file identifying a project root when walking up from the
/// current directory.
pub const PROJECT_MARKER_FILENAME: &str = "composer.json";

/// The project-relative directory alias records go to when `--site` is set.
pub const PROJECT_ALIAS_DIRNAME: &str = "console";

/// The extension of generated alias record files.
pub const ALIAS_FILE_EXTENSION: &str = "yml";
