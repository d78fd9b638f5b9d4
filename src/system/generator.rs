// src/system/generator.rs

use crate::models::ResolvedConfig;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::ALIAS_FILE_EXTENSION;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("The resolved alias has no 'name' value.")]
    MissingName,
    #[error("The resolved alias has no 'environment' value.")]
    MissingEnvironment,
    #[error("Could not create alias directory '{0}': {1}")]
    DirectoryCreation(PathBuf, std::io::Error),
    #[error("Could not write alias file '{0}': {1}")]
    FileWrite(PathBuf, std::io::Error),
    #[error("Could not serialize the alias definition: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("Existing alias file '{path}' could not be parsed: {source}")]
    ExistingParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Writes a resolved alias definition to persistent storage.
pub trait AliasGenerator {
    /// Persists `config` under `directory` and returns the path of the
    /// file that was written.
    fn generate(&self, config: &ResolvedConfig, directory: &Path)
    -> Result<PathBuf, GeneratorError>;
}

/// The default generator. Produces one `<name>.yml` file per site, keyed by
/// environment, so repeated runs for other environments of the same site can
/// live alongside each other in separate files per target directory.
pub struct YamlAliasGenerator;

impl YamlAliasGenerator {
    /// Builds the per-environment payload. The `name`, `environment` and
    /// `directory` values address the file itself and are not repeated inside
    /// it; empty values are omitted entirely.
    fn payload(config: &ResolvedConfig) -> Mapping {
        let mut map = Mapping::new();
        for (key, value) in config.iter() {
            if value.is_empty() {
                continue;
            }
            let key = match key {
                "name" | "environment" | "directory" => continue,
                "drupal-root" => "root",
                "site-uri" => "uri",
                other => other,
            };
            map.insert(
                Value::String(key.to_string()),
                Value::String(value.to_string()),
            );
        }
        map
    }
}

impl AliasGenerator for YamlAliasGenerator {
    fn generate(
        &self,
        config: &ResolvedConfig,
        directory: &Path,
    ) -> Result<PathBuf, GeneratorError> {
        let name = config.get("name").ok_or(GeneratorError::MissingName)?;
        let environment = config
            .get("environment")
            .ok_or(GeneratorError::MissingEnvironment)?;

        fs::create_dir_all(directory)
            .map_err(|e| GeneratorError::DirectoryCreation(directory.to_path_buf(), e))?;

        let file_path = directory.join(format!("{name}.{ALIAS_FILE_EXTENSION}"));

        // Merge into an existing file so other environments of the same
        // site survive a regeneration. A file we cannot parse is an error,
        // not a blank slate: overwriting it would destroy those environments.
        let mut document: Mapping = match fs::read_to_string(&file_path) {
            Ok(existing) if existing.trim().is_empty() => Mapping::new(),
            Ok(existing) => serde_yaml::from_str(&existing).map_err(|source| {
                GeneratorError::ExistingParse {
                    path: file_path.clone(),
                    source,
                }
            })?,
            Err(_) => Mapping::new(),
        };
        document.insert(
            Value::String(environment.to_string()),
            Value::Mapping(Self::payload(config)),
        );

        let rendered = serde_yaml::to_string(&document)?;
        fs::write(&file_path, rendered)
            .map_err(|e| GeneratorError::FileWrite(file_path.clone(), e))?;

        Ok(file_path)
    }
}

// MARK: --- UNIT TESTS ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_config() -> ResolvedConfig {
        let mut config = ResolvedConfig::new();
        config.insert("type", "ssh");
        config.insert("name", "mysite");
        config.insert("environment", "develop");
        config.insert("drupal-root", "/var/www/mysite");
        config.insert("server-root", "/var/www/mysite/web");
        config.insert("site-uri", "develop");
        config.insert("host-name", "example.com");
        config.insert("host-port", "22");
        config.insert("user", "deploy");
        config.insert("extra-options", "");
        config
    }

    #[test]
    fn writes_file_named_after_the_site() {
        let dir = tempdir().unwrap();
        let path = YamlAliasGenerator
            .generate(&sample_config(), dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("mysite.yml"));
        assert!(path.exists());
    }

    #[test]
    fn payload_is_keyed_by_environment_with_renamed_keys() {
        let dir = tempdir().unwrap();
        let path = YamlAliasGenerator
            .generate(&sample_config(), dir.path())
            .unwrap();
        let text = fs::read_to_string(path).unwrap();
        let doc: Mapping = serde_yaml::from_str(&text).unwrap();

        let payload = doc
            .get(Value::String("develop".into()))
            .and_then(Value::as_mapping)
            .unwrap();
        assert_eq!(
            payload.get(Value::String("root".into())),
            Some(&Value::String("/var/www/mysite".into()))
        );
        assert_eq!(
            payload.get(Value::String("uri".into())),
            Some(&Value::String("develop".into()))
        );
        assert!(payload.get(Value::String("drupal-root".into())).is_none());
        assert!(payload.get(Value::String("name".into())).is_none());
        // Empty values are dropped from the payload.
        assert!(payload.get(Value::String("extra-options".into())).is_none());
    }

    #[test]
    fn second_environment_merges_into_the_same_file() {
        let dir = tempdir().unwrap();
        YamlAliasGenerator
            .generate(&sample_config(), dir.path())
            .unwrap();

        let mut other = sample_config();
        other.insert("environment", "stage");
        let path = YamlAliasGenerator.generate(&other, dir.path()).unwrap();

        let text = fs::read_to_string(path).unwrap();
        let doc: Mapping = serde_yaml::from_str(&text).unwrap();
        assert!(doc.contains_key(Value::String("develop".into())));
        assert!(doc.contains_key(Value::String("stage".into())));
    }

    #[test]
    fn corrupt_existing_file_is_an_error_and_stays_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mysite.yml");
        fs::write(&path, "develop: [unclosed").unwrap();

        let result = YamlAliasGenerator.generate(&sample_config(), dir.path());
        assert!(matches!(result, Err(GeneratorError::ExistingParse { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "develop: [unclosed");
    }

    #[test]
    fn empty_existing_file_is_treated_as_a_fresh_document() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("mysite.yml"), "\n").unwrap();

        let path = YamlAliasGenerator
            .generate(&sample_config(), dir.path())
            .unwrap();
        let doc: Mapping = serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert!(doc.contains_key(Value::String("develop".into())));
    }

    #[test]
    fn missing_name_is_rejected() {
        let dir = tempdir().unwrap();
        let mut config = ResolvedConfig::new();
        config.insert("environment", "develop");
        let result = YamlAliasGenerator.generate(&config, dir.path());
        assert!(matches!(result, Err(GeneratorError::MissingName)));
    }
}
