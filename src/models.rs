// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

// --- STAGES ---

/// The transport type of a site alias. This is the discriminant field: its
/// value decides which stage-gated parameters are active for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Local,
    Ssh,
    Container,
}

impl Stage {
    /// Every known stage, in the order offered to the user. The first entry
    /// is the choice default.
    pub const ALL: &'static [Self] = &[Self::Local, Self::Ssh, Self::Container];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ssh => "ssh",
            Self::Container => "container",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local" => Some(Self::Local),
            "ssh" => Some(Self::Ssh),
            "container" => Some(Self::Container),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The stage gate: decides whether a parameter participates in a run.
///
/// Membership is declared per field, not per stage, so a field requested
/// under both `ssh` and `container` lists both stages explicitly instead of
/// relying on a single enum check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSet {
    /// Active for every discriminant value.
    Always,
    /// Active only when the discriminant is one of the listed stages.
    Only(&'static [Stage]),
}

impl StageSet {
    /// Re-evaluated per field by the resolution engine; never cached globally.
    pub fn is_active(&self, discriminant: Stage) -> bool {
        match self {
            Self::Always => true,
            Self::Only(stages) => stages.contains(&discriminant),
        }
    }
}

// --- PARAMETER SCHEMA MODELS ---

/// How a parameter is asked for, and what an empty answer means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Regular question. An empty answer falls back to the prompt default;
    /// with no default the prompt re-asks.
    Plain,
    /// Asked through hidden input. An empty answer is accepted.
    Secret,
    /// The value is usually derived from earlier answers; the prompt merely
    /// confirms it. An empty answer is a deliberate empty value.
    Derived,
}

/// The default for a parameter, used as the prompt default and as the
/// non-interactive value.
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Static(String),
    /// Computed from the in-progress record, so it can read fields resolved
    /// earlier in schema order (e.g. server-root reads drupal-root).
    Derived(fn(&ResolvedConfig) -> String),
}

/// A closed set of candidate values offered as a selection list.
#[derive(Debug, Clone)]
pub enum Choices {
    /// The same list regardless of discriminant. Labels are the values.
    Fixed(Vec<String>),
    /// A per-stage option table. Choosing the sentinel label resolves the
    /// field to the empty string; an empty set for the active stage skips
    /// the prompt entirely.
    ByStage {
        sentinel: String,
        sets: BTreeMap<Stage, Vec<ExtraOption>>,
    },
}

/// Static description of one recognized field of the alias schema.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Canonical kebab-case name, also the CLI flag name.
    pub name: &'static str,
    /// The question shown when the field has to be prompted.
    pub prompt: &'static str,
    pub kind: ParamKind,
    pub default: Option<DefaultValue>,
    pub choices: Option<Choices>,
    /// Set only on deprecated alias entries: the canonical field this name
    /// forwards to, one hop at most. Alias entries never carry a default or
    /// choices of their own.
    pub alias_of: Option<&'static str>,
    pub stages: StageSet,
}

impl ParameterSpec {
    pub fn new(
        name: &'static str,
        prompt: &'static str,
        kind: ParamKind,
        stages: StageSet,
    ) -> Self {
        Self {
            name,
            prompt,
            kind,
            default: None,
            choices: None,
            alias_of: None,
            stages,
        }
    }

    /// A deprecated name that forwards to `canonical`.
    pub fn alias(name: &'static str, canonical: &'static str) -> Self {
        Self {
            name,
            prompt: "",
            kind: ParamKind::Plain,
            default: None,
            choices: None,
            alias_of: Some(canonical),
            stages: StageSet::Always,
        }
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_static_default(self, value: impl Into<String>) -> Self {
        self.with_default(DefaultValue::Static(value.into()))
    }

    pub fn with_choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }
}

// --- RESOLUTION INPUT / OUTPUT ---

/// Explicit values supplied by the caller (CLI flags). An absent or empty
/// entry means "not yet known". The resolution engine never mutates the bag.
#[derive(Debug, Clone, Default)]
pub struct InputBag {
    values: HashMap<String, String>,
}

impl InputBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the explicit value for `name`, treating an empty string the
    /// same as an absent entry.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// The fully resolved configuration record: canonical name to final value,
/// in schema order. Created once per invocation, handed to the generator,
/// then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    entries: Vec<(String, String)>,
}

impl ResolvedConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Inserts or replaces a value, preserving first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// --- COMMAND CHAIN MODELS ---

/// The value of one option of a chain item. Falsy values (an unset flag or
/// an empty string) are dropped before the sub-command is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Flag(bool),
    Value(String),
}

impl OptionValue {
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Flag(set) => !set,
            Self::Value(value) => value.is_empty(),
        }
    }
}

/// One queued sub-command invocation. Owned exclusively by the queue and
/// removed from it only after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainItem {
    pub command: String,
    /// Ordered: positional arguments are handed over in declaration order.
    pub arguments: Vec<(String, String)>,
    pub options: Vec<(String, OptionValue)>,
}

/// The chain executor's only externally observable outcome besides the side
/// effects of the dispatched sub-commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainResult {
    pub exit_code: i32,
}

impl ChainResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

// --- `sitealias.toml` MODELS (What is read from the configuration file) ---

/// One entry of the extra-options table: a human-readable label offered in
/// the selection list, and the value it resolves to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExtraOption {
    pub label: String,
    pub value: String,
}

/// The per-transport extra-options table. The sentinel label (`none`) is
/// configuration data: choosing it resolves the field to an empty string.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ExtraOptionsConfig {
    #[serde(default = "default_none_sentinel")]
    pub none: String,
    #[serde(default)]
    pub local: Vec<ExtraOption>,
    #[serde(default)]
    pub ssh: Vec<ExtraOption>,
    #[serde(default)]
    pub container: Vec<ExtraOption>,
}

impl ExtraOptionsConfig {
    pub fn for_stage(&self, stage: Stage) -> &[ExtraOption] {
        match stage {
            Stage::Local => &self.local,
            Stage::Ssh => &self.ssh,
            Stage::Container => &self.container,
        }
    }
}

impl Default for ExtraOptionsConfig {
    fn default() -> Self {
        Self {
            none: default_none_sentinel(),
            local: Vec::new(),
            ssh: vec![ExtraOption {
                label: "vagrant".to_string(),
                value: "-o PasswordAuthentication=no -i ~/.vagrant.d/insecure_private_key"
                    .to_string(),
            }],
            container: vec![ExtraOption {
                label: "drupal4docker".to_string(),
                value: "docker-compose exec --user=82 php".to_string(),
            }],
        }
    }
}

fn default_none_sentinel() -> String {
    "none".to_string()
}

/// Represents the deserialized structure of a `sitealias.toml` file.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Default environment offered when generating an alias.
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Known site names, offered as a selection list for the `name` field.
    #[serde(default)]
    pub sites: Vec<String>,
    /// Directories where generated alias records may be written. The first
    /// entry is the choice default.
    #[serde(default)]
    pub alias_directories: Vec<PathBuf>,
    #[serde(default)]
    pub extra_options: ExtraOptionsConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            sites: Vec::new(),
            alias_directories: Vec::new(),
            extra_options: ExtraOptionsConfig::default(),
        }
    }
}

fn default_environment() -> String {
    "develop".to_string()
}

// MARK: --- UNIT TESTS ---
