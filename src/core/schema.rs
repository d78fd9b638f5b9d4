// src/core/schema.rs

use crate::models::{
    Choices, DefaultValue, ParamKind, ParameterSpec, ResolvedConfig, Settings, Stage, StageSet,
};
use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, HashSet};

/// Fields requested only when the transport reaches a remote surface.
const REMOTE: StageSet = StageSet::Only(&[Stage::Ssh, Stage::Container]);

/// The ordered parameter schema driving the resolution engine.
///
/// Order matters: derived defaults may read fields resolved earlier in the
/// sequence. The discriminant field is always resolved first regardless of
/// its position, because every gating decision depends on it.
#[derive(Debug, Clone)]
pub struct Schema {
    specs: Vec<ParameterSpec>,
    discriminant: &'static str,
}

impl Schema {
    /// Builds a schema after validating its structural invariants: unique
    /// names, one-hop aliases without defaults or choices of their own, and
    /// a discriminant that is an always-active fixed choice.
    ///
    /// A violation here is a programming error in the schema definition,
    /// not something a user can recover from.
    pub fn new(specs: Vec<ParameterSpec>, discriminant: &'static str) -> Result<Self> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert(spec.name) {
                return Err(schema_bug(format!(
                    "parameter '{}' is defined twice",
                    spec.name
                )));
            }
        }

        for spec in &specs {
            let Some(canonical) = spec.alias_of else {
                continue;
            };
            let target = specs
                .iter()
                .find(|s| s.name == canonical)
                .ok_or_else(|| {
                    schema_bug(format!(
                        "alias '{}' points to undefined parameter '{}'",
                        spec.name, canonical
                    ))
                })?;
            if target.alias_of.is_some() {
                return Err(schema_bug(format!(
                    "alias '{}' points to alias '{}'; alias chains longer than one hop are not permitted",
                    spec.name, canonical
                )));
            }
            if spec.default.is_some() || spec.choices.is_some() {
                return Err(schema_bug(format!(
                    "alias '{}' must not define a default or choices of its own",
                    spec.name
                )));
            }
        }

        let discriminant_spec = specs
            .iter()
            .find(|s| s.name == discriminant)
            .ok_or_else(|| schema_bug(format!("discriminant '{discriminant}' is not defined")))?;
        if discriminant_spec.alias_of.is_some() || discriminant_spec.stages != StageSet::Always {
            return Err(schema_bug(format!(
                "discriminant '{discriminant}' must be a canonical, always-active field"
            )));
        }
        match &discriminant_spec.choices {
            Some(Choices::Fixed(items)) if !items.is_empty() => {}
            _ => {
                return Err(schema_bug(format!(
                    "discriminant '{discriminant}' must offer a fixed, non-empty choice list"
                )));
            }
        }

        Ok(Self {
            specs,
            discriminant,
        })
    }

    /// The final site-alias schema. Historical field names from earlier
    /// revisions (`composer-root`, `host`, `port`) are modeled as one-hop
    /// aliases of their canonical successors.
    pub fn site_alias(settings: &Settings) -> Result<Self> {
        let types: Vec<String> = Stage::ALL.iter().map(|s| s.as_str().to_string()).collect();

        let mut extra_sets = BTreeMap::new();
        for stage in Stage::ALL {
            extra_sets.insert(*stage, settings.extra_options.for_stage(*stage).to_vec());
        }

        let directories: Vec<String> = settings
            .alias_directories
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        let mut name_spec = ParameterSpec::new(
            "name",
            "Site name",
            ParamKind::Plain,
            StageSet::Always,
        );
        if !settings.sites.is_empty() {
            // Known prior sites become a selection list defaulting to the
            // first entry instead of free-text entry.
            name_spec = name_spec.with_choices(Choices::Fixed(settings.sites.clone()));
        }

        let specs = vec![
            ParameterSpec::new("type", "Site type", ParamKind::Plain, StageSet::Always)
                .with_choices(Choices::Fixed(types)),
            name_spec,
            ParameterSpec::new("environment", "Environment", ParamKind::Plain, StageSet::Always)
                .with_static_default(settings.environment.clone()),
            ParameterSpec::new("drupal-root", "Drupal root", ParamKind::Plain, StageSet::Always)
                .with_default(DefaultValue::Derived(default_drupal_root)),
            ParameterSpec::new("server-root", "Server root", ParamKind::Derived, StageSet::Always)
                .with_default(DefaultValue::Derived(default_server_root)),
            ParameterSpec::new("site-uri", "Site URI", ParamKind::Derived, StageSet::Always)
                .with_default(DefaultValue::Derived(default_site_uri)),
            ParameterSpec::new("host-name", "Remote host name", ParamKind::Derived, REMOTE)
                .with_static_default("example.com"),
            ParameterSpec::new("host-port", "Remote host port", ParamKind::Derived, REMOTE),
            ParameterSpec::new("user", "Remote user", ParamKind::Derived, REMOTE),
            ParameterSpec::new(
                "extra-options",
                "Extra connection options",
                ParamKind::Plain,
                REMOTE,
            )
            .with_choices(Choices::ByStage {
                sentinel: settings.extra_options.none.clone(),
                sets: extra_sets,
            }),
            ParameterSpec::new(
                "account-name",
                "Administrator account name",
                ParamKind::Plain,
                StageSet::Always,
            )
            .with_static_default("admin"),
            ParameterSpec::new(
                "account-pass",
                "Administrator account password",
                ParamKind::Secret,
                StageSet::Always,
            ),
            ParameterSpec::new(
                "account-mail",
                "Administrator account email",
                ParamKind::Plain,
                StageSet::Always,
            )
            .with_static_default("email@example.com"),
            ParameterSpec::new("repo-type", "Repository type", ParamKind::Plain, StageSet::Always)
                .with_static_default("git"),
            ParameterSpec::new("repo-url", "Repository URL", ParamKind::Plain, StageSet::Always)
                .with_static_default("git@github.com:user/repo.git"),
            ParameterSpec::new(
                "repo-branch",
                "Repository branch",
                ParamKind::Plain,
                StageSet::Always,
            )
            .with_static_default("master"),
            ParameterSpec::new(
                "directory",
                "Directory to store the site alias",
                ParamKind::Plain,
                StageSet::Always,
            )
            .with_choices(Choices::Fixed(directories)),
            // Backward-compatible names from earlier schema revisions.
            ParameterSpec::alias("composer-root", "drupal-root"),
            ParameterSpec::alias("host", "host-name"),
            ParameterSpec::alias("port", "host-port"),
        ];

        Self::new(specs, "type")
    }

    pub fn discriminant_name(&self) -> &'static str {
        self.discriminant
    }

    pub fn discriminant_spec(&self) -> Result<&ParameterSpec> {
        self.spec(self.discriminant)
    }

    /// Every spec in resolution order, alias entries included.
    pub fn specs(&self) -> &[ParameterSpec] {
        &self.specs
    }

    /// Looks up a spec by name. An unknown name is a schema bug.
    pub fn spec(&self, name: &str) -> Result<&ParameterSpec> {
        self.specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| schema_bug(format!("unknown parameter '{name}'")))
    }

    /// Follows `alias_of` exactly one hop.
    pub fn canonical_name(&self, name: &str) -> Result<&'static str> {
        let spec = self.spec(name)?;
        Ok(spec.alias_of.unwrap_or(spec.name))
    }

    /// Deprecated alias entries forwarding to `canonical`.
    pub fn aliases_of<'s>(&'s self, canonical: &'s str) -> impl Iterator<Item = &'s ParameterSpec> {
        self.specs
            .iter()
            .filter(move |s| s.alias_of == Some(canonical))
    }

    /// The canonical fields active for `stage`, in resolution order.
    pub fn fields_for_stage(&self, stage: Stage) -> impl Iterator<Item = &ParameterSpec> {
        self.specs
            .iter()
            .filter(move |s| s.alias_of.is_none() && s.stages.is_active(stage))
    }

    /// Computes the default for a field against the partially resolved
    /// record. Returns `None` for fields with no sensible default.
    pub fn default_for(&self, name: &str, record: &ResolvedConfig) -> Result<Option<String>> {
        let spec = self.spec(name)?;
        Ok(spec.default.as_ref().map(|default| match default {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Derived(compute) => compute(record),
        }))
    }
}

fn schema_bug(detail: String) -> anyhow::Error {
    anyhow!("Schema definition error: {detail}.")
}

// --- Derived defaults ---

fn default_drupal_root(record: &ResolvedConfig) -> String {
    format!("/var/www/{}", record.get("name").unwrap_or_default())
}

fn default_server_root(record: &ResolvedConfig) -> String {
    match record.get("drupal-root") {
        Some(root) if !root.is_empty() => format!("{root}/web"),
        _ => String::new(),
    }
}

/// The URI token is the part of the environment after its first dot
/// (`example.prod` suggests `prod`); a plain environment falls back to
/// `default`.
fn default_site_uri(record: &ResolvedConfig) -> String {
    record
        .get("environment")
        .and_then(|environment| environment.split('.').nth(1))
        .unwrap_or("default")
        .to_string()
}

// MARK: --- UNIT TESTS ---
