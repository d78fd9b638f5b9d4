// src/core/resolver.rs

use crate::{
    core::{prompt::Prompt, schema::Schema},
    models::{Choices, InputBag, ParamKind, ParameterSpec, ResolvedConfig, Stage},
};
use anyhow::{Result, anyhow};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Missing required value for '--{0}' and interactive input is disabled.")]
    MissingParameter(String),
    #[error("Invalid value '{value}' for '--{field}'. Expected one of: {expected}.")]
    InvalidChoice {
        field: String,
        value: String,
        expected: String,
    },
}

/// The resolution engine: turns {explicit flag, deprecated alias, computed
/// default, user prompt} into a fully resolved configuration record under
/// stage-conditional rules.
///
/// Resolution is strictly sequential in schema order, because later derived
/// defaults may read earlier answers from the in-progress record. The
/// caller's input bag is never mutated.
#[derive(Debug)]
pub struct Resolver<'a> {
    schema: &'a Schema,
    interactive: bool,
}

impl<'a> Resolver<'a> {
    pub fn new(schema: &'a Schema, interactive: bool) -> Self {
        Self {
            schema,
            interactive,
        }
    }

    pub fn resolve(&self, input: &InputBag, io: &mut dyn Prompt) -> Result<ResolvedConfig> {
        let mut record = ResolvedConfig::new();

        // The discriminant gates every other field, so it is always settled
        // first, via a fixed enumerated choice when not supplied.
        let discriminant = self.resolve_discriminant(input, io, &mut record)?;
        log::debug!(
            "Discriminant '{}' resolved to '{}'",
            self.schema.discriminant_name(),
            discriminant
        );

        for spec in self.schema.specs() {
            if spec.alias_of.is_some() || spec.name == self.schema.discriminant_name() {
                continue;
            }
            if !spec.stages.is_active(discriminant) {
                log::debug!("Skipping '{}': inactive for '{}'.", spec.name, discriminant);
                continue;
            }
            let value = self.resolve_field(spec, input, &record, io, discriminant)?;
            record.insert(spec.name, value);
        }

        Ok(record)
    }

    fn resolve_discriminant(
        &self,
        input: &InputBag,
        io: &mut dyn Prompt,
        record: &mut ResolvedConfig,
    ) -> Result<Stage> {
        let spec = self.schema.discriminant_spec()?;
        let items = match &spec.choices {
            Some(Choices::Fixed(items)) if !items.is_empty() => items,
            _ => {
                return Err(anyhow!(
                    "Schema definition error: discriminant '{}' lost its choice list.",
                    spec.name
                ));
            }
        };

        let value = match self.explicit_value(spec, input) {
            Some(explicit) => explicit.to_string(),
            None if self.interactive => io.choice(spec.prompt, items, 0)?,
            None => items.first().cloned().unwrap_or_default(),
        };

        let stage = Stage::parse(&value).ok_or_else(|| ResolveError::InvalidChoice {
            field: spec.name.to_string(),
            value: value.clone(),
            expected: items.join(", "),
        })?;
        record.insert(spec.name, value);
        Ok(stage)
    }

    /// The explicit value for a field: its own flag first, then any
    /// deprecated alias pointing at it (one hop only).
    fn explicit_value<'b>(&self, spec: &ParameterSpec, input: &'b InputBag) -> Option<&'b str> {
        if let Some(value) = input.get(spec.name) {
            return Some(value);
        }
        self.schema
            .aliases_of(spec.name)
            .find_map(|alias| input.get(alias.name))
    }

    fn resolve_field(
        &self,
        spec: &ParameterSpec,
        input: &InputBag,
        record: &ResolvedConfig,
        io: &mut dyn Prompt,
        discriminant: Stage,
    ) -> Result<String> {
        // Explicit input always wins, verbatim, over defaults and prompting.
        if let Some(explicit) = self.explicit_value(spec, input) {
            log::trace!("'{}' taken from explicit input.", spec.name);
            return Ok(explicit.to_string());
        }

        let default = self.schema.default_for(spec.name, record)?;

        if let Some(choices) = &spec.choices {
            return self.resolve_choice(spec, choices, default, io, discriminant);
        }

        if !self.interactive {
            return match default {
                Some(value) => Ok(value),
                // Ask-empty fields are genuinely optional: their value may
                // be deliberately empty, so silence is an answer.
                None if spec.kind == ParamKind::Derived => Ok(String::new()),
                None => Err(ResolveError::MissingParameter(spec.name.to_string()).into()),
            };
        }

        match spec.kind {
            ParamKind::Secret => io.ask_secret(spec.prompt),
            ParamKind::Derived => io.ask_empty(spec.prompt, default.as_deref()),
            ParamKind::Plain => io.ask(spec.prompt, default.as_deref()),
        }
    }

    fn resolve_choice(
        &self,
        spec: &ParameterSpec,
        choices: &Choices,
        default: Option<String>,
        io: &mut dyn Prompt,
        discriminant: Stage,
    ) -> Result<String> {
        match choices {
            Choices::Fixed(items) => {
                if items.is_empty() {
                    // Nothing to offer: the field resolves silently.
                    return Ok(default.unwrap_or_default());
                }
                if !self.interactive {
                    return Ok(default
                        .or_else(|| items.first().cloned())
                        .unwrap_or_default());
                }
                io.choice(spec.prompt, items, 0)
            }
            Choices::ByStage { sentinel, sets } => {
                let set = sets.get(&discriminant).map(Vec::as_slice).unwrap_or(&[]);
                if set.is_empty() {
                    // No options for this transport: no prompt, no value.
                    return Ok(default.unwrap_or_default());
                }
                if !self.interactive {
                    // The sentinel heads the list, so it is the default.
                    return Ok(String::new());
                }
                let mut items = vec![sentinel.clone()];
                items.extend(set.iter().map(|option| option.label.clone()));
                let picked = io.choice(spec.prompt, &items, 0)?;
                if picked == *sentinel {
                    return Ok(String::new());
                }
                Ok(set
                    .iter()
                    .find(|option| option.label == picked)
                    .map(|option| option.value.clone())
                    .unwrap_or(picked))
            }
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompt;
    use crate::models::{ParameterSpec, Settings, StageSet};
    use std::path::PathBuf;

    fn settings() -> Settings {
        Settings {
            alias_directories: vec![PathBuf::from("/home/user/.config/sitealias/sites")],
            ..Settings::default()
        }
    }

    fn schema() -> Schema {
        Schema::site_alias(&settings()).unwrap()
    }

    fn bag(pairs: &[(&str, &str)]) -> InputBag {
        let mut bag = InputBag::new();
        for (name, value) in pairs {
            bag.set(*name, *value);
        }
        bag
    }

    fn full_local_bag() -> InputBag {
        bag(&[
            ("type", "local"),
            ("name", "blog"),
            ("environment", "blog.prod"),
            ("drupal-root", "/srv/blog"),
            ("server-root", "/srv/blog/web"),
            ("site-uri", "prod"),
            ("account-name", "admin"),
            ("account-pass", "s3cret"),
            ("account-mail", "admin@blog.example"),
            ("repo-type", "git"),
            ("repo-url", "git@github.com:blog/blog.git"),
            ("repo-branch", "main"),
            ("directory", "/srv/aliases"),
        ])
    }

    #[test]
    fn test_explicit_input_wins_verbatim_without_prompting() {
        let schema = schema();
        let mut io = ScriptedPrompt::new();
        let record = Resolver::new(&schema, true)
            .resolve(&full_local_bag(), &mut io)
            .unwrap();

        assert!(io.asked.is_empty(), "unexpected prompts: {:?}", io.asked);
        assert_eq!(record.get("type"), Some("local"));
        assert_eq!(record.get("repo-branch"), Some("main"));
        assert_eq!(record.get("directory"), Some("/srv/aliases"));
    }

    #[test]
    fn test_local_discriminant_skips_remote_fields_entirely() {
        let schema = schema();
        let mut io = ScriptedPrompt::new().answer("blog");
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "local")]), &mut io)
            .unwrap();

        for name in ["host-name", "host-port", "user", "extra-options"] {
            assert!(!record.contains(name), "'{name}' should be absent");
        }
        assert!(!io.was_asked("Remote"));
        assert!(!io.was_asked("Extra connection options"));
    }

    #[test]
    fn test_ssh_discriminant_requests_remote_fields() {
        let schema = schema();
        // name, then accept every offered default (extra-options sentinel
        // included).
        let mut io = ScriptedPrompt::new().answer("blog");
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "ssh")]), &mut io)
            .unwrap();

        assert!(record.contains("host-name"));
        assert!(record.contains("host-port"));
        assert!(record.contains("user"));
        assert!(io.was_asked("Remote host name"));
        assert!(io.was_asked("Remote user"));
        assert_eq!(record.get("host-name"), Some("example.com"));
        // The sentinel heads the extra-options list, so accepting the
        // default resolves to an empty value.
        assert_eq!(record.get("extra-options"), Some(""));
    }

    #[test]
    fn test_stage_gate_skips_a_local_only_field_under_ssh() {
        // The shipped schema has no local-only field; the gate still has to
        // support one per field, so exercise it with a synthetic schema.
        let schema = Schema::new(
            vec![
                ParameterSpec::new("type", "Site type", ParamKind::Plain, StageSet::Always)
                    .with_choices(Choices::Fixed(vec![
                        "local".to_string(),
                        "ssh".to_string(),
                    ])),
                ParameterSpec::new(
                    "checkout-dir",
                    "Local checkout directory",
                    ParamKind::Plain,
                    StageSet::Only(&[Stage::Local]),
                )
                .with_static_default("/tmp/checkout"),
                ParameterSpec::new(
                    "user",
                    "Remote user",
                    ParamKind::Derived,
                    StageSet::Only(&[Stage::Ssh, Stage::Container]),
                ),
            ],
            "type",
        )
        .unwrap();

        let mut io = ScriptedPrompt::new();
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "ssh")]), &mut io)
            .unwrap();
        assert!(!record.contains("checkout-dir"));
        assert!(record.contains("user"));
        assert!(!io.was_asked("checkout"));

        let mut io = ScriptedPrompt::new();
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "local")]), &mut io)
            .unwrap();
        assert!(record.contains("checkout-dir"));
        assert!(!record.contains("user"));
    }

    #[test]
    fn test_deprecated_alias_is_adopted_one_hop_and_idempotently() {
        let schema = schema();
        let mut input = full_local_bag();
        input.set("drupal-root", "");
        input.set("composer-root", "/opt/site");

        let first = Resolver::new(&schema, true)
            .resolve(&input, &mut ScriptedPrompt::new())
            .unwrap();
        let second = Resolver::new(&schema, true)
            .resolve(&input, &mut ScriptedPrompt::new())
            .unwrap();

        assert_eq!(first.get("drupal-root"), Some("/opt/site"));
        assert_eq!(first, second);
        // Only the canonical name appears in the output.
        assert!(!first.contains("composer-root"));
    }

    #[test]
    fn test_host_flag_aliases_forward_to_split_fields() {
        let schema = schema();
        let mut input = bag(&[("type", "ssh"), ("name", "blog")]);
        input.set("host", "cms.internal");
        input.set("port", "8022");

        let record = Resolver::new(&schema, true)
            .resolve(&input, &mut ScriptedPrompt::new())
            .unwrap();
        assert_eq!(record.get("host-name"), Some("cms.internal"));
        assert_eq!(record.get("host-port"), Some("8022"));
        assert!(!record.contains("host"));
        assert!(!record.contains("port"));
    }

    #[test]
    fn test_derived_default_reads_in_progress_record() {
        let schema = schema();
        let mut input = full_local_bag();
        input.set("drupal-root", "/srv/site");
        input.set("server-root", "");

        // Accepting the offered default must yield drupal-root + "/web".
        let record = Resolver::new(&schema, true)
            .resolve(&input, &mut ScriptedPrompt::new())
            .unwrap();
        assert_eq!(record.get("server-root"), Some("/srv/site/web"));
    }

    #[test]
    fn test_discriminant_is_resolved_first_via_fixed_choice() {
        let schema = schema();
        let mut io = ScriptedPrompt::new().answer("ssh").answer("blog");
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[]), &mut io)
            .unwrap();

        assert!(
            io.asked.first().is_some_and(|q| q.contains("Site type")),
            "the discriminant must be asked before anything else: {:?}",
            io.asked
        );
        assert_eq!(record.get("type"), Some("ssh"));
        assert!(record.contains("host-name"));
    }

    #[test]
    fn test_invalid_discriminant_value_is_rejected() {
        let schema = schema();
        let err = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "ftp")]), &mut ScriptedPrompt::new())
            .unwrap_err();
        assert!(err.to_string().contains("Invalid value 'ftp'"));
    }

    #[test]
    fn test_non_interactive_resolves_from_defaults_without_prompting() {
        let schema = schema();
        let mut io = ScriptedPrompt::new();
        let record = Resolver::new(&schema, false)
            .resolve(
                &bag(&[("name", "blog"), ("account-pass", "s3cret")]),
                &mut io,
            )
            .unwrap();

        assert!(io.asked.is_empty(), "unexpected prompts: {:?}", io.asked);
        assert_eq!(record.get("type"), Some("local"));
        assert_eq!(record.get("environment"), Some("develop"));
        assert_eq!(record.get("drupal-root"), Some("/var/www/blog"));
        assert_eq!(record.get("account-name"), Some("admin"));
        assert_eq!(
            record.get("directory"),
            Some("/home/user/.config/sitealias/sites")
        );
    }

    #[test]
    fn test_non_interactive_fails_on_missing_required_parameter() {
        let schema = schema();
        let err = Resolver::new(&schema, false)
            .resolve(&bag(&[]), &mut ScriptedPrompt::new())
            .unwrap_err();
        assert!(
            err.to_string().contains("Missing required value for '--name'"),
            "unexpected error: {err}"
        );

        let err = Resolver::new(&schema, false)
            .resolve(&bag(&[("name", "blog")]), &mut ScriptedPrompt::new())
            .unwrap_err();
        assert!(err.to_string().contains("'--account-pass'"));
    }

    #[test]
    fn test_non_interactive_treats_ask_empty_fields_as_optional() {
        let schema = schema();
        let record = Resolver::new(&schema, false)
            .resolve(
                &bag(&[("type", "ssh"), ("name", "blog"), ("account-pass", "x")]),
                &mut ScriptedPrompt::new(),
            )
            .unwrap();
        // No default exists for these, but they are deliberately optional.
        assert_eq!(record.get("host-port"), Some(""));
        assert_eq!(record.get("user"), Some(""));
        assert_eq!(record.get("host-name"), Some("example.com"));
    }

    #[test]
    fn test_extra_options_choice_maps_labels_and_sentinel() {
        let schema = schema();
        let mut input = full_local_bag();
        input.set("type", "ssh");

        // Provide the remote fields so the only open prompt is extra-options.
        input.set("host-name", "cms.internal");
        input.set("host-port", "22");
        input.set("user", "deploy");

        let mut io = ScriptedPrompt::new().answer("vagrant");
        let record = Resolver::new(&schema, true).resolve(&input, &mut io).unwrap();
        assert_eq!(
            record.get("extra-options"),
            Some("-o PasswordAuthentication=no -i ~/.vagrant.d/insecure_private_key")
        );

        let mut io = ScriptedPrompt::new().answer("none");
        let record = Resolver::new(&schema, true).resolve(&input, &mut io).unwrap();
        assert_eq!(record.get("extra-options"), Some(""));
    }

    #[test]
    fn test_empty_choice_set_resolves_silently() {
        // Default settings configure no alias directories, so the directory
        // field has an empty fixed list: no prompt, empty value.
        let schema = Schema::site_alias(&Settings::default()).unwrap();
        let mut input = full_local_bag();
        input.set("directory", "");

        let mut io = ScriptedPrompt::new();
        let record = Resolver::new(&schema, true).resolve(&input, &mut io).unwrap();
        assert_eq!(record.get("directory"), Some(""));
        assert!(!io.was_asked("Directory"));
    }

    #[test]
    fn test_known_sites_offered_as_selection_list() {
        let settings = Settings {
            sites: vec!["blog".to_string(), "shop".to_string()],
            ..settings()
        };
        let schema = Schema::site_alias(&settings).unwrap();
        let mut io = ScriptedPrompt::new().answer("shop");
        let record = Resolver::new(&schema, true)
            .resolve(&bag(&[("type", "local")]), &mut io)
            .unwrap();
        assert_eq!(record.get("name"), Some("shop"));
        assert!(io.was_asked("Site name"));
    }
}
