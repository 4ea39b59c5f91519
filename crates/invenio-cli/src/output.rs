use std::fmt::Write as _;

use anyhow::anyhow;
use clap::ValueEnum;
use invenio_app::{AssetEnvironment, CommandRegistry};
use invenio_config::ConfigMap;
use serde_json::Value;

use crate::context::{CliError, CliResult};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

/// Strings print bare; everything else prints as JSON.
#[must_use]
pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Placeholder printed in place of secret values.
const MASK: &str = "***";

fn is_sensitive(key: &str) -> bool {
    key.ends_with("SECRET_KEY") || key.ends_with("PASSWORD")
}

/// Copy of `config` with secret values replaced by [`MASK`]; provenance is kept.
fn masked(config: &ConfigMap) -> ConfigMap {
    let mut shown = ConfigMap::new();
    for (key, entry) in config.iter() {
        let value = if is_sensitive(key) {
            Value::String(MASK.to_string())
        } else {
            entry.value.clone()
        };
        shown.insert(key, value, entry.source.clone());
    }
    shown
}

pub(crate) fn render_config(config: &ConfigMap, format: OutputFormat) -> CliResult<String> {
    let config = masked(config);
    match format {
        OutputFormat::Json => to_json(&config),
        OutputFormat::Table => {
            let width = config.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            let mut out = String::new();
            for (key, entry) in config.iter() {
                let _ = writeln!(
                    out,
                    "{key:<width$} = {}  [{}]",
                    format_value(&entry.value),
                    entry.source
                );
            }
            Ok(out)
        }
    }
}

pub(crate) fn render_groups(registry: &CommandRegistry) -> String {
    let mut out = String::new();
    for group in registry.groups() {
        let _ = writeln!(
            out,
            "{:<12} {} ({})",
            group.name,
            group.about,
            group.commands.join(", ")
        );
    }
    out
}

pub(crate) fn render_bundles(env: &AssetEnvironment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "source: {}", env.source_dir().display());
    let _ = writeln!(out, "output: {}", env.output_dir().display());
    for (name, bundle) in env.bundles() {
        let _ = writeln!(
            out,
            "{name}: {} <- {}",
            bundle.output,
            bundle.contents.join(", ")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use invenio_app::{Bundle, CommandGroup};
    use invenio_config::ConfigSource;
    use serde_json::json;
    use std::path::PathBuf;

    fn sample_config() -> ConfigMap {
        let mut config = ConfigMap::new();
        config.insert("DEBUG", json!(false), ConfigSource::Default);
        config.insert(
            "THEME_SITENAME",
            json!("Zenodo"),
            ConfigSource::Module("site".to_string()),
        );
        config
    }

    #[test]
    fn table_shows_value_and_provenance() -> CliResult<()> {
        let text = render_config(&sample_config(), OutputFormat::Table)?;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "DEBUG          = false  [default]");
        assert_eq!(lines[1], "THEME_SITENAME = Zenodo  [module:site]");
        Ok(())
    }

    #[test]
    fn json_keeps_the_source_stage() -> CliResult<()> {
        let text = render_config(&sample_config(), OutputFormat::Json)?;
        let parsed: Value = serde_json::from_str(&text)
            .map_err(|err| CliError::failure(anyhow!("invalid JSON: {err}")))?;
        assert_eq!(parsed["THEME_SITENAME"]["value"], json!("Zenodo"));
        assert_eq!(
            parsed["THEME_SITENAME"]["source"],
            json!({"stage": "module", "name": "site"})
        );
        assert_eq!(parsed["DEBUG"]["source"], json!({"stage": "default"}));
        Ok(())
    }

    #[test]
    fn secrets_are_masked_in_every_format() -> CliResult<()> {
        let mut config = sample_config();
        config.insert("SECRET_KEY", json!("s3cret"), ConfigSource::Override);
        config.insert("MAIL_PASSWORD", json!("hunter2"), ConfigSource::Environment);

        let table = render_config(&config, OutputFormat::Table)?;
        assert!(!table.contains("s3cret"));
        assert!(!table.contains("hunter2"));
        assert!(table.contains("SECRET_KEY     = ***  [override]"));
        assert!(table.contains("THEME_SITENAME = Zenodo  [module:site]"));

        let parsed: Value = serde_json::from_str(&render_config(&config, OutputFormat::Json)?)
            .map_err(|err| CliError::failure(anyhow!("invalid JSON: {err}")))?;
        assert_eq!(parsed["SECRET_KEY"]["value"], json!("***"));
        assert_eq!(parsed["MAIL_PASSWORD"]["value"], json!("***"));
        assert_eq!(parsed["MAIL_PASSWORD"]["source"], json!({"stage": "environment"}));
        assert_eq!(parsed["DEBUG"]["value"], json!(false));
        Ok(())
    }

    #[test]
    fn groups_and_bundles_render_one_line_each() {
        let mut registry = CommandRegistry::default();
        registry.add_group(CommandGroup::new("assets", "Bundles", &["list", "build"]));
        assert_eq!(render_groups(&registry), "assets       Bundles (list, build)\n");

        let mut env = AssetEnvironment::new(PathBuf::from("src"), PathBuf::from("out"), false);
        env.register("site", Bundle::new("gen/site.css", &["a.css", "b.css"]));
        let text = render_bundles(&env);
        assert!(text.contains("site: gen/site.css <- a.css, b.css"));
        assert!(text.starts_with("source: src\n"));
    }

    #[test]
    fn strings_print_without_quotes() {
        assert_eq!(format_value(&json!("x")), "x");
        assert_eq!(format_value(&json!({"a": 1})), "{\"a\":1}");
    }
}
