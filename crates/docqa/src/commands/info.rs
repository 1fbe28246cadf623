//! Info command implementation

use clap::Args;
use docqa_core::config::{Config, ConfigSources};
use docqa_core::settings::QualityTargets;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    /// Effective limit; absent when disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    max_input_bytes: Option<usize>,
    disable_input_limit: bool,
    enabled_checks: Vec<String>,
    custom_rules: usize,
    glossary: String,
    target_grade: f64,
    max_sentence_length: usize,
    quality_targets: QualityTargets,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let settings = &config.settings;
        let glossary = match settings.terminology_glossary {
            None => format!("default ({} terms)", settings.glossary().len()),
            Some(ref terms) if terms.is_empty() => "off".to_string(),
            Some(ref terms) => format!("custom ({} terms)", terms.len()),
        };
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            max_input_bytes: config.input_limit(),
            disable_input_limit: config.disable_input_limit,
            enabled_checks: settings.style_guide.enabled_checks.clone(),
            custom_rules: settings.style_guide.custom_rules.len(),
            glossary,
            target_grade: settings.readability_targets.target_grade,
            max_sentence_length: settings.readability_targets.max_sentence_length,
            quality_targets: settings.quality_targets,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information and the effective configuration.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = cfg.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    print_opt("Log directory", cfg.log_dir.as_ref());
    match cfg.max_input_bytes {
        Some(max) => println!("{}: {} bytes", "Input limit".dimmed(), max),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    println!();
    println!("{}", "Analysis".bold().underline());
    println!(
        "{}: {}",
        "Style checks".dimmed(),
        if cfg.enabled_checks.is_empty() {
            "(none)".to_string()
        } else {
            cfg.enabled_checks.join(", ")
        }
    );
    println!("{}: {}", "Custom rules".dimmed(), cfg.custom_rules);
    println!("{}: {}", "Glossary".dimmed(), cfg.glossary);
    println!("{}: {:.1}", "Target grade".dimmed(), cfg.target_grade);
    println!(
        "{}: {}",
        "Max sentence length".dimmed(),
        cfg.max_sentence_length
    );

    let t = &cfg.quality_targets;
    println!();
    println!("{}", "Quality Targets".bold().underline());
    for (label, value) in [
        ("Overall", t.overall),
        ("Structure", t.structure),
        ("Readability", t.readability),
        ("Links", t.links),
        ("Style", t.style),
        ("Terminology", t.terminology),
    ] {
        println!("{}: {}", label.dimmed(), value);
    }

    Ok(())
}

/// Print an optional value or "(not set)".
fn print_opt<T: std::fmt::Display>(label: &str, value: Option<&T>) {
    match value {
        Some(v) => println!("{}: {}", label.dimmed(), v),
        None => println!("{}: {}", label.dimmed(), "(not set)".dimmed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::settings::GlossaryTerm;

    fn test_config() -> Config {
        Config::default()
    }

    fn test_sources() -> ConfigSources {
        ConfigSources::default()
    }

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &test_config(), &test_sources()).is_ok());
    }

    #[test]
    fn test_config_info_defaults() {
        let info = ConfigInfo::from_config(&test_config(), &test_sources());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.max_input_bytes, Some(docqa_core::DEFAULT_MAX_INPUT_BYTES));
        assert_eq!(info.glossary, "default (2 terms)");
        assert_eq!(info.enabled_checks.len(), 4);
    }

    #[test]
    fn test_config_info_glossary_modes() {
        let mut config = test_config();
        config.settings.terminology_glossary = Some(Vec::new());
        assert_eq!(ConfigInfo::from_config(&config, &test_sources()).glossary, "off");

        config.settings.terminology_glossary = Some(vec![GlossaryTerm {
            term: "CLI".into(),
            definition: "Command-line interface".into(),
            preferred_usage: "CLI".into(),
            alternatives: vec!["cli".into()],
        }]);
        assert_eq!(
            ConfigInfo::from_config(&config, &test_sources()).glossary,
            "custom (1 terms)"
        );
    }

    #[test]
    fn test_config_info_disabled_limit() {
        let mut config = test_config();
        config.disable_input_limit = true;
        let info = ConfigInfo::from_config(&config, &test_sources());
        assert_eq!(info.max_input_bytes, None);
        assert!(info.disable_input_limit);
    }
}
