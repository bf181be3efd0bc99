use anyhow::{bail, Context, Result};
use clap::Subcommand;
use koto_core::config::{Config, WarnLevel};
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum SchemaSubcommand {
    /// List the configured databases and their properties
    List,
    /// Check the configuration for problems
    Validate,
}

pub fn run(config_path: &Path, subcommand: SchemaSubcommand, json: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match subcommand {
        SchemaSubcommand::List => run_list(&config, json),
        SchemaSubcommand::Validate => run_validate(&config, json),
    }
}

fn run_list(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.databases)?);
        return Ok(());
    }

    let registry = config.registry();
    for (name, entry) in registry.describe_all() {
        match &entry.title {
            Some(title) => println!("{name} ({title})"),
            None => println!("{name}"),
        }
        if !entry.description.is_empty() {
            println!("  {}", entry.description);
        }
        for (property, schema) in &entry.properties {
            if schema.options.is_empty() {
                println!("  - {property}: {}", schema.kind.as_str());
            } else {
                println!(
                    "  - {property}: {} [{}]",
                    schema.kind.as_str(),
                    schema.options.join(", ")
                );
            }
        }
    }
    Ok(())
}

fn run_validate(config: &Config, json: bool) -> Result<()> {
    let warnings = config.validate();

    if json {
        println!("{}", serde_json::to_string_pretty(&warnings)?);
    } else if warnings.is_empty() {
        println!("configuration ok: {} database(s)", config.databases.len());
    } else {
        for warning in &warnings {
            let tag = match warning.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("{tag}: {}", warning.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        bail!("configuration has errors");
    }
    Ok(())
}
