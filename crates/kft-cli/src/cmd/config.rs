use crate::output::print_json;
use crate::session::Session;
use anyhow::Context;
use clap::Subcommand;
use kft_core::config::{WarnLevel, SETTABLE_KEYS};
use kft_core::paths;

// ---------------------------------------------------------------------------
// Subcommand types
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Validate the config for common mistakes
    Validate,

    /// Set a single key, e.g. `defaults.namespace apps` (`none` clears it)
    Set { key: String, value: String },

    /// Print the config file location
    Path,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(session: &Session, subcmd: ConfigSubcommand) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Show => show(session),
        ConfigSubcommand::Validate => validate(session),
        ConfigSubcommand::Set { key, value } => set(session, &key, &value),
        ConfigSubcommand::Path => {
            println!("{}", paths::config_path(&session.home).display());
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

fn show(session: &Session) -> anyhow::Result<()> {
    if session.json {
        return print_json(&session.config);
    }
    let yaml = serde_yaml::to_string(&session.config).context("failed to render config")?;
    print!("{yaml}");
    Ok(())
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

fn validate(session: &Session) -> anyhow::Result<()> {
    let warnings = session.config.validate();

    if session.json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("config validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

fn set(session: &Session, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = session.config.clone();
    config
        .set(key, value)
        .with_context(|| format!("valid keys: {}", SETTABLE_KEYS.join(", ")))?;
    config.save(&session.home).context("failed to save config")?;
    println!("Set {key} = {value}.");
    Ok(())
}
