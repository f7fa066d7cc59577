use clap::{ArgAction, Parser, Subcommand};
use nowdo_core::AppError;
use nowdo_core::config::{ConfigOverrides, canonical_key};

#[derive(Parser, Debug)]
#[command(name = "nowdo", author, version, about = "Pick something to do right now", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: nowdo add "Buy milk"
    Add {
        text: Vec<String>,
    },
    /// Show all tasks, pending first
    ///
    /// Example: nowdo list
    List,
    /// Pick a random pending task
    ///
    /// Example: nowdo pick
    Pick,
    /// Mark the picked task as completed
    ///
    /// Example: nowdo complete
    Complete,
    /// Mark the task at a list position as completed
    ///
    /// Example: nowdo check 2
    Check {
        position: usize,
    },
    /// Mark the task at a list position as pending again
    ///
    /// Example: nowdo uncheck 2
    Uncheck {
        position: usize,
    },
    /// Delete the task at a list position
    ///
    /// Example: nowdo delete 1
    /// Example: nowdo delete 1 --yes
    Delete {
        position: usize,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every task
    ///
    /// Example: nowdo clear --yes
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Converts a 1-based list position into an index.
pub fn position_to_index(position: usize) -> Result<usize, AppError> {
    position
        .checked_sub(1)
        .ok_or_else(|| AppError::invalid_input("positions start at 1"))
}

/// Inside a session the config and logger already exist, so these flags are refused.
pub fn reject_launch_flags(cli: &Cli) -> Result<(), AppError> {
    if !cli.config_override.is_empty() {
        return Err(AppError::invalid_input(
            "--config-override only applies when starting nowdo",
        ));
    }
    if cli.verbose > 0 {
        return Err(AppError::invalid_input(
            "-v only applies when starting nowdo; set RUST_LOG instead",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    PrefsName,
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let (field, remainder) = key_raw
        .split_once('.')
        .map(|(field, rest)| (field.trim(), Some(rest.trim())))
        .unwrap_or((key_raw.trim(), None));

    let canonical_field = canonical_key(field);
    if canonical_field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    match canonical_field.as_str() {
        "theme" | "prefs_name" => {
            if remainder.is_some() {
                return Err(format!("{canonical_field} override cannot have subfields"));
            }
            let target = if canonical_field == "theme" {
                ConfigOverrideTarget::Theme
            } else {
                ConfigOverrideTarget::PrefsName
            };
            Ok(ParsedConfigOverride { target, value })
        }
        "aliases" | "alias" => {
            let alias_name = remainder
                .filter(|segment| !segment.is_empty())
                .ok_or_else(|| "aliases override requires an alias name".to_string())?;
            Ok(ParsedConfigOverride {
                target: ConfigOverrideTarget::Alias(alias_name.to_string()),
                value,
            })
        }
        other => Err(format!("unknown config field '{other}'")),
    }
}

pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::PrefsName => overrides.prefs_name = Some(parsed.value),
            ConfigOverrideTarget::Alias(name) => {
                overrides.aliases.insert(name, parsed.value);
            }
        }
    }
    Ok(overrides)
}
