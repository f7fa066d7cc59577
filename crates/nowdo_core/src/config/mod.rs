mod theme;

pub use theme::{Palette, Theme, Tint};

use crate::error::AppError;
use crate::storage::DEFAULT_PREFS_NAME;
use crate::storage::kv::app_file;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "NOWDO_CONFIG_PATH";

/// Lowercases and collapses runs of non-alphanumerics into single underscores.
pub fn canonical_key(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}

/// User settings from `config.json`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Interactive-mode shortcuts: first word to replacement command line.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub prefs_name: Option<String>,
}

/// A config plus whatever went wrong reading it; `config` is usable either way.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

/// Command-line `--config-override` values, applied over the file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
    pub prefs_name: Option<String>,
}

impl Config {
    /// Reads the config at `NOWDO_CONFIG_PATH` or the per-user default path.
    pub fn load() -> ConfigLoad {
        match app_file(CONFIG_ENV_VAR, CONFIG_FILE_NAME) {
            Ok(path) => Self::load_from(&path),
            Err(err) => ConfigLoad {
                config: Self::default(),
                error: Some(err),
            },
        }
    }

    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> ConfigLoad {
        if !path.exists() {
            return ConfigLoad {
                config: Self::default(),
                error: None,
            };
        }

        match Self::read(path) {
            Ok(config) => ConfigLoad {
                config,
                error: None,
            },
            Err(err) => ConfigLoad {
                config: Self::default(),
                error: Some(err),
            },
        }
    }

    fn read(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
        let config: Self = serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
        })?;

        if let Some(raw) = config.theme.as_deref()
            && Theme::parse(raw).is_none()
        {
            warn!(theme = raw, "unknown theme; using plain output");
        }
        debug!(path = %path.display(), aliases = config.aliases.len(), "loaded config");
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.theme.is_some() {
            self.theme = overrides.theme;
        }
        if overrides.prefs_name.is_some() {
            self.prefs_name = overrides.prefs_name;
        }
        self.aliases.extend(overrides.aliases);
        self
    }

    pub fn theme(&self) -> Theme {
        self.theme
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default()
    }

    pub fn palette(&self) -> Palette {
        self.theme().palette()
    }

    pub fn prefs_name(&self) -> &str {
        self.prefs_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_PREFS_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, ConfigOverrides, Theme, canonical_key};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("nowdo-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_file_gives_defaults_quietly() {
        let loaded = Config::load_from(&temp_path("missing-config.json"));

        assert_eq!(loaded.config, Config::default());
        assert!(loaded.error.is_none());
    }

    #[test]
    fn broken_file_gives_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let loaded = Config::load_from(&path);
        fs::remove_file(&path).ok();

        assert_eq!(loaded.config, Config::default());
        assert_eq!(loaded.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn reads_theme_aliases_and_prefs_name() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "aliases": { "now": "pick" },
            "prefs_name": "Work"
        });
        fs::write(&path, content.to_string()).unwrap();

        let loaded = Config::load_from(&path);
        fs::remove_file(&path).ok();

        assert!(loaded.error.is_none());
        assert_eq!(loaded.config.theme(), Theme::Ember);
        assert_eq!(
            loaded.config.aliases.get("now").map(String::as_str),
            Some("pick")
        );
        assert_eq!(loaded.config.prefs_name(), "Work");
    }

    #[test]
    fn unknown_theme_falls_back_to_plain() {
        let config = Config {
            theme: Some("oceanic".into()),
            ..Config::default()
        };
        assert_eq!(config.theme(), Theme::Plain);
    }

    #[test]
    fn prefs_name_defaults_when_unset_or_blank() {
        assert_eq!(Config::default().prefs_name(), "TaskGeneratorPrefs");

        let blank = Config {
            prefs_name: Some("  ".into()),
            ..Config::default()
        };
        assert_eq!(blank.prefs_name(), "TaskGeneratorPrefs");
    }

    #[test]
    fn overrides_win_and_aliases_merge() {
        let base = Config {
            theme: Some("plain".into()),
            aliases: [("p".into(), "pick".into()), ("l".into(), "list".into())]
                .into_iter()
                .collect(),
            prefs_name: None,
        };
        let overrides = ConfigOverrides {
            theme: Some("meadow".into()),
            aliases: [("p".into(), "complete".into())].into_iter().collect(),
            prefs_name: Some("Home".into()),
        };

        let merged = base.with_overrides(overrides);

        assert_eq!(merged.theme(), Theme::Meadow);
        assert_eq!(merged.aliases.get("p").map(String::as_str), Some("complete"));
        assert_eq!(merged.aliases.get("l").map(String::as_str), Some("list"));
        assert_eq!(merged.prefs_name(), "Home");
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let base = Config {
            theme: Some("ember".into()),
            aliases: [("p".into(), "pick".into())].into_iter().collect(),
            prefs_name: Some("Work".into()),
        };

        assert_eq!(base.clone().with_overrides(ConfigOverrides::default()), base);
    }

    #[test]
    fn canonical_key_collapses_separators() {
        assert_eq!(canonical_key(" Prefs--Name "), "prefs_name");
        assert_eq!(canonical_key("__"), "");
    }
}
