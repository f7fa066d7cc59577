use crate::error::AppError;
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

pub const DEFAULT_PREFS_NAME: &str = "TaskGeneratorPrefs";
const STORE_ENV_VAR: &str = "NOWDO_STORE_PATH";
const APP_DIR: &str = "nowdo";

/// String key-value storage, modelled on a platform preferences file.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn put(&mut self, key: &str, value: String) -> Result<(), AppError>;

    fn remove(&mut self, key: &str) -> Result<(), AppError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), AppError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Preferences persisted as one flat JSON object of string values.
#[derive(Debug, Clone)]
pub struct PrefsFile {
    path: PathBuf,
}

impl PrefsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default(prefs_name: &str) -> Result<Self, AppError> {
        Ok(Self::new(prefs_path(prefs_name)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid JSON in {}: {}", self.path.display(), err))
        })
    }

    /// Like `read_all`, but a malformed file reads as empty so it can be overwritten.
    fn read_for_write(&self) -> Result<BTreeMap<String, String>, AppError> {
        match self.read_all() {
            Err(AppError::InvalidData(message)) => {
                warn!(error = %message, "discarding unreadable preferences file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let content = serde_json::to_string_pretty(entries)?;
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(content.as_bytes())?;
        temp.flush()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            temp.as_file().set_permissions(permissions)?;
        }

        temp.persist(&self.path).map_err(|err| {
            AppError::io(format!("failed to persist {}: {}", self.path.display(), err))
        })?;

        Ok(())
    }
}

impl KeyValueStore for PrefsFile {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(key))
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), AppError> {
        let mut entries = self.read_for_write()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), AppError> {
        if !self.path.exists() {
            return Ok(());
        }

        match self.read_all() {
            Ok(mut entries) => {
                if entries.remove(key).is_some() {
                    self.write_all(&entries)?;
                }
                Ok(())
            }
            Err(AppError::InvalidData(message)) => {
                warn!(error = %message, "resetting unreadable preferences file");
                self.write_all(&BTreeMap::new())
            }
            Err(err) => Err(err),
        }
    }
}

pub fn prefs_path(prefs_name: &str) -> Result<PathBuf, AppError> {
    app_file(STORE_ENV_VAR, &format!("{prefs_name}.json"))
}

/// `env_var` when set, else `file_name` under the per-user nowdo directory.
pub(crate) fn app_file(env_var: &str, file_name: &str) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(env_var)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let base = if cfg!(windows) {
        std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        format!("{home}/.config")
    };
    Ok(PathBuf::from(base).join(APP_DIR).join(file_name))
}
