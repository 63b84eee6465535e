//! Configuration module for mrktr
//!
//! Settings come from `mrktr.yml`, then the process environment, then an
//! allow-listed `.env` file for keys the environment does not set.

mod settings;

pub use settings::*;

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "MRKTR_SETTINGS_PATH";

/// Allow-listed values read from a `.env` file
#[derive(Debug, Clone, Default)]
pub struct DotEnv {
    values: HashMap<String, String>,
    ignored: Vec<String>,
}

impl DotEnv {
    /// Read `path`; a missing file yields an empty set
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut values = HashMap::new();
        let mut ignored = BTreeSet::new();
        for item in iter {
            let (key, value) = match item {
                Ok(pair) => pair,
                Err(err) => {
                    warn!("Skipping unreadable line in {}: {}", path.display(), err);
                    continue;
                }
            };
            if ALLOWED_ENV_KEYS.contains(&key.as_str()) {
                values.insert(key, value);
            } else {
                ignored.insert(key);
            }
        }

        Ok(Self {
            values,
            ignored: ignored.into_iter().collect(),
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Unknown keys found in the file, sorted
    pub fn ignored_keys(&self) -> &[String] {
        &self.ignored
    }
}

/// First settings file that exists, in lookup order
pub fn find_settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut paths = vec![
        PathBuf::from("mrktr.yml"),
        PathBuf::from("config/mrktr.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("mrktr").join("mrktr.yml"));
    }

    paths.into_iter().find(|path| path.exists())
}

/// Load settings from `path`, or the first settings file found, or
/// defaults. Then merge the process environment and `dotenv`; the process
/// environment takes precedence over `dotenv`.
pub fn load(path: Option<&Path>, dotenv: &DotEnv) -> Result<Settings> {
    let path = path.map(Path::to_path_buf).or_else(find_settings_path);
    let mut settings = match path {
        Some(path) => {
            info!("Loading settings from: {}", path.display());
            Settings::from_file(&path)?
        }
        None => {
            info!("No settings file found, using defaults");
            Settings::default()
        }
    };

    settings.merge_env_with(|key| {
        std::env::var(key)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| dotenv.get(key).map(str::to_string))
    });

    Ok(settings)
}
