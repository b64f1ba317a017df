use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::categorizer::RuleTable;
use crate::error::{FinsortError, Result};
use crate::importer::ColumnMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// JSON rule table used instead of the built-in categories.
    pub rules_file: Option<String>,
    /// CSV read by `finsort report` when no file is given.
    pub default_input: Option<String>,
    pub columns: ColumnMap,
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("finsort")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let parsed: Result<Settings> = std::fs::read_to_string(path)
        .map_err(FinsortError::from)
        .and_then(|content| serde_json::from_str(&content).map_err(FinsortError::from));
    match parsed {
        Ok(settings) => {
            debug!("Loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            warn!("Ignoring unreadable settings file {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Where the rule table comes from: a command-line path beats the settings
/// file, which beats the built-in rules.
#[derive(Debug, Clone, PartialEq)]
pub enum RulesSource {
    Builtin,
    File(PathBuf),
}

impl RulesSource {
    pub fn resolve(cli_path: Option<&str>, settings: &Settings) -> Self {
        cli_path
            .or(settings.rules_file.as_deref())
            .map(|p| Self::File(expand_path(p)))
            .unwrap_or(Self::Builtin)
    }

    pub fn load(&self) -> Result<RuleTable> {
        match self {
            Self::Builtin => Ok(RuleTable::default()),
            Self::File(path) => {
                debug!("Loading rule table from {}", path.display());
                RuleTable::load(path)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Builtin => "built-in".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// The CSV to read: the argument if given, else `default_input` from settings.
pub fn resolve_input(cli_file: Option<&str>, settings: &Settings) -> Result<PathBuf> {
    cli_file
        .or(settings.default_input.as_deref())
        .map(expand_path)
        .ok_or_else(|| {
            FinsortError::Settings(format!(
                "no input file given; pass a CSV path or set \"default_input\" in {}",
                settings_path().display()
            ))
        })
}
