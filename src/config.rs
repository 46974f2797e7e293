//! Configuration loading and management
//!
//! Two files are involved:
//! - `todo.toml` - process settings (data directory, states, server)
//! - `lists.yml` - the list catalog (list id -> display title)
//!
//! Both are read once at startup and are immutable afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default settings file name, looked up in the working directory
pub const CONFIG_FILE: &str = "todo.toml";

/// List id used when no catalog file exists
pub const FALLBACK_LIST_ID: &str = "todos";

const FALLBACK_LIST_TITLE: &str = "Todos";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one `<list>.json` per list
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Path of the list catalog
    #[serde(default = "default_lists_file")]
    pub lists_file: PathBuf,

    /// Single-file location kept for the default list of older deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_file: Option<PathBuf>,

    /// Allowed todo states
    #[serde(default)]
    pub states: StatesConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lists_file: default_lists_file(),
            legacy_file: None,
            states: StatesConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_lists_file() -> PathBuf {
    PathBuf::from("lists.yml")
}

/// The fixed set of states a todo may be in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatesConfig {
    /// Allowed states, in display order
    #[serde(default = "default_states")]
    pub allowed: Vec<String>,

    /// State used for new todos and for invalid input
    #[serde(default = "default_state")]
    pub default: String,
}

fn default_states() -> Vec<String> {
    vec!["idle".to_string(), "inwork".to_string()]
}

fn default_state() -> String {
    "idle".to_string()
}

impl Default for StatesConfig {
    fn default() -> Self {
        Self {
            allowed: default_states(),
            default: default_state(),
        }
    }
}

impl StatesConfig {
    /// Configured spelling of `state`, matched case-insensitively
    pub fn canonical(&self, state: &str) -> Option<&str> {
        let needle = state.trim().to_lowercase();
        self.allowed
            .iter()
            .map(|allowed| allowed.trim())
            .find(|allowed| allowed.to_lowercase() == needle)
    }

    /// Canonical spelling of the default state
    pub fn default_state(&self) -> &str {
        self.canonical(&self.default)
            .unwrap_or_else(|| self.default.trim())
    }

    fn validate(&self) -> Result<()> {
        if self.allowed.is_empty() {
            return Err(Error::InvalidConfig(
                "states.allowed cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for state in &self.allowed {
            let trimmed = state.trim();
            if trimmed.is_empty() {
                return Err(Error::InvalidConfig(
                    "states.allowed cannot include empty entries".to_string(),
                ));
            }
            if !seen.insert(trimmed.to_lowercase()) {
                return Err(Error::InvalidConfig(format!(
                    "states.allowed has duplicate entry '{trimmed}'"
                )));
            }
        }

        if self.canonical(&self.default).is_none() {
            return Err(Error::InvalidConfig(format!(
                "states.default '{}' not in states.allowed",
                self.default
            )));
        }

        Ok(())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Consecutive ports tried when the configured one is taken
    #[serde(default = "default_port_attempts")]
    pub port_attempts: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_port_attempts() -> u16 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            port_attempts: default_port_attempts(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return defaults
    ///
    /// Unlike a missing file, an unreadable or invalid one is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.states.validate()?;
        if self.server.port_attempts == 0 {
            return Err(Error::InvalidConfig(
                "server.port_attempts must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One configured list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub id: String,
    pub title: String,
}

/// The static list id -> title catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCatalog {
    entries: Vec<ListEntry>,
    default_id: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    default: Option<String>,
    #[serde(default)]
    lists: serde_yaml::Mapping,
}

impl Default for ListCatalog {
    fn default() -> Self {
        Self {
            entries: vec![ListEntry {
                id: FALLBACK_LIST_ID.to_string(),
                title: FALLBACK_LIST_TITLE.to_string(),
            }],
            default_id: FALLBACK_LIST_ID.to_string(),
        }
    }
}

impl ListCatalog {
    /// Build a catalog from explicit entries; the first entry is the default
    pub fn new(entries: Vec<ListEntry>) -> Result<Self> {
        let default_id = entries
            .first()
            .map(|entry| entry.id.clone())
            .ok_or_else(|| Error::InvalidConfig("list catalog cannot be empty".to_string()))?;
        let catalog = Self {
            entries,
            default_id,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse the catalog from its YAML text
    pub fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;

        let mut entries = Vec::with_capacity(file.lists.len());
        for (key, value) in &file.lists {
            let id = yaml_scalar(key).ok_or_else(|| {
                Error::InvalidConfig("list ids must be plain scalars".to_string())
            })?;
            let title = yaml_scalar(value).unwrap_or_else(|| id.clone());
            entries.push(ListEntry { id, title });
        }

        if entries.is_empty() {
            return Ok(Self::default());
        }

        let default_id = match file.default {
            Some(id) => id.trim().to_string(),
            None => entries[0].id.clone(),
        };

        let catalog = Self {
            entries,
            default_id,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the catalog file, or the single fallback list when it is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no list catalog, using single default list");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    pub fn get(&self, id: &str) -> Option<&ListEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            validate_list_id(&entry.id)?;
            if !seen.insert(entry.id.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate list id '{}'",
                    entry.id
                )));
            }
        }
        if !seen.contains(self.default_id.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "default list '{}' is not a configured list",
                self.default_id
            )));
        }
        Ok(())
    }
}

/// List ids become file names, so keep them to a safe alphabet.
fn validate_list_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::InvalidConfig("list id cannot be empty".to_string()));
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(Error::InvalidConfig(format!(
            "list id '{id}' may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.trim().to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
