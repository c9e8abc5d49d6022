//! Process-wide configuration.
//!
//! Loaded once, before a run starts, from (lowest to highest priority):
//!
//! 1. built-in defaults,
//! 2. a configuration file (YAML, TOML or JSON, chosen by extension),
//!    defaulting to `config.yaml` in the platform configuration directory,
//! 3. environment variables prefixed with `CIRRUS_`, nested keys separated
//!    by `__` (e.g. `CIRRUS_SELECT__USER_INTERACTIONS=id,displayName`).
//!
//! Nothing reads configuration after that: the collector is handed the
//! values it needs when each stage starts.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Default number of workers per stage.
pub const DEFAULT_WORKERS: usize = 25;
/// Default page size requested from the APIs.
pub const DEFAULT_PAGE_SIZE: u32 = 99;

const ENV_PREFIX: &str = "CIRRUS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Size of the worker pool every stage fans out to, and therefore the
    /// number of concurrent requests a single stage may have in flight.
    pub workers: usize,
    /// Page size for listings that don't set their own. `0` means default.
    pub page_size: u32,
    /// Fields to select, per stage.
    pub select: Select,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            page_size: DEFAULT_PAGE_SIZE,
            select: Select::default(),
        }
    }
}

/// Fields to request, per stage. An empty list leaves the choice to the API.
///
/// Each list accepts either a sequence or a single comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Select {
    #[serde(deserialize_with = "field_list")]
    pub group365_members: Vec<String>,
    #[serde(deserialize_with = "field_list")]
    pub user_interactions: Vec<String>,
    #[serde(deserialize_with = "field_list")]
    pub groups_of_member: Vec<String>,
}
impl Default for Select {
    fn default() -> Self {
        Self {
            group365_members: vec!["id,displayName,createdDateTime".to_string()],
            user_interactions: vec!["id,displayName".to_string()],
            groups_of_member: Vec::new(),
        }
    }
}

fn field_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldList {
        One(String),
        Many(Vec<String>),
    }
    Ok(match FieldList::deserialize(deserializer)? {
        FieldList::One(fields) => vec![fields],
        FieldList::Many(fields) => fields,
    })
}

/// Location of the configuration file when none is given explicitly.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cirrus").map(|dirs| dirs.config_dir().join("config.yaml"))
}

impl Config {
    /// Load and validate configuration from every source.
    ///
    /// A missing file is not an error; a file that exists but doesn't parse
    /// is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_path);
        tracing::debug!(path = ?path, "Loading configuration");
        let config: Self = Self::figment(path.as_deref()).extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    /// The layered sources [`load()`](Self::load) extracts from, without the
    /// default path lookup.
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = match path.extension().and_then(|ext| ext.to_str()).map(str::to_lowercase).as_deref() {
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            exn::bail!(ErrorKind::Invalid("workers must be at least 1".to_string()));
        }
        Ok(())
    }
}
