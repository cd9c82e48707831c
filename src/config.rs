//! Repository configuration stored in `.kommitrc.toml`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use toml_edit::{Array, DocumentMut, Item, Table, value};

use crate::error::ConfigError;
use crate::git::{Git, toplevel};
use crate::llm::pricing::{DEFAULT_MODEL, is_supported_model};

/// Config file name, resolved against the repository root.
pub const CONFIG_FILENAME: &str = ".kommitrc.toml";

/// Default conventional commit types offered by `kommit init`.
pub const DEFAULT_COMMIT_TYPES: &[&str] = &[
    "build", "chore", "ci", "docs", "feat", "fix", "perf", "refactor", "revert", "style", "test",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LlmConfig {
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitConfig {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Commit vocabulary and model selection for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub commit: CommitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                model: DEFAULT_MODEL.to_string(),
            },
            commit: CommitConfig {
                types: DEFAULT_COMMIT_TYPES.iter().map(|t| t.to_string()).collect(),
                scopes: Vec::new(),
            },
        }
    }
}

impl Config {
    pub fn model(&self) -> &str {
        &self.llm.model
    }

    /// Parse config text and validate the model.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(ConfigError::ParseFailed)?;
        if !is_supported_model(&config.llm.model) {
            return Err(ConfigError::UnsupportedModel(config.llm.model));
        }
        Ok(config)
    }

    /// Load config from a file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text)
    }

    /// Load the config of the repository `git` runs in.
    pub fn load(git: &Git) -> Result<Self, ConfigError> {
        Self::load_from(&config_path(git)?)
    }

    /// Render as TOML with a fixed key order: `llm` first, then `commit`.
    pub fn to_toml(&self) -> String {
        let mut doc = DocumentMut::new();

        let mut llm = Table::new();
        llm.insert("model", value(self.llm.model.as_str()));
        doc.insert("llm", Item::Table(llm));

        let mut commit = Table::new();
        commit.insert("types", value(string_array(&self.commit.types)));
        commit.insert("scopes", value(string_array(&self.commit.scopes)));
        doc.insert("commit", Item::Table(commit));

        doc.to_string()
    }

    /// Write the config to a file path, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()).map_err(|source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Path of the config file for the repository `git` runs in.
pub fn config_path(git: &Git) -> Result<PathBuf, ConfigError> {
    let root = toplevel(git).map_err(ConfigError::RepositoryRoot)?;
    Ok(root.join(CONFIG_FILENAME))
}

fn string_array(items: &[String]) -> Array {
    let mut array: Array = items.iter().map(String::as_str).collect();
    if array.len() > 4 {
        for item in array.iter_mut() {
            item.decor_mut().set_prefix("\n  ");
        }
        array.set_trailing("\n");
        array.set_trailing_comma(true);
    }
    array
}
