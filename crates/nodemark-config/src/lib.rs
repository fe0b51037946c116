use nodemark_engine::{EngineError, HomeEndStrategy, Options, Schema, TextInputStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid atom_type `{atom_type}`: {source}")]
    InvalidAtomType {
        atom_type: String,
        source: EngineError,
    },
}

pub const DEFAULT_ATOM_TYPE: &str = "chip";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node type treated as an atomic unit.
    pub atom_type: String,
    pub home_end: HomeEndStrategy,
    pub text_input: TextInputStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            atom_type: DEFAULT_ATOM_TYPE.to_string(),
            home_end: HomeEndStrategy::default(),
            text_input: TextInputStrategy::default(),
        }
    }
}

impl Config {
    /// Loads the config at `config_path`, expanding `~` and environment
    /// variables in the path first. A missing file is `Ok(None)`.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let config_path = Self::expand_path(config_path).unwrap_or(config_path.to_path_buf());
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&config_path).map_err(|source| ConfigError::ConfigReadError {
                config_path: config_path.clone(),
                source,
            })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.clone(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/nodemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Engine options for `schema`. The atom type must be registered there as
    /// an inline node with inline content.
    pub fn options(&self, schema: &Schema) -> Result<Options, ConfigError> {
        let atom =
            schema
                .atom_type(&self.atom_type)
                .map_err(|source| ConfigError::InvalidAtomType {
                    atom_type: self.atom_type.clone(),
                    source,
                })?;
        Ok(Options {
            atom,
            home_end: self.home_end,
            text_input: self.text_input,
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
