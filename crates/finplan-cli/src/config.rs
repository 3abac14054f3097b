//! Planner configuration: gate thresholds and the per-state parameter table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use finplan_core::gating::GateThresholds;
use finplan_core::strategies::StateParamTable;

/// Configuration compiled into the binary, used when `--config` is absent.
const DEFAULT_CONFIG: &str = include_str!("../config/default.yaml");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub thresholds: GateThresholds,
    pub state_params: StateParamTable,
}

impl PlannerConfig {
    /// Load from `path`, or from the embedded default when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_CONFIG, None)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents, Some(path))
    }

    fn from_yaml(contents: &str, origin: Option<&Path>) -> Result<Self, ConfigError> {
        let config: PlannerConfig =
            serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
                origin: origin.map(Path::to_path_buf),
                source,
            })?;
        tracing::debug!(
            states = config.state_params.len(),
            origin = %origin.map_or_else(|| "embedded".to_string(), |p| p.display().to_string()),
            "planner config loaded"
        );
        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        origin: Option<PathBuf>,
        source: serde_yaml::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config '{}': {}", path.display(), source)
            }
            ConfigError::Parse {
                origin: Some(path),
                source,
            } => write!(f, "invalid config '{}': {}", path.display(), source),
            ConfigError::Parse {
                origin: None,
                source,
            } => write!(f, "invalid built-in config: {}", source),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}
