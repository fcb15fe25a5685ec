use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk configuration: where the annotated `.sql` files live.
///
/// `queries_path` may use `~` and environment variables; expansion happens
/// while the file is deserialized, so callers only ever see a usable path.
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(deserialize_with = "expanded_path")]
    pub queries_path: PathBuf,
}

impl Config {
    /// Load from the default location. `Ok(None)` means no config file exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn load_from_path(config_path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();

        let content = match std::fs::read_to_string(config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    config_path: config_path.to_path_buf(),
                    source,
                });
            }
        };

        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })?;

        Ok(Some(config))
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/sqlstash");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

/// A path that did not expand cleanly (say, an unset variable) is kept as
/// written; the queries-dir validation downstream reports it.
fn expanded_path<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match shellexpand::full(&raw) {
        Ok(expanded) => Ok(PathBuf::from(expanded.as_ref())),
        Err(_) => Ok(PathBuf::from(raw)),
    }
}
