//! Configuration for srsforge runs.
//!
//! Precedence is CLI arguments > config file > built-in defaults. The CLI
//! applies its overrides on top of a loaded [`Config`]; this crate only
//! knows about the file and the defaults.
//!
//! # Configuration File Format
//!
//! `srsforge.toml` in the working directory (or a path given via
//! `--config`):
//!
//! ```toml
//! [llm]
//! provider = "groq"
//! model = "mistral-saba-24b"
//! api_key_env = "GROQ_API_KEY"
//! temperature = 0.2
//! max_tokens = 4000
//!
//! [project]
//! root = "generated_api"
//!
//! [verify]
//! python = "python3"
//! timeout = 600
//!
//! [provision]
//! enabled = true
//! database_image = "postgres:latest"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "mistral-saba-24b";
/// Default environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
/// Default sampling temperature for extraction; generation stages override
/// per call.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
/// Default completion length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
/// Default root directory for the generated project.
pub const DEFAULT_PROJECT_ROOT: &str = "generated_api";
/// Default interpreter used to run the generated test suite.
pub const DEFAULT_PYTHON: &str = "python3";
/// Default timeout for one test-suite execution, in seconds.
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 600;
/// Default database container image.
pub const DEFAULT_DATABASE_IMAGE: &str = "postgres:latest";

/// Name of the config file discovered in the working directory.
const CONFIG_FILE_NAME: &str = "srsforge.toml";

/// Configuration load/parse failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub verify: VerifyConfig,
    #[serde(default)]
    pub provision: ProvisionConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. With no explicit path,
    /// `srsforge.toml` in the current directory is used when present,
    /// otherwise the built-in defaults apply.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a file that should be used cannot be
    /// read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(explicit) => Self::from_file(explicit),
            None => {
                let discovered = PathBuf::from(CONFIG_FILE_NAME);
                if discovered.is_file() {
                    Self::from_file(&discovered)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `[llm]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Provider name: `groq` (default) or `openai-compat`.
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Environment variable the API key is read from. Keys are never
    /// stored in the config file itself.
    pub api_key_env: Option<String>,
    /// Override for the API base URL (required for `openai-compat`).
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl LlmConfig {
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    #[must_use]
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    /// Root directory the generated project is written under.
    pub root: Option<PathBuf>,
}

impl ProjectConfig {
    #[must_use]
    pub fn root(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_ROOT))
    }
}

/// `[verify]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VerifyConfig {
    /// Python interpreter used to invoke pytest.
    pub python: Option<String>,
    /// Timeout for one suite execution, in seconds.
    pub timeout: Option<u64>,
}

impl VerifyConfig {
    #[must_use]
    pub fn python(&self) -> &str {
        self.python.as_deref().unwrap_or(DEFAULT_PYTHON)
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or(DEFAULT_VERIFY_TIMEOUT_SECS)
    }
}

/// `[provision]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvisionConfig {
    /// Whether database/environment bring-up runs at all. Disabled runs
    /// use the null provisioner.
    pub enabled: Option<bool>,
    pub database_image: Option<String>,
}

impl ProvisionConfig {
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    #[must_use]
    pub fn database_image(&self) -> &str {
        self.database_image
            .as_deref()
            .unwrap_or(DEFAULT_DATABASE_IMAGE)
    }
}
