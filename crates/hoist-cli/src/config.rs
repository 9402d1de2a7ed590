use std::path::{Path, PathBuf};

use hoist_core::{DecodeTarget, Error, ProjectsConfig, Result};
use serde::Deserialize;

/// Default project configuration file
pub const PROJECTS_CONFIG: &str = "tenderly.yml";

const DEFAULT_API_URL: &str = "https://api.tenderly.co";
const ACCESS_KEY_ENV: &str = "TENDERLY_ACCESS_KEY";
const API_URL_ENV: &str = "TENDERLY_API_URL";

// =============================================================================
// Project Configuration
// =============================================================================

/// Project configuration file format, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(Error::Config(format!(
                "unsupported configuration file '{}', expected .yml, .yaml, .json or .toml",
                path.display()
            ))),
        }
    }
}

/// Load the project configuration from `path`
pub fn load_projects(path: &Path) -> Result<ProjectsConfig> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    parse_projects(&content, format)
}

pub fn parse_projects(content: &str, format: ConfigFormat) -> Result<ProjectsConfig> {
    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| Error::decode(DecodeTarget::Config, e))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| Error::decode(DecodeTarget::Config, e))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| Error::decode(DecodeTarget::Config, e))
        }
    }
}

// =============================================================================
// Authentication
// =============================================================================

/// Credentials written by `tenderly login` (~/.tenderly/config.yaml)
/// We only parse the keys we need
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TenderlyConfigFile {
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
}

impl TenderlyConfigFile {
    /// Default location under the home directory
    pub fn default_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".tenderly").join("config.yaml"))
    }

    /// Load the file at `path`, `None` if it does not exist
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let file = serde_yaml::from_str(&content)
            .map_err(|e| Error::decode(DecodeTarget::Config, e))?;
        Ok(Some(file))
    }
}

/// Credentials and endpoint of the platform API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub access_key: String,
    pub api_url: String,
}

impl AuthConfig {
    /// Resolve from the environment, falling back to the `tenderly login` config file
    pub fn load() -> Result<Self> {
        let file = match TenderlyConfigFile::default_path() {
            Some(path) => TenderlyConfigFile::load_from(&path)?,
            None => None,
        };

        Self::resolve(
            std::env::var(ACCESS_KEY_ENV).ok(),
            std::env::var(API_URL_ENV).ok(),
            file,
        )
    }

    /// Environment values win over the config file
    pub fn resolve(
        env_access_key: Option<String>,
        env_api_url: Option<String>,
        file: Option<TenderlyConfigFile>,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();

        let access_key = env_access_key
            .filter(|k| !k.is_empty())
            .or(file.access_key)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "no access key found, set {} or run `tenderly login`",
                    ACCESS_KEY_ENV
                ))
            })?;

        let api_url = env_api_url
            .filter(|u| !u.is_empty())
            .or(file.api_url)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            access_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}
