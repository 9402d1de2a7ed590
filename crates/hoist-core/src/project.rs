//! Project configuration model
//!
//! ```yaml
//! projects:
//!   staking:
//!     slug: acme/staking
//!     network: "1"
//!     contracts:
//!       - path: deployments/mainnet/River.json
//!         name: River
//!         tag: v1.2.0
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::{NetworkId, ProjectSlug};

/// All projects of a configuration file, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectsConfig {
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
}

/// One destination project on the platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    pub slug: ProjectSlug,
    pub network: NetworkId,
    #[serde(default)]
    pub contracts: Vec<ContractEntry>,
}

/// One artifact to upload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractEntry {
    /// Path to the compiled artifact
    pub path: PathBuf,
    /// Display name applied after upload
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ContractEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            name: None,
            tag: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Display name, treating an empty name as unset
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

impl ProjectsConfig {
    /// Keep only the named projects. An empty filter keeps everything.
    pub fn select(mut self, names: &[String]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }

        if let Some(unknown) = names.iter().find(|n| !self.projects.contains_key(*n)) {
            return Err(Error::Config(format!(
                "project '{}' not found, available: {}",
                unknown,
                self.project_names().join(", ")
            )));
        }

        self.projects.retain(|name, _| names.contains(name));
        Ok(self)
    }

    pub fn project_names(&self) -> Vec<&str> {
        self.projects.keys().map(String::as_str).collect()
    }

    /// Number of contract entries across all projects
    pub fn contract_count(&self) -> usize {
        self.projects.values().map(|p| p.contracts.len()).sum()
    }
}
