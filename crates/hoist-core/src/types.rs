use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Identifier Newtypes
// =============================================================================

/// Network identifier (chain ID as configured, e.g. `"1"` or `"5"`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NetworkId(pub String);

/// Network IDs may be written as strings or bare numbers in configuration files
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNetworkId {
    Text(String),
    Number(u64),
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawNetworkId::deserialize(deserializer)? {
            RawNetworkId::Text(id) => Self(id),
            RawNetworkId::Number(id) => Self(id.to_string()),
        })
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NetworkId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NetworkId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl NetworkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Destination project on the platform
///
/// A plain slug names a project of the authenticated account; `account/project`
/// names a project owned by another account the caller has access to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectSlug(pub String);

impl fmt::Display for ProjectSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectSlug {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProjectSlug {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl ProjectSlug {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(account, project)`, where account is `me` for plain slugs
    pub fn account_and_project(&self) -> (&str, &str) {
        match self.0.split_once('/') {
            Some((account, project)) => (account, project),
            None => ("me", self.0.as_str()),
        }
    }
}

// =============================================================================
// Pipeline Stages
// =============================================================================

/// Stage of the per-contract pipeline, reported on progress and failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ReadingArtifact,
    Decoding,
    BuildingPayload,
    Uploading,
    Renaming,
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ReadingArtifact => "reading artifact",
            Stage::Decoding => "decoding",
            Stage::BuildingPayload => "building payload",
            Stage::Uploading => "uploading",
            Stage::Renaming => "renaming",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
