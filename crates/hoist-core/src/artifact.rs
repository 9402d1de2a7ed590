//! Compiled artifact loading
//!
//! Deployment artifacts (hardhat-deploy style) are JSON files carrying the deployed
//! address and the solc metadata as an embedded JSON string. Every other field of the
//! envelope (abi, bytecode, receipts, ...) is ignored.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DecodeTarget, Error, Result};
use crate::metadata::ContractMetadata;

/// Top-level envelope of a compiled artifact file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompiledArtifact {
    /// Deployed contract address, kept verbatim
    pub address: String,
    /// Embedded solc metadata, empty when the artifact was produced without it
    #[serde(default)]
    pub metadata: String,
}

impl CompiledArtifact {
    /// Read and decode the artifact at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "read artifact");
        Self::from_json(&content)
    }

    /// Decode an artifact envelope from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::decode(DecodeTarget::Artifact, e))
    }

    /// Decode the embedded metadata, `None` if the artifact carries none
    pub fn decode_metadata(&self) -> Result<Option<ContractMetadata>> {
        ContractMetadata::decode(&self.metadata)
    }
}
