//! Upload request assembly

use serde::Serialize;

use crate::error::{Error, Result};
use crate::metadata::ContractMetadata;
use crate::sources::ContractSourceEntry;

/// Compiler configuration attached to an upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizations_used: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimizations_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
}

/// Body of the contract-creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub contracts: Vec<ContractSourceEntry>,
    pub config: UploadConfig,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tag: String,
}

impl UploadConfig {
    /// Copy optimizer settings and EVM version out of the metadata
    ///
    /// Both optimizer fields must be recorded; the EVM version may be absent.
    pub fn from_metadata(metadata: &ContractMetadata) -> Result<Self> {
        let optimizer = &metadata.settings.optimizer;

        let enabled = optimizer
            .enabled
            .ok_or(Error::MissingOptimizerSettings("optimizer.enabled"))?;
        let runs = optimizer
            .runs
            .ok_or(Error::MissingOptimizerSettings("optimizer.runs"))?;

        Ok(Self {
            optimizations_used: Some(enabled),
            optimizations_count: Some(runs),
            evm_version: metadata.settings.evm_version.clone(),
        })
    }
}

impl UploadRequest {
    /// Build the upload request for one contract entry
    pub fn build(
        metadata: &ContractMetadata,
        contracts: Vec<ContractSourceEntry>,
        tag: Option<&str>,
    ) -> Result<Self> {
        let config = UploadConfig::from_metadata(metadata)?;

        Ok(Self {
            contracts,
            config,
            tag: tag.unwrap_or_default().to_string(),
        })
    }

    /// Entries that carry a deployment
    pub fn deployed_contracts(&self) -> impl Iterator<Item = &ContractSourceEntry> {
        self.contracts.iter().filter(|c| c.is_deployed())
    }
}

/// Body of the rename call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRequest {
    pub display_name: String,
}

impl RenameRequest {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
        }
    }
}
