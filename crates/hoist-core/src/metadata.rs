//! solc contract metadata
//!
//! Only the parts of the metadata document needed to rebuild the source set and the
//! compiler configuration are modelled. Unknown keys (`output`, `remappings`, ...) are
//! ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeTarget, Error, Result};

/// Decoded solc metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractMetadata {
    pub language: String,
    pub compiler: CompilerInfo,
    #[serde(default)]
    pub settings: MetadataSettings,
    #[serde(default)]
    pub sources: BTreeMap<String, SourceFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompilerInfo {
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSettings {
    #[serde(default)]
    pub optimizer: OptimizerSettings,
    #[serde(default)]
    pub evm_version: Option<String>,
    /// Source path to the name of the contract that was compiled for deployment
    #[serde(default)]
    pub compilation_target: BTreeMap<String, String>,
}

/// Optimizer settings. Fields stay optional so that "disabled" and "not recorded" differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerSettings {
    pub enabled: Option<bool>,
    pub runs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    #[serde(default)]
    pub content: String,
}

impl ContractMetadata {
    /// Decode embedded metadata text. Empty text means no metadata was emitted.
    pub fn decode(text: &str) -> Result<Option<Self>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        let metadata: ContractMetadata = serde_json::from_str(text)
            .map_err(|e| Error::decode(DecodeTarget::Metadata, e))?;

        tracing::debug!(
            compiler = %metadata.compiler.version,
            sources = metadata.sources.len(),
            "decoded contract metadata"
        );

        Ok(Some(metadata))
    }

    /// Compiler version as expected by the platform (`0.8.19+commit.x` -> `v0.8.19`)
    pub fn compiler_version(&self) -> String {
        derive_compiler_version(&self.compiler.version)
    }

    /// Whether `path` is one of the compilation targets, returning the contract name
    pub fn target_name(&self, path: &str) -> Option<&str> {
        self.settings
            .compilation_target
            .get(path)
            .map(String::as_str)
    }
}

/// Truncate a raw solc version at the first `+` and prefix it with `v`
pub fn derive_compiler_version(raw: &str) -> String {
    let release = raw.split('+').next().unwrap_or(raw);
    format!("v{}", release)
}
