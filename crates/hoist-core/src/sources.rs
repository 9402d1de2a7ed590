//! Source dependency set reconstruction
//!
//! solc metadata lists every file that took part in the compilation. The platform wants
//! one entry per file, with the deployment attached to the file holding the compiled
//! contract.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metadata::ContractMetadata;
use crate::types::NetworkId;

/// Compiler identifier sent for every source entry
pub const SOLC: &str = "solc";

/// One source file of the uploaded contract set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSourceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_name: Option<String>,
    #[serde(rename = "source")]
    pub source_content: String,
    pub source_path: String,
    pub compiler: ContractCompiler,
    /// Deployments of this entry; empty unless it is the compilation target
    pub networks: BTreeMap<NetworkId, ContractNetwork>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCompiler {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractNetwork {
    pub address: String,
}

impl ContractSourceEntry {
    /// Whether this entry carries a deployment
    pub fn is_deployed(&self) -> bool {
        !self.networks.is_empty()
    }
}

/// Expand the metadata source set into one entry per file, ordered by path
pub fn build_source_entries(
    metadata: &ContractMetadata,
    address: &str,
    network_id: &NetworkId,
) -> Vec<ContractSourceEntry> {
    let version = metadata.compiler_version();

    let entries: Vec<ContractSourceEntry> = metadata
        .sources
        .iter()
        .map(|(path, source)| {
            let mut entry = ContractSourceEntry {
                contract_name: None,
                source_content: source.content.clone(),
                source_path: path.clone(),
                compiler: ContractCompiler {
                    name: SOLC.to_string(),
                    version: version.clone(),
                },
                networks: BTreeMap::new(),
            };

            if let Some(name) = metadata.target_name(path) {
                entry.contract_name = Some(name.to_string());
                entry.networks.insert(
                    network_id.clone(),
                    ContractNetwork {
                        address: address.to_string(),
                    },
                );
            }

            entry
        })
        .collect();

    if !entries.iter().any(ContractSourceEntry::is_deployed) {
        tracing::warn!(
            targets = ?metadata.settings.compilation_target,
            "no source file matches the compilation target, upload carries no address"
        );
    }

    entries
}
