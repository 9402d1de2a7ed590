//! Verification document output
//!
//! Block explorers accept a solc standard-JSON style input for manual verification.
//! The document is regenerated from the artifact metadata and written next to the
//! artifact, under [`VERIFICATION_DIR`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::metadata::{ContractMetadata, OptimizerSettings, SourceFile};

/// Directory created beside the artifact, named for the verification service
pub const VERIFICATION_DIR: &str = "etherscan";

const ARTIFACT_SUFFIX: &str = ".json";
const DOCUMENT_SUFFIX: &str = ".solcinput.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationDocument {
    pub language: String,
    pub settings: VerificationSettings,
    pub sources: BTreeMap<String, SourceFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationSettings {
    pub optimizer: OptimizerSettings,
}

impl VerificationDocument {
    pub fn from_metadata(metadata: &ContractMetadata) -> Self {
        Self {
            language: metadata.language.clone(),
            settings: VerificationSettings {
                optimizer: metadata.settings.optimizer.clone(),
            },
            sources: metadata.sources.clone(),
        }
    }

    /// Where the document for `artifact` is written:
    /// `<dir>/etherscan/<name>.solcinput.json` for `<dir>/<name>.json`
    pub fn output_path(artifact: &Path) -> PathBuf {
        let dir = artifact.parent().unwrap_or_else(|| Path::new(""));
        let file_name = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = file_name
            .strip_suffix(ARTIFACT_SUFFIX)
            .unwrap_or(file_name.as_str());

        dir.join(VERIFICATION_DIR)
            .join(format!("{}{}", stem, DOCUMENT_SUFFIX))
    }

    /// Serialize as indented JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document beside `artifact`, overwriting any previous one
    pub fn write_beside(&self, artifact: &Path) -> Result<PathBuf> {
        let path = Self::output_path(artifact);

        if let Some(dir) = path.parent() {
            create_private_dir(dir)?;
        }

        std::fs::write(&path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "wrote verification document");

        Ok(path)
    }
}

/// Create `dir` (and parents) readable by the owner only, if it does not exist
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder.create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ContractMetadata {
        ContractMetadata::decode(
            r#"{
                "compiler": { "version": "0.8.19+commit.7dd6d404" },
                "language": "Solidity",
                "settings": {
                    "compilationTarget": { "contracts/Foo.sol": "Foo" },
                    "evmVersion": "paris",
                    "optimizer": { "enabled": true, "runs": 200 }
                },
                "sources": {
                    "contracts/Foo.sol": { "content": "contract Foo {}", "keccak256": "0x01" }
                }
            }"#,
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            VerificationDocument::output_path(Path::new("deployments/mainnet/River.json")),
            PathBuf::from("deployments/mainnet/etherscan/River.solcinput.json")
        );
    }

    #[test]
    fn test_output_path_without_json_suffix() {
        assert_eq!(
            VerificationDocument::output_path(Path::new("out/River")),
            PathBuf::from("out/etherscan/River.solcinput.json")
        );
    }

    #[test]
    fn test_output_path_keeps_json_in_directories() {
        assert_eq!(
            VerificationDocument::output_path(Path::new("a.json.d/Token.json")),
            PathBuf::from("a.json.d/etherscan/Token.solcinput.json")
        );
    }

    #[test]
    fn test_document_shape() {
        let document = VerificationDocument::from_metadata(&metadata());
        let value: serde_json::Value =
            serde_json::from_str(&document.to_json().unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "language": "Solidity",
                "settings": { "optimizer": { "enabled": true, "runs": 200 } },
                "sources": { "contracts/Foo.sol": { "content": "contract Foo {}" } }
            })
        );
    }

    #[test]
    fn test_document_is_indented() {
        let json = VerificationDocument::from_metadata(&metadata())
            .to_json()
            .unwrap();
        assert!(json.starts_with("{\n  \"language\": \"Solidity\""));
    }

    #[test]
    fn test_write_beside_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("Foo.json");

        let written = VerificationDocument::from_metadata(&metadata())
            .write_beside(&artifact)
            .unwrap();

        assert_eq!(written, dir.path().join("etherscan").join("Foo.solcinput.json"));
        assert!(written.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(dir.path().join("etherscan"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o077, 0);
        }
    }

    #[test]
    fn test_write_beside_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("Foo.json");
        let target = VerificationDocument::output_path(&artifact);

        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "stale").unwrap();

        VerificationDocument::from_metadata(&metadata())
            .write_beside(&artifact)
            .unwrap();

        let content = std::fs::read_to_string(&target).unwrap();
        assert!(content.contains("contract Foo {}"));
    }
}
