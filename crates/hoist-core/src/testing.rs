//! Test helpers: artifact fixtures and an in-memory [`ContractApi`]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{
    ApiError, ContractApi, Principal, RenameResponse, UploadResponse, UploadedContract,
};
use crate::error::{Error, Result};
use crate::payload::{RenameRequest, UploadRequest};
use crate::types::{NetworkId, ProjectSlug};

/// Metadata with two sources, `contracts/Token.sol` being the compilation target
pub const TOKEN_METADATA: &str = r#"{
    "compiler": { "version": "0.8.19+commit.7dd6d404" },
    "language": "Solidity",
    "output": { "abi": [] },
    "settings": {
        "compilationTarget": { "contracts/Token.sol": "Token" },
        "evmVersion": "paris",
        "libraries": {},
        "metadata": { "bytecodeHash": "ipfs" },
        "optimizer": { "enabled": true, "runs": 200 },
        "remappings": []
    },
    "sources": {
        "@openzeppelin/contracts/token/ERC20/ERC20.sol": {
            "content": "abstract contract ERC20 {}",
            "keccak256": "0x01",
            "license": "MIT"
        },
        "contracts/Token.sol": {
            "content": "import '@openzeppelin/contracts/token/ERC20/ERC20.sol'; contract Token is ERC20 {}",
            "keccak256": "0x02",
            "license": "MIT"
        }
    },
    "version": 1
}"#;

/// Write a hardhat-deploy style artifact into `dir`
pub fn write_artifact(dir: &Path, file_name: &str, address: &str, metadata: &str) -> PathBuf {
    let artifact = serde_json::json!({
        "address": address,
        "abi": [],
        "bytecode": "0x6080604052",
        "metadata": metadata,
    });

    let path = dir.join(file_name);
    std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();
    path
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    WhoAmI,
    Upload {
        project: String,
        request: UploadRequest,
    },
    Rename {
        project: String,
        network_id: String,
        address: String,
        display_name: String,
    },
}

#[derive(Debug, Clone, Copy, Default)]
enum Failure {
    #[default]
    None,
    Transport,
    Application(&'static str),
}

impl Failure {
    fn check(&self) -> Result<Option<ApiError>> {
        match self {
            Failure::None => Ok(None),
            Failure::Transport => Err(Error::RemoteTransport("connection refused".into())),
            Failure::Application(slug) => Ok(Some(ApiError {
                message: format!("{} failure", slug),
                slug: slug.to_string(),
            })),
        }
    }
}

/// Records every call and answers with canned responses
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<RecordedCall>>,
    upload_failure: Failure,
    rename_failure: Failure,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_upload_with(mut self, slug: &'static str) -> Self {
        self.upload_failure = Failure::Application(slug);
        self
    }

    pub fn fail_upload_transport(mut self) -> Self {
        self.upload_failure = Failure::Transport;
        self
    }

    pub fn fail_rename_with(mut self, slug: &'static str) -> Self {
        self.rename_failure = Failure::Application(slug);
        self
    }

    pub fn fail_rename_transport(mut self) -> Self {
        self.rename_failure = Failure::Transport;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContractApi for RecordingApi {
    async fn who_am_i(&self) -> Result<Principal> {
        self.record(RecordedCall::WhoAmI);
        Ok(Principal {
            username: "tester".to_string(),
            email: None,
        })
    }

    async fn upload_contracts(
        &self,
        request: &UploadRequest,
        project: &ProjectSlug,
    ) -> Result<UploadResponse> {
        self.record(RecordedCall::Upload {
            project: project.to_string(),
            request: request.clone(),
        });

        let error = self.upload_failure.check()?;
        let contracts = request
            .deployed_contracts()
            .map(|c| UploadedContract {
                name: c.contract_name.clone(),
                address: c.networks.values().next().map(|n| n.address.clone()),
                network_id: c.networks.keys().next().map(|n| n.to_string()),
            })
            .collect();

        Ok(UploadResponse { contracts, error })
    }

    async fn rename_contract(
        &self,
        request: &RenameRequest,
        project: &ProjectSlug,
        network_id: &NetworkId,
        address: &str,
    ) -> Result<RenameResponse> {
        self.record(RecordedCall::Rename {
            project: project.to_string(),
            network_id: network_id.to_string(),
            address: address.to_string(),
            display_name: request.display_name.clone(),
        });

        Ok(RenameResponse {
            error: self.rename_failure.check()?,
        })
    }
}
