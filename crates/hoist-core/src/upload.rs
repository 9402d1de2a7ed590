//! Per-contract upload pipeline
//!
//! [`prepare_upload`] turns one configured artifact into an [`UploadRequest`] (writing the
//! verification document on the way), and [`Uploader`] submits it: create the contract
//! records, then rename the deployed one when a display name is configured.
//!
//! Both steps record the stage they reached in a caller-owned [`Stage`], so a failure
//! can be reported against the step that produced it.

use std::path::PathBuf;

use crate::api::{ContractApi, UploadedContract};
use crate::artifact::CompiledArtifact;
use crate::error::{Error, Result};
use crate::payload::{RenameRequest, UploadRequest};
use crate::project::ContractEntry;
use crate::sources::build_source_entries;
use crate::types::{NetworkId, ProjectSlug, Stage};
use crate::verification::VerificationDocument;

/// Upload request for one artifact, ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedUpload {
    pub artifact_path: PathBuf,
    /// Deployed address from the artifact, used to address the rename
    pub address: String,
    pub request: UploadRequest,
    pub verification_path: Option<PathBuf>,
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub contracts: Vec<UploadedContract>,
    pub renamed_to: Option<String>,
}

/// Read, decode and build the upload for `entry`
///
/// Artifacts without metadata produce no verification document and fail with
/// [`Error::MissingOptimizerSettings`]: the compiler configuration has no source.
pub fn prepare_upload(
    entry: &ContractEntry,
    network_id: &NetworkId,
    stage: &mut Stage,
) -> Result<PreparedUpload> {
    *stage = Stage::ReadingArtifact;
    let artifact = CompiledArtifact::read(&entry.path)?;

    *stage = Stage::Decoding;
    let metadata = artifact.decode_metadata()?;

    *stage = Stage::BuildingPayload;
    let Some(metadata) = metadata else {
        tracing::warn!(path = %entry.path.display(), "artifact has no metadata");
        return Err(Error::MissingOptimizerSettings("metadata"));
    };

    let verification_path =
        VerificationDocument::from_metadata(&metadata).write_beside(&entry.path)?;

    let contracts = build_source_entries(&metadata, &artifact.address, network_id);
    let request = UploadRequest::build(&metadata, contracts, entry.tag.as_deref())?;

    tracing::debug!(
        path = %entry.path.display(),
        sources = request.contracts.len(),
        "prepared upload"
    );

    Ok(PreparedUpload {
        artifact_path: entry.path.clone(),
        address: artifact.address,
        request,
        verification_path: Some(verification_path),
    })
}

/// Submits prepared uploads through a [`ContractApi`]
pub struct Uploader<'a, A: ContractApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: ContractApi + ?Sized> Uploader<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Create the contract records, then apply `display_name` if given
    ///
    /// A failed rename does not undo the create.
    pub async fn upload_contract(
        &self,
        prepared: &PreparedUpload,
        display_name: Option<&str>,
        project: &ProjectSlug,
        network_id: &NetworkId,
        stage: &mut Stage,
    ) -> Result<UploadOutcome> {
        *stage = Stage::Uploading;
        let contracts = self.create(&prepared.request, project).await?;

        let renamed_to = match display_name {
            Some(name) => {
                *stage = Stage::Renaming;
                self.rename(name, project, network_id, &prepared.address)
                    .await?;
                Some(name.to_string())
            }
            None => None,
        };

        *stage = Stage::Done;
        Ok(UploadOutcome {
            contracts,
            renamed_to,
        })
    }

    /// Contract-creation call; an `error` in the response fails the call
    pub async fn create(
        &self,
        request: &UploadRequest,
        project: &ProjectSlug,
    ) -> Result<Vec<UploadedContract>> {
        let response = self.api.upload_contracts(request, project).await?;

        if let Some(error) = response.error {
            return Err(Error::RemoteApplication(error));
        }

        tracing::info!(project = %project, contracts = response.contracts.len(), "uploaded");
        Ok(response.contracts)
    }

    /// Rename call addressed by project, network and deployed address
    pub async fn rename(
        &self,
        display_name: &str,
        project: &ProjectSlug,
        network_id: &NetworkId,
        address: &str,
    ) -> Result<()> {
        let request = RenameRequest::new(display_name);
        let response = self
            .api
            .rename_contract(&request, project, network_id, address)
            .await?;

        if let Some(error) = response.error {
            return Err(Error::RemoteApplication(error));
        }

        tracing::info!(project = %project, network = %network_id, address, display_name, "renamed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{write_artifact, RecordedCall, RecordingApi, TOKEN_METADATA};

    #[test]
    fn test_prepare_upload() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "Token.json", "0xABC", TOKEN_METADATA);

        let mut stage = Stage::ReadingArtifact;
        let prepared =
            prepare_upload(&ContractEntry::new(&path).with_tag("v1"), &"5".into(), &mut stage)
                .unwrap();

        assert_eq!(stage, Stage::BuildingPayload);
        assert_eq!(prepared.address, "0xABC");
        assert_eq!(prepared.request.tag, "v1");
        assert_eq!(prepared.request.contracts.len(), 2);
        assert_eq!(
            prepared.verification_path,
            Some(dir.path().join("etherscan").join("Token.solcinput.json"))
        );
    }

    #[test]
    fn test_prepare_without_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "Token.json", "0xABC", "");

        let mut stage = Stage::ReadingArtifact;
        let result = prepare_upload(&ContractEntry::new(&path), &"5".into(), &mut stage);

        assert!(matches!(
            result,
            Err(Error::MissingOptimizerSettings("metadata"))
        ));
        assert_eq!(stage, Stage::BuildingPayload);
        assert!(!dir.path().join("etherscan").exists());
    }

    #[test]
    fn test_prepare_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();

        let mut stage = Stage::ReadingArtifact;
        let result = prepare_upload(
            &ContractEntry::new(dir.path().join("Missing.json")),
            &"5".into(),
            &mut stage,
        );

        assert!(matches!(result, Err(Error::FileNotFound { .. })));
        assert_eq!(stage, Stage::ReadingArtifact);
    }

    #[test]
    fn test_prepare_malformed_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_artifact(dir.path(), "Token.json", "0xABC", "{ broken");

        let mut stage = Stage::ReadingArtifact;
        let result = prepare_upload(&ContractEntry::new(&path), &"5".into(), &mut stage);

        assert!(matches!(result, Err(Error::Decode { .. })));
        assert_eq!(stage, Stage::Decoding);
    }

    fn prepared(dir: &std::path::Path) -> PreparedUpload {
        let path = write_artifact(dir, "Token.json", "0xABC", TOKEN_METADATA);
        let mut stage = Stage::ReadingArtifact;
        prepare_upload(&ContractEntry::new(path), &"5".into(), &mut stage).unwrap()
    }

    #[tokio::test]
    async fn test_upload_without_rename() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepared(dir.path());
        let api = RecordingApi::new();

        let mut stage = Stage::BuildingPayload;
        let outcome = Uploader::new(&api)
            .upload_contract(&prepared, None, &"demo".into(), &"5".into(), &mut stage)
            .await
            .unwrap();

        assert_eq!(stage, Stage::Done);
        assert!(outcome.renamed_to.is_none());

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], RecordedCall::Upload { project, .. } if project == "demo"));
    }

    #[tokio::test]
    async fn test_upload_then_rename() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepared(dir.path());
        let api = RecordingApi::new();

        let mut stage = Stage::BuildingPayload;
        let outcome = Uploader::new(&api)
            .upload_contract(
                &prepared,
                Some("MyToken"),
                &"demo".into(),
                &"5".into(),
                &mut stage,
            )
            .await
            .unwrap();

        assert_eq!(outcome.renamed_to.as_deref(), Some("MyToken"));

        let calls = api.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            RecordedCall::Rename {
                project: "demo".to_string(),
                network_id: "5".to_string(),
                address: "0xABC".to_string(),
                display_name: "MyToken".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_application_error_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepared(dir.path());
        let api = RecordingApi::new().fail_upload_with("project_not_found");

        let mut stage = Stage::BuildingPayload;
        let result = Uploader::new(&api)
            .upload_contract(
                &prepared,
                Some("MyToken"),
                &"demo".into(),
                &"5".into(),
                &mut stage,
            )
            .await;

        match result {
            Err(Error::RemoteApplication(error)) => assert_eq!(error.slug, "project_not_found"),
            other => panic!("expected RemoteApplication, got {:?}", other),
        }
        assert_eq!(stage, Stage::Uploading);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rename_failure_keeps_upload() {
        let dir = tempfile::tempdir().unwrap();
        let prepared = prepared(dir.path());
        let api = RecordingApi::new().fail_rename_transport();

        let mut stage = Stage::BuildingPayload;
        let result = Uploader::new(&api)
            .upload_contract(
                &prepared,
                Some("MyToken"),
                &"demo".into(),
                &"5".into(),
                &mut stage,
            )
            .await;

        assert!(matches!(result, Err(Error::RemoteTransport(_))));
        assert_eq!(stage, Stage::Renaming);
        assert_eq!(api.calls().len(), 2);
    }
}
