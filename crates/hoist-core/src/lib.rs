pub mod api;
pub mod artifact;
pub mod batch;
pub mod error;
pub mod metadata;
pub mod payload;
pub mod project;
pub mod sources;
pub mod types;
pub mod upload;
pub mod verification;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ContractApi, Principal, RenameResponse, UploadResponse, UploadedContract};
pub use artifact::CompiledArtifact;
pub use batch::{
    run_batch, BatchObserver, BatchOptions, BatchReport, ContractFailure, ContractSuccess,
    FailurePolicy,
};
pub use error::{DecodeTarget, Error, Result};
pub use metadata::{derive_compiler_version, ContractMetadata, OptimizerSettings};
pub use payload::{RenameRequest, UploadConfig, UploadRequest};
pub use project::{ContractEntry, Project, ProjectsConfig};
pub use sources::{build_source_entries, ContractCompiler, ContractNetwork, ContractSourceEntry};
pub use types::*;
pub use upload::{prepare_upload, PreparedUpload, UploadOutcome, Uploader};
pub use verification::{VerificationDocument, VERIFICATION_DIR};
