//! Remote API abstraction
//!
//! The [`ContractApi`] trait is the seam between the upload pipeline and the
//! platform client. The CLI provides an HTTP implementation; tests use an
//! in-memory one.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::payload::{RenameRequest, UploadRequest};
use crate::types::{NetworkId, ProjectSlug};

/// Application-level error returned by the platform in an otherwise valid response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub slug: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.slug.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({})", self.message, self.slug)
        }
    }
}

/// Contract record created by an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedContract {
    #[serde(default, rename = "contract_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub contracts: Vec<UploadedContract>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RenameResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl fmt::Display for UploadedContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match &self.address {
            Some(address) => write!(f, "{} at {}", name, address),
            None => write!(f, "{}", name),
        }
    }
}

/// Authenticated user as reported by the identity call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Principal {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{} <{}>", self.username, email),
            None => write!(f, "{}", self.username),
        }
    }
}

/// Operations of the contract platform used by the uploader
///
/// Implementations report transport failures as [`Error::RemoteTransport`] and return
/// decoded responses as-is; interpreting the `error` field is the caller's job.
///
/// [`Error::RemoteTransport`]: crate::Error::RemoteTransport
#[async_trait]
pub trait ContractApi: Send + Sync {
    /// Confirm authentication
    async fn who_am_i(&self) -> Result<Principal>;

    /// Create the contract records for an upload
    async fn upload_contracts(
        &self,
        request: &UploadRequest,
        project: &ProjectSlug,
    ) -> Result<UploadResponse>;

    /// Set the display name of a deployed contract
    async fn rename_contract(
        &self,
        request: &RenameRequest,
        project: &ProjectSlug,
        network_id: &NetworkId,
        address: &str,
    ) -> Result<RenameResponse>;
}
