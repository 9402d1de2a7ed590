//! HTTP implementation of the platform API

use async_trait::async_trait;
use hoist_core::{
    ContractApi, DecodeTarget, Error, NetworkId, Principal, ProjectSlug, RenameRequest,
    RenameResponse, Result, UploadRequest, UploadResponse,
};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AuthConfig;

const ACCESS_KEY_HEADER: &str = "X-Access-Key";

/// Identity call response
#[derive(Debug, Deserialize)]
struct UserResponse {
    user: Principal,
}

/// Tenderly REST client
///
/// No retries and no timeouts: a failed call surfaces as
/// [`Error::RemoteTransport`] and ends the contract being processed.
#[derive(Debug, Clone)]
pub struct TenderlyClient {
    http: Client,
    api_url: String,
    access_key: String,
}

impl TenderlyClient {
    pub fn new(auth: &AuthConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("hoist/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::RemoteTransport(e.to_string()))?;

        Ok(Self {
            http,
            api_url: auth.api_url.clone(),
            access_key: auth.access_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path)
    }

    fn contracts_path(project: &ProjectSlug) -> String {
        let (account, project) = project.account_and_project();
        format!("api/v1/account/{}/project/{}/contracts", account, project)
    }

    fn rename_path(project: &ProjectSlug, network_id: &NetworkId, address: &str) -> String {
        let (account, project) = project.account_and_project();
        format!(
            "api/v1/account/{}/project/{}/contract/{}/{}/rename",
            account, project, network_id, address
        )
    }

    /// Send a request and decode the body
    ///
    /// Error responses are decoded too when their JSON body carries an `error` object,
    /// since the platform reports application errors that way. Any other error response is
    /// a transport failure. An empty success body decodes as `T::default()`.
    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = self.url(path);
        tracing::debug!(%method, %url, "request");

        let mut request = self
            .http
            .request(method, &url)
            .header(ACCESS_KEY_HEADER, &self.access_key);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::RemoteTransport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::RemoteTransport(e.to_string()))?;

        tracing::debug!(%status, bytes = text.len(), "response");
        decode_body(status, &text)
    }
}

fn decode_body<T>(status: StatusCode, text: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if text.trim().is_empty() {
        return if status.is_success() {
            Ok(T::default())
        } else {
            Err(Error::RemoteTransport(format!("HTTP {}", status)))
        };
    }

    if status.is_success() {
        return serde_json::from_str(text).map_err(|e| Error::decode(DecodeTarget::Response, e));
    }

    // A failed status only decodes when the body carries an application `error`
    let application_error = serde_json::from_str::<Value>(text)
        .ok()
        .filter(|body| body.get("error").is_some_and(|e| !e.is_null()));

    match application_error.map(serde_json::from_value::<T>) {
        Some(Ok(value)) => Ok(value),
        _ => Err(Error::RemoteTransport(format!(
            "HTTP {}: {}",
            status,
            text.trim()
        ))),
    }
}

#[async_trait]
impl ContractApi for TenderlyClient {
    async fn who_am_i(&self) -> Result<Principal> {
        let response: Option<UserResponse> = self
            .send::<(), _>(Method::GET, "api/v1/user", None)
            .await?;

        response
            .map(|r| r.user)
            .ok_or_else(|| Error::RemoteTransport("empty identity response".to_string()))
    }

    async fn upload_contracts(
        &self,
        request: &UploadRequest,
        project: &ProjectSlug,
    ) -> Result<UploadResponse> {
        self.send(Method::POST, &Self::contracts_path(project), Some(request))
            .await
    }

    async fn rename_contract(
        &self,
        request: &RenameRequest,
        project: &ProjectSlug,
        network_id: &NetworkId,
        address: &str,
    ) -> Result<RenameResponse> {
        self.send(
            Method::POST,
            &Self::rename_path(project, network_id, address),
            Some(request),
        )
        .await
    }
}
