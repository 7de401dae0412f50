//! VPLEX connector
//!
//! The VPLEX REST interface expands `*` path segments server-side: one request
//! returns every matching object under `response.context`.

use super::{unsupported, ResourceKind};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::{Backend, JsonValue, RawResource};
use tracing::debug;
use url::Url;

const AUTH_FAILURE: &str = "User authentication failed.";

/// Connector for a VPLEX management server
#[derive(Debug)]
pub struct VplexConnector {
    client: HttpClient,
    target: String,
}

impl VplexConnector {
    /// REST root for a management host
    pub fn base_url(address: &str, port: u16) -> Result<String> {
        let url = Url::parse(&format!("https://{address}:{port}/vplex"))?;
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Create a connector; credentials travel as request headers
    pub fn new(http: HttpClientConfig, user: &str, password: &str) -> Result<Self> {
        let target = format!("VPlex({})", http.base_url.as_deref().unwrap_or_default());

        let mut http = http;
        http.default_headers
            .insert("Username".to_string(), user.to_string());
        http.default_headers
            .insert("Password".to_string(), password.to_string());
        http.default_headers
            .insert("Accept".to_string(), "application/json;format=1".to_string());

        let client = HttpClient::with_config(http)?.with_target(target.clone());
        Ok(Self { client, target })
    }

    /// Label used in logs, e.g. `VPlex(https://10.0.0.20:443/vplex)`
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Wildcard path listing `kind`
    pub fn path(kind: ResourceKind) -> Result<&'static str> {
        let path = match kind {
            ResourceKind::Cluster => "clusters/*",
            ResourceKind::Initiator => "clusters/*/exports/initiator-ports/*",
            ResourceKind::LogicalUnit => {
                "clusters/*/storage-elements/storage-arrays/*/logical-units/*"
            }
            ResourceKind::StorageView => "clusters/*/exports/storage-views/*",
            ResourceKind::VirtualVolume => "clusters/*/virtual-volumes/*",
            other => return Err(unsupported(Backend::Vplex, other)),
        };
        Ok(path)
    }

    /// GET `path` and return `response.context`
    async fn request(&self, path: &str) -> Result<Vec<RawResource>> {
        let response = self.client.get(path).await?;

        let body = match response.json() {
            Ok(body) => body,
            Err(_) if !response.is_success() => {
                return Err(Error::http_status(response.status, response.body));
            }
            Err(e) => return Err(e),
        };

        let envelope = body
            .get("response")
            .ok_or_else(|| Error::malformed(format!("no 'response' object in {path}")))?;

        let message = envelope
            .get("message")
            .and_then(JsonValue::as_str)
            .unwrap_or_default();
        if message.contains(AUTH_FAILURE) {
            return Err(Error::auth(&self.target, "Authentication failure"));
        }

        match envelope.get("context") {
            Some(JsonValue::Array(items)) => Ok(items.clone()),
            Some(JsonValue::Null) | None if message.is_empty() => {
                debug!("Empty context for {path}");
                Ok(Vec::new())
            }
            Some(JsonValue::Null) | None => Err(Error::malformed(format!(
                "{path} answered without context: {message}"
            ))),
            Some(other) => Err(Error::malformed(format!(
                "context of {path} is not a list: {other}"
            ))),
        }
    }

    /// The first cluster
    pub async fn system(&self) -> Result<RawResource> {
        self.request(Self::path(ResourceKind::Cluster)?)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed(format!("{} reports no cluster", self.target)))
    }

    /// Every object matching the wildcard path of `kind`
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<RawResource>> {
        self.request(Self::path(kind)?).await
    }

    /// The object named `id`: the trailing wildcard is replaced by the name
    pub async fn detail(&self, kind: ResourceKind, id: &str) -> Result<RawResource> {
        let wildcard = Self::path(kind)?;
        let prefix = wildcard.strip_suffix('*').unwrap_or(wildcard);
        let path = format!("{prefix}{id}");

        self.request(&path)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::malformed(format!("no {kind} named '{id}' at {path}")))
    }
}
