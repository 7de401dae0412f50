//! VMAX / Symmetrix connector over the Unisphere REST API
//!
//! Request paths are relative to `https://{address}:8443/univmax/restapi`.
//! VMAX-2 arrays answer under the `provisioning` node, VMAX-3 arrays under
//! `sloprovisioning`; the model is read from the Symmetrix ID.

use super::expand::{self, ResourceSource};
use super::{unsupported, ResourceKind};
use crate::error::{Error, Result};
use crate::http::{Credentials, HttpClient, HttpClientConfig};
use crate::types::{Backend, JsonValue, RawResource};
use async_trait::async_trait;
use std::fmt;
use url::Url;

/// VMAX sub-variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VmaxModel {
    /// VMAX-2 (VMAX 10K/20K/40K)
    Vmax2,
    /// VMAX-3 and later (VMAX 100K/200K/400K, VMAX All Flash, PowerMax)
    Vmax3,
}

impl VmaxModel {
    /// Model encoded at characters `[5..7)` of a Symmetrix ID
    pub fn from_sym_id(sym_id: &str) -> Result<Self> {
        match sym_id.get(5..7) {
            Some("26" | "49" | "57" | "59" | "87") => Ok(VmaxModel::Vmax2),
            Some("67" | "68" | "70" | "72" | "75" | "77" | "78") => Ok(VmaxModel::Vmax3),
            _ => Err(Error::UnknownModel {
                sym_id: sym_id.to_string(),
            }),
        }
    }

    /// Unisphere provisioning node
    pub fn node(self) -> &'static str {
        match self {
            VmaxModel::Vmax2 => "provisioning",
            VmaxModel::Vmax3 => "sloprovisioning",
        }
    }
}

impl fmt::Display for VmaxModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmaxModel::Vmax2 => write!(f, "VMAX-2"),
            VmaxModel::Vmax3 => write!(f, "VMAX-3"),
        }
    }
}

/// Path segment, listing key and detail key of a listable resource
struct Listing {
    segment: &'static str,
    list_key: &'static str,
    detail_key: &'static str,
}

impl Listing {
    const fn new(segment: &'static str, list_key: &'static str, detail_key: &'static str) -> Self {
        Self {
            segment,
            list_key,
            detail_key,
        }
    }

    fn of(kind: ResourceKind, model: VmaxModel) -> Result<Self> {
        let listing = match (kind, model) {
            (ResourceKind::Host, _) => Listing::new("host", "hostId", "host"),
            (ResourceKind::HostGroup, _) => Listing::new("hostgroup", "hostGroupId", "hostGroup"),
            (ResourceKind::Initiator, _) => Listing::new("initiator", "initiatorId", "initiator"),
            (ResourceKind::MaskingView, _) => {
                Listing::new("maskingview", "maskingViewId", "maskingView")
            }
            (ResourceKind::PortGroup, _) => Listing::new("portgroup", "portGroupId", "portGroup"),
            (ResourceKind::StorageGroup, _) => {
                Listing::new("storagegroup", "storageGroupId", "storageGroup")
            }
            (ResourceKind::Volume, _) => Listing::new("volume", "volumeId", "volume"),
            (ResourceKind::FastPolicy, VmaxModel::Vmax2) => {
                Listing::new("fastpolicy", "fastPolicyId", "fastPolicy")
            }
            (ResourceKind::ThinPool, VmaxModel::Vmax2) => Listing::new("thinpool", "poolId", "thinPool"),
            (ResourceKind::Srp, VmaxModel::Vmax3) => Listing::new("srp", "srpId", "srp"),
            (other, model) => return Err(unsupported(model, other)),
        };
        Ok(listing)
    }
}

/// Builds the right [`VmaxArray`] variant from a Symmetrix ID
pub struct VmaxFactory;

impl VmaxFactory {
    /// Unisphere REST root for a management host
    pub fn base_url(address: &str, port: u16) -> Result<String> {
        let url = Url::parse(&format!("https://{address}:{port}/univmax/restapi"))?;
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Create the connector for `sym_id`.
    ///
    /// Fails with [`Error::UnknownModel`] when the ID does not encode a known
    /// model; nothing is sent to the array in that case.
    pub fn create(
        sym_id: &str,
        http: HttpClientConfig,
        user: &str,
        password: &str,
    ) -> Result<VmaxArray> {
        let model = VmaxModel::from_sym_id(sym_id)?;
        let client = HttpClient::with_config(http)?
            .with_credentials(Credentials::basic(user, password))
            .with_target(format!("{}({sym_id})", Backend::Vmax));

        Ok(VmaxArray {
            sym_id: sym_id.to_string(),
            model,
            client,
        })
    }
}

/// One VMAX array reached through Unisphere
#[derive(Debug)]
pub struct VmaxArray {
    sym_id: String,
    model: VmaxModel,
    client: HttpClient,
}

impl VmaxArray {
    /// Symmetrix ID
    pub fn sym_id(&self) -> &str {
        &self.sym_id
    }

    /// Sub-variant
    pub fn model(&self) -> VmaxModel {
        self.model
    }

    fn root(&self) -> String {
        format!("{}/symmetrix/{}", self.model.node(), self.sym_id)
    }

    /// GET `path` and decode it, detecting rejected credentials
    async fn get(&self, path: &str) -> Result<JsonValue> {
        let response = self.client.get(path).await?;

        if response.status == 401 || response.body.contains("Unauthorized") {
            return Err(Error::auth(self.client.target(), "Authentication failure"));
        }

        match response.json() {
            Ok(body) => Ok(body),
            Err(_) if !response.is_success() => {
                Err(Error::http_status(response.status, response.body))
            }
            Err(e) => Err(e),
        }
    }

    /// `{node}/symmetrix/{id}` → `symmetrix[0]`
    pub async fn system(&self) -> Result<RawResource> {
        let path = self.root();
        let body = self.get(&path).await?;
        body.get("symmetrix")
            .and_then(|v| v.get(0))
            .cloned()
            .ok_or_else(|| Error::malformed(format!("no symmetrix record in {path}")))
    }

    /// Every record of `kind`, one detail request per item
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<RawResource>> {
        let listing = Listing::of(kind, self.model)?;
        let path = format!("{}/{}", self.root(), listing.segment);

        if kind == ResourceKind::Volume {
            return expand::expand_volumes(self, &path).await;
        }
        expand::expand_listing(self, &path, listing.list_key, listing.detail_key).await
    }

    /// The detail record of one item
    pub async fn detail(&self, kind: ResourceKind, id: &str) -> Result<RawResource> {
        let listing = Listing::of(kind, self.model)?;
        let path = format!("{}/{}/{id}", self.root(), listing.segment);
        let body = self.get(&path).await?;

        body.get(listing.detail_key)
            .and_then(|v| v.get(0))
            .cloned()
            .ok_or_else(|| Error::malformed(format!("no '{}' record in {path}", listing.detail_key)))
    }

    /// Unisphere version, e.g. `V9.1.0.5`
    pub async fn version(&self) -> Result<Option<String>> {
        let body = self.get("system/version").await?;
        Ok(body
            .get("version")
            .and_then(JsonValue::as_str)
            .map(str::to_string))
    }
}

#[async_trait]
impl ResourceSource for VmaxArray {
    async fn fetch(&self, path: &str) -> Result<JsonValue> {
        self.get(path).await
    }
}
