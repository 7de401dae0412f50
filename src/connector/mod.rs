//! Resource connector module
//!
//! One connector per array, holding one live transport session for the run.
//!
//! # Overview
//!
//! The connector module provides:
//! - `Connector` - closed set of backends, dispatched on the variant tag
//! - `ResourceKind` - the resources a backend may list or describe
//! - `SvcConnector` - SVC CLI commands over a [`CommandChannel`]
//! - `VmaxArray` / `VmaxFactory` - Unisphere REST, VMAX-2 or VMAX-3
//! - `VplexConnector` - VPLEX REST with wildcard paths
//!
//! Every operation returns raw backend-shaped records; projection into
//! tabular rows happens in [`crate::projection`].
//!
//! [`CommandChannel`]: crate::transport::CommandChannel

pub mod expand;
mod svc;
mod vmax;
mod vplex;

pub use svc::SvcConnector;
pub use vmax::{VmaxArray, VmaxFactory, VmaxModel};
pub use vplex::VplexConnector;

use crate::config::{ArrayEndpoint, Settings};
use crate::error::{Error, Result};
use crate::transport::{SshChannel, SshOptions};
use crate::types::{Backend, RawResource};
use std::fmt;

/// A resource a connector knows how to list and describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    // SVC
    Controller,
    Fabric,
    HostMapping,
    Node,
    ManagedDisk,
    ManagedDiskGroup,
    User,
    VirtualDisk,
    // Shared between backends
    Host,
    Initiator,
    // VMAX
    HostGroup,
    MaskingView,
    PortGroup,
    StorageGroup,
    FastPolicy,
    ThinPool,
    Srp,
    Volume,
    // VPLEX
    Cluster,
    LogicalUnit,
    StorageView,
    VirtualVolume,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Controller => "controller",
            ResourceKind::Fabric => "fabric",
            ResourceKind::HostMapping => "host mapping",
            ResourceKind::Node => "node",
            ResourceKind::ManagedDisk => "mdisk",
            ResourceKind::ManagedDiskGroup => "mdisk group",
            ResourceKind::User => "user",
            ResourceKind::VirtualDisk => "vdisk",
            ResourceKind::Host => "host",
            ResourceKind::Initiator => "initiator",
            ResourceKind::HostGroup => "host group",
            ResourceKind::MaskingView => "masking view",
            ResourceKind::PortGroup => "port group",
            ResourceKind::StorageGroup => "storage group",
            ResourceKind::FastPolicy => "FAST policy",
            ResourceKind::ThinPool => "thin pool",
            ResourceKind::Srp => "SRP",
            ResourceKind::Volume => "volume",
            ResourceKind::Cluster => "cluster",
            ResourceKind::LogicalUnit => "logical unit",
            ResourceKind::StorageView => "storage view",
            ResourceKind::VirtualVolume => "virtual volume",
        };
        f.write_str(name)
    }
}

pub(crate) fn unsupported(backend: impl fmt::Display, kind: ResourceKind) -> Error {
    Error::UnsupportedResource {
        backend: backend.to_string(),
        resource: kind.to_string(),
    }
}

/// A live connection to one array
#[derive(Debug)]
pub enum Connector {
    /// SVC / FlashSystem over SSH
    Svc(SvcConnector),
    /// VMAX over Unisphere REST
    Vmax(VmaxArray),
    /// VPLEX over REST
    Vplex(VplexConnector),
}

impl Connector {
    /// Open a connector of the given backend family for `endpoint`.
    ///
    /// SVC authenticates here; the REST backends authenticate on every
    /// request, so their credentials are only checked on the first call.
    pub async fn open(backend: Backend, endpoint: &ArrayEndpoint, settings: &Settings) -> Result<Self> {
        let port = endpoint.port_or(backend.default_port());

        match backend {
            Backend::Svc => {
                let channel = SshChannel::connect(SshOptions {
                    address: endpoint.address.clone(),
                    port,
                    user: endpoint.user.clone(),
                    password: endpoint.password.clone(),
                    timeout: settings.timeout(),
                })
                .await?;
                Ok(Connector::Svc(SvcConnector::new(
                    channel,
                    format!("SVC({})", endpoint.address),
                )))
            }
            Backend::Vmax => {
                let base_url = VmaxFactory::base_url(&endpoint.address, port)?;
                let array = VmaxFactory::create(
                    &endpoint.name,
                    settings.http_config(base_url),
                    &endpoint.user,
                    &endpoint.password,
                )?;
                Ok(Connector::Vmax(array))
            }
            Backend::Vplex => {
                let base_url = VplexConnector::base_url(&endpoint.address, port)?;
                let connector = VplexConnector::new(
                    settings.http_config(base_url),
                    &endpoint.user,
                    &endpoint.password,
                )?;
                Ok(Connector::Vplex(connector))
            }
        }
    }

    /// Backend family of this connector
    pub fn backend(&self) -> Backend {
        match self {
            Connector::Svc(_) => Backend::Svc,
            Connector::Vmax(_) => Backend::Vmax,
            Connector::Vplex(_) => Backend::Vplex,
        }
    }

    /// VMAX sub-variant, `None` for other backends
    pub fn vmax_model(&self) -> Option<VmaxModel> {
        match self {
            Connector::Vmax(array) => Some(array.model()),
            _ => None,
        }
    }

    /// The array-level description record
    pub async fn system(&self) -> Result<RawResource> {
        match self {
            Connector::Svc(c) => c.system().await,
            Connector::Vmax(c) => c.system().await,
            Connector::Vplex(c) => c.system().await,
        }
    }

    /// Every record of `kind`, fully described
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<RawResource>> {
        match self {
            Connector::Svc(c) => c.list(kind).await,
            Connector::Vmax(c) => c.list(kind).await,
            Connector::Vplex(c) => c.list(kind).await,
        }
    }

    /// The detail record of one item of `kind`
    pub async fn detail(&self, kind: ResourceKind, id: &str) -> Result<RawResource> {
        match self {
            Connector::Svc(c) => c.detail(kind, id).await,
            Connector::Vmax(c) => c.detail(kind, id).await,
            Connector::Vplex(c) => c.detail(kind, id).await,
        }
    }

    /// Firmware or API version, when the backend exposes one
    pub async fn version(&self) -> Result<Option<String>> {
        match self {
            Connector::Svc(c) => c.version().await,
            Connector::Vmax(c) => c.version().await,
            Connector::Vplex(_) => Ok(None),
        }
    }

    /// Release the transport session
    pub async fn close(&self) -> Result<()> {
        match self {
            Connector::Svc(c) => c.close().await,
            Connector::Vmax(_) | Connector::Vplex(_) => Ok(()),
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connector::Svc(c) => f.write_str(c.target()),
            Connector::Vmax(c) => f.write_str(c.sym_id()),
            Connector::Vplex(c) => f.write_str(c.target()),
        }
    }
}
