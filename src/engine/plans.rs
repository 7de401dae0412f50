//! Collection plans of each backend, in sheet order

use super::types::{Gate, IdentityColumn, IdentitySource, IdentityStep, Plan, Step};
use crate::connector::ResourceKind;
use crate::projection::{svc, vmax, vplex, Schema};
use crate::types::Backend;

const fn step(category: &'static str, kind: ResourceKind, schema: &'static Schema) -> Step {
    Step {
        category,
        kind,
        schema,
        gate: Gate::Always,
    }
}

const fn gated(category: &'static str, kind: ResourceKind, schema: &'static Schema, gate: Gate) -> Step {
    Step {
        category,
        kind,
        schema,
        gate,
    }
}

/// SVC: `System` first, every later record prefixed with the system name
pub static SVC: Plan = Plan {
    identity: IdentityStep {
        category: "System",
        source: IdentitySource::System,
        schema: &svc::SYSTEM,
        column: Some(IdentityColumn {
            label: "System",
            source: "Name",
        }),
    },
    steps: &[
        step("Volumes", ResourceKind::VirtualDisk, &svc::VDISK),
        step("Pools", ResourceKind::ManagedDiskGroup, &svc::MDISK_GROUP),
        step("Managed disks", ResourceKind::ManagedDisk, &svc::MDISK),
        step("Mapping", ResourceKind::HostMapping, &svc::HOST_MAPPING),
        step("Hosts", ResourceKind::Host, &svc::HOST),
        step("Fabric", ResourceKind::Fabric, &svc::FABRIC),
        step("Controller", ResourceKind::Controller, &svc::CONTROLLER),
        step("Nodes", ResourceKind::Node, &svc::NODE),
        step("Users", ResourceKind::User, &svc::USER),
    ],
};

/// VMAX: `Arrays` first, every later record prefixed with the Symmetrix ID
pub static VMAX: Plan = Plan {
    identity: IdentityStep {
        category: "Arrays",
        source: IdentitySource::System,
        schema: &vmax::SYSTEM,
        column: Some(IdentityColumn {
            label: "Symmetrix Id",
            source: "symmetrixId",
        }),
    },
    steps: &[
        gated("ThinPools", ResourceKind::ThinPool, &vmax::THIN_POOL, Gate::Vmax2),
        gated("SRPs", ResourceKind::Srp, &vmax::SRP, Gate::Vmax3),
        step("TDEVs", ResourceKind::Volume, &vmax::THIN_DEVICE),
        step("WWNs", ResourceKind::Initiator, &vmax::INITIATOR),
        step("Masking Views", ResourceKind::MaskingView, &vmax::MASKING_VIEW),
        step("InitiatorGroup", ResourceKind::Host, &vmax::HOST),
        step("InitiatorGroupCascaded", ResourceKind::HostGroup, &vmax::HOST_GROUP),
        step("PortGroups", ResourceKind::PortGroup, &vmax::PORT_GROUP),
        step("StorageGroups", ResourceKind::StorageGroup, &vmax::STORAGE_GROUP),
        gated("FAST Policies", ResourceKind::FastPolicy, &vmax::FAST_POLICY, Gate::Vmax2),
    ],
};

/// VPLEX: `Clusters` first; records carry their own `Cluster` column
pub static VPLEX: Plan = Plan {
    identity: IdentityStep {
        category: "Clusters",
        source: IdentitySource::List(ResourceKind::Cluster),
        schema: &vplex::CLUSTERS,
        column: None,
    },
    steps: &[
        step("Virtual Volumes", ResourceKind::VirtualVolume, &vplex::VIRTUAL_VOLUME),
        step("Initiators", ResourceKind::Initiator, &vplex::INITIATOR),
        step("Storage Views", ResourceKind::StorageView, &vplex::STORAGE_VIEW),
        step("Storage Arrays", ResourceKind::LogicalUnit, &vplex::STORAGE_ARRAY),
    ],
};

impl Plan {
    /// The plan of a backend family
    pub fn for_backend(backend: Backend) -> &'static Plan {
        match backend {
            Backend::Svc => &SVC,
            Backend::Vmax => &VMAX,
            Backend::Vplex => &VPLEX,
        }
    }

    /// Every category this plan may write, identity first
    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.identity.category).chain(self.steps.iter().map(|s| s.category))
    }
}
