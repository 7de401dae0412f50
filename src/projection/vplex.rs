//! VPLEX schemas
//!
//! Objects carry their location in `parent`
//! (`/clusters/<cluster>/storage-elements/storage-arrays/<array>/...`), from
//! which the cluster and array columns are taken.

use super::types::{FieldSpec, Label, Rule, Schema};

const fn cap(source: &'static str) -> FieldSpec {
    FieldSpec::new(source, Label::Capitalized, Rule::Required)
}

const CLUSTER: FieldSpec = FieldSpec::new("parent", Label::Named("Cluster"), Rule::PathSegment(2));
const NAME: FieldSpec = FieldSpec::new("name", Label::Named("Name"), Rule::Required);

/// Cluster
pub static CLUSTERS: Schema = Schema {
    name: "cluster",
    fan_out: None,
    fields: &[
        cap("name"),
        cap("top-level-assembly"),
        cap("health-state"),
        cap("operational-status"),
        cap("cluster-id"),
        cap("island-id"),
        cap("default-cache-mode"),
        cap("director-names"),
        cap("default-xcopy-template"),
    ],
};

/// Front-end initiator port
pub static INITIATOR: Schema = Schema {
    name: "initiator",
    fan_out: None,
    fields: &[
        CLUSTER,
        cap("name"),
        cap("node-wwn"),
        cap("port-wwn"),
        cap("suspend-on-detach"),
        cap("target-ports"),
    ],
};

/// Logical unit of a back-end storage array
pub static STORAGE_ARRAY: Schema = Schema {
    name: "storage array",
    fan_out: None,
    fields: &[
        CLUSTER,
        FieldSpec::new("parent", Label::Named("Array"), Rule::PathSegment(5)),
        cap("storage-volume"),
        cap("name"),
        cap("visibility"),
        cap("connectivity-status"),
        cap("alua-support"),
        cap("active-aao-visibility"),
        cap("luns"),
    ],
};

/// Storage view, one record per exported virtual volume
/// (`(lun,volume,naa,size)` members)
pub static STORAGE_VIEW: Schema = Schema {
    name: "storage view",
    fan_out: Some("virtual-volumes"),
    fields: &[
        CLUSTER,
        NAME,
        FieldSpec::new("virtual-volumes", Label::Named("LUN-ID"), Rule::Member(0)),
        FieldSpec::new("virtual-volumes", Label::Named("Volume"), Rule::Member(1)),
        FieldSpec::new("virtual-volumes", Label::Named("NAA"), Rule::Member(2)),
        FieldSpec::new("virtual-volumes", Label::Named("Size"), Rule::Member(3)),
        cap("operational-status"),
        cap("initiators"),
        cap("ports"),
        cap("xcopy-enabled"),
    ],
};

/// Virtual volume
pub static VIRTUAL_VOLUME: Schema = Schema {
    name: "virtual volume",
    fan_out: None,
    fields: &[
        CLUSTER,
        NAME,
        FieldSpec::new("capacity", Label::Capitalized, Rule::Gibibytes),
        cap("locality"),
        cap("service-status"),
        cap("health-state"),
        cap("operational-status"),
        cap("consistency-group"),
        cap("supporting-device"),
        cap("vpd-id"),
        cap("expandable"),
        cap("expandable-capacity"),
    ],
};
