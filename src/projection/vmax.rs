//! VMAX schemas
//!
//! Unisphere keys are kept as column labels. Most detail payloads omit keys
//! that have no value, so those columns are optional.

use super::types::{FieldSpec, Label, Member, Rule, Schema};

const fn opt(source: &'static str) -> FieldSpec {
    FieldSpec::new(source, Label::Same, Rule::Optional)
}

const fn req(source: &'static str) -> FieldSpec {
    FieldSpec::new(source, Label::Same, Rule::Required)
}

const PORT_KEYS: FieldSpec = FieldSpec::new(
    "symmetrixPortKey",
    Label::Same,
    Rule::Joined(Member::Pair("directorId", "portId")),
);

/// FAST policy (VMAX-2)
pub static FAST_POLICY: Schema = Schema {
    name: "FAST policy",
    fan_out: None,
    fields: &[
        opt("fastPolicyId"),
        opt("tier_1_id"),
        opt("tier_2_id"),
        opt("tier_3_id"),
        opt("tier_4_id"),
        opt("tier_1_capacity"),
        opt("tier_2_capacity"),
        opt("tier_3_capacity"),
        opt("tier_4_capacity"),
        opt("storage_group"),
    ],
};

/// Host, shown as an initiator group
pub static HOST: Schema = Schema {
    name: "host",
    fan_out: None,
    fields: &[
        opt("hostId"),
        opt("num_of_initiators"),
        opt("num_of_host_groups"),
        opt("num_of_masking_views"),
        opt("consistent_lun"),
        opt("hostgroup"),
        opt("initiator"),
        opt("maskingview"),
    ],
};

/// Host group, shown as a cascaded initiator group
pub static HOST_GROUP: Schema = Schema {
    name: "host group",
    fan_out: None,
    fields: &[
        opt("hostGroupId"),
        opt("num_of_hosts"),
        opt("num_of_initiators"),
        opt("num_of_masking_views"),
        opt("consistent_lun"),
        opt("maskingview"),
        FieldSpec::new("host", Label::Same, Rule::Joined(Member::Field("hostId"))),
    ],
};

/// Initiator (WWN)
pub static INITIATOR: Schema = Schema {
    name: "initiator",
    fan_out: None,
    fields: &[
        opt("initiatorId"),
        opt("host"),
        opt("alias"),
        opt("hostGroup"),
        opt("on_fabric"),
        opt("logged_in"),
        opt("num_of_masking_views"),
        opt("maskingview"),
        opt("port_flags_override"),
        opt("num_of_host_groups"),
        opt("flags_in_effect"),
        PORT_KEYS,
    ],
};

/// Masking view
pub static MASKING_VIEW: Schema = Schema {
    name: "masking view",
    fan_out: None,
    fields: &[
        opt("maskingViewId"),
        opt("hostId"),
        opt("hostGroupId"),
        opt("portGroupId"),
        opt("storageGroupId"),
    ],
};

/// Port group
pub static PORT_GROUP: Schema = Schema {
    name: "port group",
    fan_out: None,
    fields: &[
        req("portGroupId"),
        req("num_of_ports"),
        req("num_of_masking_views"),
        PORT_KEYS,
    ],
};

/// Storage resource pool (VMAX-3)
pub static SRP: Schema = Schema {
    name: "SRP",
    fan_out: None,
    fields: &[
        req("srpId"),
        req("emulation"),
        req("total_usable_cap_gb"),
        req("total_subscribed_cap_gb"),
        req("total_allocated_cap_gb"),
        req("total_snapshot_allocated_cap_gb"),
        req("total_srdf_dse_allocated_cap_gb"),
        req("reserved_cap_percent"),
    ],
};

/// Storage group
pub static STORAGE_GROUP: Schema = Schema {
    name: "storage group",
    fan_out: None,
    fields: &[
        opt("storageGroupId"),
        opt("num_of_masking_views"),
        opt("type"),
        opt("num_of_child_sgs"),
        opt("num_of_vols"),
        opt("cap_gb"),
        opt("fast_policy_name"),
        opt("parent_storage_groups"),
        opt("child_storage_groups"),
        opt("maskingview"),
    ],
};

/// Array identity and virtual capacity
pub static SYSTEM: Schema = Schema {
    name: "system",
    fan_out: None,
    fields: &[
        req("symmetrixId"),
        req("model"),
        req("ucode"),
        req("device_count"),
        FieldSpec::new(
            "virtualCapacity",
            Label::Named("virtual_used_capacity_gb"),
            Rule::Nested("used_capacity_gb"),
        ),
        FieldSpec::new(
            "virtualCapacity",
            Label::Named("virtual_total_capacity_gb"),
            Rule::Nested("total_capacity_gb"),
        ),
    ],
};

/// Thin device (TDEV)
pub static THIN_DEVICE: Schema = Schema {
    name: "thin device",
    fan_out: None,
    fields: &[
        opt("volumeId"),
        opt("wwn"),
        opt("cap_gb"),
        opt("cap_mb"),
        opt("cap_cyl"),
        opt("volume_identifier"),
        opt("status"),
        opt("type"),
        opt("allocated_percent"),
        opt("num_of_front_end_paths"),
        opt("num_of_storage_groups"),
        opt("storageGroupId"),
    ],
};

/// Thin pool (VMAX-2)
pub static THIN_POOL: Schema = Schema {
    name: "thin pool",
    fan_out: None,
    fields: &[
        req("poolId"),
        req("raid"),
        req("diskTechnology"),
        req("emulation"),
        req("percent_allocated"),
        req("percent_subscription"),
        req("total_gb"),
        req("enabled_gb"),
        req("used_gb"),
        req("free_gb"),
    ],
};
