//! SVC / FlashSystem schemas
//!
//! Every column comes from the CLI listing and is required. Labels are the
//! capitalized CLI keys; byte counts become `<Key>_GB` columns.

use super::types::{FieldSpec, Label, Rule, Schema};

const fn cap(source: &'static str) -> FieldSpec {
    FieldSpec::new(source, Label::Capitalized, Rule::Required)
}

const fn gb(source: &'static str) -> FieldSpec {
    FieldSpec::new(source, Label::Capitalized, Rule::Gibibytes)
}

/// `lscontroller`
pub static CONTROLLER: Schema = Schema {
    name: "controller",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("controller_name"),
        cap("ctrl_s/n"),
        cap("vendor_id"),
        cap("product_id_low"),
        cap("product_id_high"),
        cap("site_id"),
        cap("site_name"),
    ],
};

/// `lsfabric`
pub static FABRIC: Schema = Schema {
    name: "fabric",
    fan_out: None,
    fields: &[
        cap("remote_wwpn"),
        cap("remote_nportid"),
        cap("id"),
        cap("node_name"),
        cap("local_wwpn"),
        cap("local_port"),
        cap("local_nportid"),
        cap("state"),
        cap("name"),
        cap("cluster_name"),
        cap("type"),
    ],
};

/// `lshost`
pub static HOST: Schema = Schema {
    name: "host",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("port_count"),
        cap("iogrp_count"),
        cap("status"),
        cap("site_id"),
        cap("site_name"),
    ],
};

/// `lshostvdiskmap`
pub static HOST_MAPPING: Schema = Schema {
    name: "host mapping",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("SCSI_id"),
        cap("vdisk_id"),
        cap("vdisk_name"),
        cap("vdisk_UID"),
        cap("IO_group_id"),
        cap("IO_group_name"),
    ],
};

/// `lsmdisk -bytes`
pub static MDISK: Schema = Schema {
    name: "mdisk",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("status"),
        cap("mode"),
        cap("mdisk_grp_id"),
        cap("mdisk_grp_name"),
        gb("capacity"),
        cap("ctrl_LUN_#"),
        cap("controller_name"),
        cap("UID"),
        cap("tier"),
        cap("encrypt"),
        cap("site_id"),
        cap("site_name"),
    ],
};

/// `lsmdiskgrp -bytes`
pub static MDISK_GROUP: Schema = Schema {
    name: "mdisk group",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("status"),
        cap("mdisk_count"),
        cap("vdisk_count"),
        cap("extent_size"),
        gb("capacity"),
        gb("free_capacity"),
        gb("virtual_capacity"),
        gb("used_capacity"),
        gb("real_capacity"),
        cap("overallocation"),
        cap("warning"),
        cap("easy_tier"),
        cap("easy_tier_status"),
        cap("compression_active"),
        cap("parent_mdisk_grp_id"),
        cap("parent_mdisk_grp_name"),
        cap("child_mdisk_grp_count"),
        cap("child_mdisk_grp_capacity"),
        cap("type"),
        cap("encrypt"),
        cap("owner_type"),
        cap("site_id"),
        cap("site_name"),
    ],
};

/// `lsnode`
pub static NODE: Schema = Schema {
    name: "node",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("UPS_serial_number"),
        cap("WWNN"),
        cap("status"),
        cap("IO_group_id"),
        cap("IO_group_name"),
        cap("config_node"),
        cap("UPS_unique_id"),
        cap("hardware"),
        cap("iscsi_name"),
        cap("iscsi_alias"),
        cap("panel_name"),
        cap("enclosure_id"),
        cap("canister_id"),
        cap("enclosure_serial_number"),
        cap("site_id"),
        cap("site_name"),
    ],
};

/// `lssystem -bytes`
pub static SYSTEM: Schema = Schema {
    name: "system",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("product_name"),
        cap("name"),
        cap("location"),
        cap("total_overallocation"),
        gb("total_mdisk_capacity"),
        gb("space_in_mdisk_grps"),
        gb("space_allocated_to_vdisks"),
        gb("total_free_space"),
        gb("total_vdiskcopy_capacity"),
        gb("total_used_capacity"),
        gb("total_vdisk_capacity"),
        gb("total_allocated_extent_capacity"),
        gb("compression_virtual_capacity"),
        gb("compression_compressed_capacity"),
        gb("compression_uncompressed_capacity"),
        cap("time_zone"),
        cap("code_level"),
        cap("email_reply"),
        cap("email_contact"),
        cap("cluster_ntp_IP_address"),
        cap("compression_active"),
        cap("email_organization"),
        cap("email_machine_address"),
        cap("email_machine_city"),
    ],
};

/// `lsuser`
pub static USER: Schema = Schema {
    name: "user",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("password"),
        cap("ssh_key"),
        cap("remote"),
        cap("usergrp_id"),
        cap("usergrp_name"),
    ],
};

/// `lsvdisk -bytes`
pub static VDISK: Schema = Schema {
    name: "vdisk",
    fan_out: None,
    fields: &[
        cap("id"),
        cap("name"),
        cap("IO_group_id"),
        cap("IO_group_name"),
        cap("status"),
        cap("mdisk_grp_id"),
        cap("mdisk_grp_name"),
        gb("capacity"),
        cap("type"),
        cap("vdisk_UID"),
        cap("fc_map_count"),
        cap("copy_count"),
        cap("fast_write_state"),
        cap("se_copy_count"),
        cap("RC_change"),
        cap("compressed_copy_count"),
        cap("parent_mdisk_grp_id"),
        cap("parent_mdisk_grp_name"),
        cap("formatting"),
    ],
};
