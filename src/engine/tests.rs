//! Tests for engine module

use super::*;
use crate::config::Settings;
use crate::connector::{SvcConnector, VmaxFactory};
use crate::output::MemorySink;
use crate::projection::{svc, Cell, Rule};
use crate::transport::CommandChannel;
use crate::types::Backend;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct ScriptedChannel {
    outputs: HashMap<String, String>,
}

impl ScriptedChannel {
    fn answer(mut self, command: &str, output: impl Into<String>) -> Self {
        self.outputs.insert(command.to_string(), output.into());
        self
    }
}

#[async_trait]
impl CommandChannel for ScriptedChannel {
    async fn exec(&self, command: &str) -> crate::error::Result<String> {
        self.outputs
            .get(command)
            .cloned()
            .ok_or_else(|| Error::connection("SVC(test)", format!("no answer to {command}")))
    }

    async fn close(&self) -> crate::error::Result<()> {
        Ok(())
    }
}

/// Delimited listing with every column of `schema`; `rows` override values
fn listing(schema: &Schema, rows: &[&[(&str, &str)]]) -> String {
    let header: Vec<&str> = schema.fields.iter().map(|f| f.source).collect();
    let mut out = header.join(",");
    out.push('\n');

    for row in rows {
        let values: Vec<String> = schema
            .fields
            .iter()
            .map(|field| {
                row.iter()
                    .find(|(key, _)| *key == field.source)
                    .map(|(_, value)| (*value).to_string())
                    .unwrap_or_else(|| match field.rule {
                        Rule::Gibibytes => "1073741824".to_string(),
                        _ => "x".to_string(),
                    })
            })
            .collect();
        out.push_str(&values.join(","));
        out.push('\n');
    }
    out
}

/// `lssystem` key/value output
fn system_output(name: &str) -> String {
    svc::SYSTEM
        .fields
        .iter()
        .map(|field| {
            let value = match (field.source, field.rule) {
                ("name", _) => name,
                (_, Rule::Gibibytes) => "2147483648",
                _ => "x",
            };
            format!("{},{value}\n", field.source)
        })
        .collect()
}

fn svc_channel() -> ScriptedChannel {
    let empty = |schema: &Schema| listing(schema, &[]);

    ScriptedChannel::default()
        .answer("lssystem -bytes -delim ,", system_output("svc-prod-01"))
        .answer(
            "lsvdisk -bytes -delim ,",
            listing(
                &svc::VDISK,
                &[
                    &[("id", "0"), ("name", "vd0"), ("capacity", "10737418240")],
                    &[("id", "1"), ("name", "vd1")],
                ],
            ),
        )
        .answer("lsmdiskgrp -bytes -delim ,", empty(&svc::MDISK_GROUP))
        .answer("lsmdisk -bytes -delim ,", empty(&svc::MDISK))
        .answer("lshostvdiskmap -delim ,", empty(&svc::HOST_MAPPING))
        .answer(
            "lshost -delim ,",
            listing(&svc::HOST, &[&[("id", "0"), ("name", "esx01")]]),
        )
        .answer("lsfabric -delim ,", empty(&svc::FABRIC))
        .answer("lscontroller -delim ,", empty(&svc::CONTROLLER))
        .answer("lsnode -delim ,", empty(&svc::NODE))
        .answer("lsuser -delim ,", empty(&svc::USER))
}

fn svc_connector(channel: ScriptedChannel) -> Connector {
    Connector::Svc(SvcConnector::new(channel, "SVC(10.0.0.1)"))
}

/// Sink failing on its first save
struct FailingSink;

impl Sink for FailingSink {
    fn save(&mut self, _category: &str, _record: &NormalizedRecord) -> Result<()> {
        Err(Error::output("disk full"))
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Plan Tests
// ============================================================================

#[test]
fn test_svc_plan_order() {
    let categories: Vec<&str> = Plan::for_backend(Backend::Svc).categories().collect();
    assert_eq!(
        categories,
        vec![
            "System",
            "Volumes",
            "Pools",
            "Managed disks",
            "Mapping",
            "Hosts",
            "Fabric",
            "Controller",
            "Nodes",
            "Users",
        ]
    );
}

#[test]
fn test_vmax_plan_order_and_gates() {
    let plan = Plan::for_backend(Backend::Vmax);
    assert_eq!(plan.identity.category, "Arrays");

    let steps: Vec<(&str, Gate)> = plan.steps.iter().map(|s| (s.category, s.gate)).collect();
    assert_eq!(
        steps,
        vec![
            ("ThinPools", Gate::Vmax2),
            ("SRPs", Gate::Vmax3),
            ("TDEVs", Gate::Always),
            ("WWNs", Gate::Always),
            ("Masking Views", Gate::Always),
            ("InitiatorGroup", Gate::Always),
            ("InitiatorGroupCascaded", Gate::Always),
            ("PortGroups", Gate::Always),
            ("StorageGroups", Gate::Always),
            ("FAST Policies", Gate::Vmax2),
        ]
    );
}

#[test]
fn test_vplex_plan_has_no_identity_column() {
    let plan = Plan::for_backend(Backend::Vplex);
    assert!(plan.identity.column.is_none());
    assert_eq!(
        plan.identity.source,
        IdentitySource::List(crate::connector::ResourceKind::Cluster)
    );
    assert_eq!(plan.steps.len(), 4);
}

#[test]
fn test_gate_allows() {
    use crate::connector::VmaxModel;

    assert!(Gate::Always.allows(None));
    assert!(Gate::Vmax2.allows(Some(VmaxModel::Vmax2)));
    assert!(!Gate::Vmax2.allows(Some(VmaxModel::Vmax3)));
    assert!(!Gate::Vmax3.allows(None));
}

#[test]
fn test_session_annotate() {
    let session = CollectionSession::new(Some(("System", Cell::from("svc01"))));
    let mut record = NormalizedRecord::new();
    record.push("Id", "0");

    let annotated = session.annotate(record.clone());
    assert_eq!(annotated.labels().collect::<Vec<_>>(), vec!["System", "Id"]);

    let bare = CollectionSession::new(None);
    assert_eq!(bare.annotate(record.clone()), record);
}

// ============================================================================
// SVC Collection Tests
// ============================================================================

#[tokio::test]
async fn test_svc_collect_identity_first() {
    let connector = svc_connector(svc_channel());
    let mut sink = MemorySink::new();
    let mut collector = Collector::new();

    let stats = collector.collect(&mut sink, &connector).await.unwrap();

    assert_eq!(collector.state(), CollectionState::Done);
    assert_eq!(stats.records_saved, 4);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.steps_run, 10);
    assert_eq!(stats.version.as_deref(), Some("x"));
    assert_eq!(sink.categories(), vec!["System", "Volumes", "Hosts"]);

    let system = sink.category("System");
    assert_eq!(system.len(), 1);
    assert_eq!(system[0].get("Name"), Some(&Cell::from("svc-prod-01")));
    assert_eq!(system[0].get("Total_mdisk_capacity_GB"), Some(&Cell::Integer(2)));

    let volumes = sink.category("Volumes");
    assert_eq!(volumes.len(), 2);
    for volume in &volumes {
        assert_eq!(volume.labels().next(), Some("System"));
        assert_eq!(volume.get("System"), Some(&Cell::from("svc-prod-01")));
    }
    assert_eq!(volumes[0].get("Capacity_GB"), Some(&Cell::Integer(10)));
    assert_eq!(volumes[1].get("Capacity_GB"), Some(&Cell::Integer(1)));
}

#[tokio::test]
async fn test_svc_bad_record_is_skipped() {
    let channel = svc_channel().answer(
        "lsvdisk -bytes -delim ,",
        listing(
            &svc::VDISK,
            &[&[("id", "0"), ("capacity", "many")], &[("id", "1")]],
        ),
    );
    let connector = svc_connector(channel);
    let mut sink = MemorySink::new();
    let mut collector = Collector::new();

    let stats = collector.collect(&mut sink, &connector).await.unwrap();

    assert_eq!(stats.skipped, 1);
    let volumes = sink.category("Volumes");
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].get("Id"), Some(&Cell::from("1")));
}

#[tokio::test]
async fn test_identity_failure_aborts_without_sink_call() {
    let mut channel = svc_channel();
    channel.outputs.remove("lssystem -bytes -delim ,");
    let connector = svc_connector(channel);
    let mut sink = MemorySink::new();
    let mut collector = Collector::new();

    let err = collector.collect(&mut sink, &connector).await.unwrap_err();

    assert!(err.is_connection_error());
    assert_eq!(collector.state(), CollectionState::Aborted);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_identity_without_name_aborts() {
    let channel = svc_channel().answer("lssystem -bytes -delim ,", "id,1\n");
    let connector = svc_connector(channel);
    let mut sink = MemorySink::new();

    let err = Collector::new()
        .collect(&mut sink, &connector)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedResponse { .. }));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_step_failure_keeps_saved_records() {
    let mut channel = svc_channel();
    channel.outputs.remove("lsmdiskgrp -bytes -delim ,");
    let connector = svc_connector(channel);
    let mut sink = MemorySink::new();
    let mut collector = Collector::new();

    let result = collector.collect(&mut sink, &connector).await;

    assert!(result.is_err());
    assert_eq!(collector.state(), CollectionState::Aborted);
    assert_eq!(sink.categories(), vec!["System", "Volumes"]);
    assert!(sink.category("Hosts").is_empty());
}

#[tokio::test]
async fn test_sink_error_propagates() {
    let connector = svc_connector(svc_channel());
    let mut sink = FailingSink;

    let err = Collector::new()
        .collect(&mut sink, &connector)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Output { .. }));
    assert!(err.is_fatal());
}

// ============================================================================
// VMAX Collection Tests
// ============================================================================

fn test_settings() -> Settings {
    Settings {
        timeout_secs: 5,
        max_retries: 0,
        initial_backoff_ms: 1,
        max_backoff_secs: 1,
        requests_per_second: 0,
    }
}

#[tokio::test]
async fn test_vmax3_skips_vmax2_steps() {
    let server = MockServer::start().await;
    let root = "/sloprovisioning/symmetrix/000197800123";

    Mock::given(method("GET"))
        .and(path(root))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symmetrix": [{
                "symmetrixId": "000197800123",
                "model": "VMAX250F",
                "ucode": "5977.1125.1125",
                "device_count": 42,
                "virtualCapacity": {"used_capacity_gb": 10.5, "total_capacity_gb": 100.0}
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{root}/srp")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"srpId": ["SRP_1"]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{root}/srp/SRP_1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "srp": [{
                "srpId": "SRP_1",
                "emulation": "FBA",
                "total_usable_cap_gb": 1000.0,
                "total_subscribed_cap_gb": 500.0,
                "total_allocated_cap_gb": 250.0,
                "total_snapshot_allocated_cap_gb": 0.0,
                "total_srdf_dse_allocated_cap_gb": 0.0,
                "reserved_cap_percent": 10
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{root}/volume")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0, "maxPageSize": 1000
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/sloprovisioning/.*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "No data found"
        })))
        .with_priority(10)
        .mount(&server)
        .await;

    let array = VmaxFactory::create(
        "000197800123",
        test_settings().http_config(server.uri()),
        "smc",
        "smc",
    )
    .unwrap();
    let connector = Connector::Vmax(array);
    let mut sink = MemorySink::new();

    let stats = Collector::new()
        .collect(&mut sink, &connector)
        .await
        .unwrap();

    assert_eq!(stats.steps_gated, 2);
    assert_eq!(stats.records_saved, 2);
    // no system/version mock: the 404 is logged, not fatal
    assert_eq!(stats.version, None);
    assert_eq!(sink.categories(), vec!["Arrays", "SRPs"]);

    let srp = sink.category("SRPs");
    assert_eq!(
        srp[0].labels().take(2).collect::<Vec<_>>(),
        vec!["Symmetrix Id", "srpId"]
    );
    assert_eq!(srp[0].get("Symmetrix Id"), Some(&Cell::from("000197800123")));

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| !r.url.path().contains("thinpool")));
    assert!(requests.iter().all(|r| !r.url.path().contains("fastpolicy")));
}
