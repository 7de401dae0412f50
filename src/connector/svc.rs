//! SVC / FlashSystem connector
//!
//! Every resource is a fixed CLI command with comma-delimited output.

use super::{unsupported, ResourceKind};
use crate::decode::{DelimitedDecoder, KeyValueDecoder, RecordDecoder};
use crate::error::{Error, Result};
use crate::transport::CommandChannel;
use crate::types::{Backend, RawResource};
use tracing::debug;

const SYSTEM_COMMAND: &str = "lssystem -bytes -delim ,";

/// Connector driving an SVC cluster through its CLI
pub struct SvcConnector {
    channel: Box<dyn CommandChannel>,
    target: String,
}

impl SvcConnector {
    /// Wrap an authenticated command channel
    pub fn new(channel: impl CommandChannel + 'static, target: impl Into<String>) -> Self {
        Self {
            channel: Box::new(channel),
            target: target.into(),
        }
    }

    /// Label used in logs, e.g. `SVC(10.0.0.1)`
    pub fn target(&self) -> &str {
        &self.target
    }

    /// CLI command listing `kind`
    pub fn command(kind: ResourceKind) -> Result<&'static str> {
        let command = match kind {
            ResourceKind::Controller => "lscontroller -delim ,",
            ResourceKind::Fabric => "lsfabric -delim ,",
            ResourceKind::Host => "lshost -delim ,",
            ResourceKind::HostMapping => "lshostvdiskmap -delim ,",
            ResourceKind::Node => "lsnode -delim ,",
            ResourceKind::ManagedDisk => "lsmdisk -bytes -delim ,",
            ResourceKind::ManagedDiskGroup => "lsmdiskgrp -bytes -delim ,",
            ResourceKind::User => "lsuser -delim ,",
            ResourceKind::VirtualDisk => "lsvdisk -bytes -delim ,",
            other => return Err(unsupported(Backend::Svc, other)),
        };
        Ok(command)
    }

    /// `lssystem` as a single key/value record
    pub async fn system(&self) -> Result<RawResource> {
        let output = self.channel.exec(SYSTEM_COMMAND).await?;
        KeyValueDecoder::new().decode_raw(&output)
    }

    /// One record per row of the listing command
    pub async fn list(&self, kind: ResourceKind) -> Result<Vec<RawResource>> {
        let command = Self::command(kind)?;
        let output = self.channel.exec(command).await?;
        let records = DelimitedDecoder::new().decode(&output)?;
        debug!("{} {kind} record(s) on {}", records.len(), self.target);
        Ok(records)
    }

    /// Detailed view of one item: `<command> <id>`, a key/value table
    pub async fn detail(&self, kind: ResourceKind, id: &str) -> Result<RawResource> {
        let command = format!("{} {id}", Self::command(kind)?);
        let output = self.channel.exec(&command).await?;
        let record = KeyValueDecoder::new().decode_raw(&output)?;

        if record.as_object().is_some_and(serde_json::Map::is_empty) {
            return Err(Error::malformed(format!(
                "{} returned nothing for {kind} '{id}'",
                self.target
            )));
        }
        Ok(record)
    }

    /// The cluster's `code_level`
    pub async fn version(&self) -> Result<Option<String>> {
        let system = self.system().await?;
        Ok(system
            .get("code_level")
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    /// Close the SSH session
    pub async fn close(&self) -> Result<()> {
        self.channel.close().await
    }
}

impl std::fmt::Debug for SvcConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvcConnector")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}
