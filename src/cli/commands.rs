//! CLI commands and argument parsing

use crate::output::OutputFormat;
use crate::types::Backend;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Arguments shared by every binary
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Directory to store the inventory in
    #[arg(short, long)]
    pub path: PathBuf,

    /// Name of the inventory file
    #[arg(short, long)]
    pub file: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "xlsx")]
    pub format: OutputFormat,
}

/// SVC-XRay - Inventory of SVC / FlashSystem arrays
#[derive(Parser, Debug)]
#[command(name = "svc-xray")]
#[command(author, version, about, long_about = None)]
pub struct SvcCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// REST-XRay - Inventory of VMAX or VPLEX arrays
#[derive(Parser, Debug)]
#[command(name = "rest-xray")]
#[command(author, version, about, long_about = None)]
pub struct RestCli {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Backend family of every array in the configuration
    #[arg(long, value_enum, default_value = "vmax")]
    pub backend: RestBackend,
}

/// Backends reached over REST
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RestBackend {
    /// VMAX / Symmetrix through Unisphere
    Vmax,
    /// VPLEX
    Vplex,
}

impl From<RestBackend> for Backend {
    fn from(value: RestBackend) -> Self {
        match value {
            RestBackend::Vmax => Backend::Vmax,
            RestBackend::Vplex => Backend::Vplex,
        }
    }
}
