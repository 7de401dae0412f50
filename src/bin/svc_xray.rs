//! SVC-XRay
//!
//! Inventory of SVC / FlashSystem arrays over SSH

use array_xray::cli::{execute, init_logging, Runner, SvcCli};
use array_xray::Backend;
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = SvcCli::parse();
    init_logging(cli.common.debug);

    execute(&Runner::new(Backend::Svc, cli.common))
}
