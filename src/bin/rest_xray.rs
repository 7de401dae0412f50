//! REST-XRay
//!
//! Inventory of VMAX arrays (Unisphere) or VPLEX clusters over REST

use array_xray::cli::{execute, init_logging, RestCli, Runner};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = RestCli::parse();
    init_logging(cli.common.debug);

    execute(&Runner::new(cli.backend.into(), cli.common))
}
