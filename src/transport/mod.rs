//! Command transport module
//!
//! The SVC connector drives the array through CLI commands. It talks to a
//! [`CommandChannel`], implemented over SSH by [`SshChannel`] and by scripted
//! channels in tests.

mod ssh;

pub use ssh::{SshChannel, SshOptions};

use crate::error::Result;
use async_trait::async_trait;

/// An authenticated session able to run one command at a time
#[async_trait]
pub trait CommandChannel: Send + Sync {
    /// Run `command` and return its standard output
    async fn exec(&self, command: &str) -> Result<String>;

    /// Release the session
    async fn close(&self) -> Result<()>;
}
