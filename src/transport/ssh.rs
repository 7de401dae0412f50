//! SSH command channel built on libssh2
//!
//! libssh2 is blocking, so every call runs on tokio's blocking pool. The
//! session is opened and authenticated once; commands then reuse it.

use super::CommandChannel;
use crate::error::{Error, Result};
use async_trait::async_trait;
use ssh2::{ErrorCode, Session};
use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

/// libssh2 code for a blocking call that exceeded the session timeout
const LIBSSH2_ERROR_TIMEOUT: i32 = -9;

/// Parameters for opening an SSH session
#[derive(Debug, Clone)]
pub struct SshOptions {
    /// Host name or IP address
    pub address: String,
    /// TCP port
    pub port: u16,
    /// Login
    pub user: String,
    /// Password
    pub password: String,
    /// Connect and per-command timeout
    pub timeout: Duration,
}

impl SshOptions {
    /// Label used in logs and errors, e.g. `SVC(10.0.0.1)`
    pub fn target(&self) -> String {
        format!("SVC({})", self.address)
    }
}

/// An authenticated SSH session
pub struct SshChannel {
    session: Session,
    target: String,
    timeout: Duration,
}

impl SshChannel {
    /// Open a TCP connection, perform the handshake and authenticate with a
    /// password.
    ///
    /// Fails with [`Error::Authentication`] on rejected credentials and with
    /// [`Error::Timeout`] when the host does not answer in time.
    pub async fn connect(options: SshOptions) -> Result<Self> {
        let target = options.target();
        let timeout = options.timeout;

        let task_result =
            tokio::task::spawn_blocking(move || open_session(&options)).await;

        match task_result {
            Ok(Ok(session)) => Ok(Self {
                session,
                target,
                timeout,
            }),
            Ok(Err(e)) => Err(e),
            Err(join_err) => Err(Error::connection(
                target,
                format!("SSH session task failed: {join_err}"),
            )),
        }
    }
}

#[async_trait]
impl CommandChannel for SshChannel {
    async fn exec(&self, command: &str) -> Result<String> {
        debug!("---> {command}");

        let session = self.session.clone();
        let target = self.target.clone();
        let timeout = self.timeout;
        let command = command.to_string();

        let task_result =
            tokio::task::spawn_blocking(move || run_command(&session, &command, &target, timeout))
                .await;

        match task_result {
            Ok(result) => result,
            Err(join_err) => Err(Error::connection(
                &self.target,
                format!("SSH command task failed: {join_err}"),
            )),
        }
    }

    async fn close(&self) -> Result<()> {
        let session = self.session.clone();

        tokio::task::spawn_blocking(move || session.disconnect(None, "inventory done", None))
            .await
            .map_err(|join_err| {
                Error::connection(&self.target, format!("SSH close task failed: {join_err}"))
            })??;

        Ok(())
    }
}

impl std::fmt::Debug for SshChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SshChannel")
            .field("target", &self.target)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn open_session(options: &SshOptions) -> Result<Session> {
    let target = options.target();

    let addr = (options.address.as_str(), options.port)
        .to_socket_addrs()
        .map_err(|e| Error::connection(&target, format!("cannot resolve address: {e}")))?
        .next()
        .ok_or_else(|| Error::connection(&target, "address resolved to nothing"))?;

    let tcp = TcpStream::connect_timeout(&addr, options.timeout).map_err(|e| match e.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => timeout_error(&target, options.timeout),
        _ => Error::connection(&target, e.to_string()),
    })?;

    let mut session = Session::new()?;
    session.set_tcp_stream(tcp);
    session.set_timeout(options.timeout.as_millis().min(u32::MAX as u128) as u32);
    session
        .handshake()
        .map_err(|e| classify(e, &target, options.timeout))?;

    session
        .userauth_password(&options.user, &options.password)
        .map_err(|e| match e.code() {
            ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT) => timeout_error(&target, options.timeout),
            _ => Error::auth(&target, e.to_string()),
        })?;

    if !session.authenticated() {
        return Err(Error::auth(&target, "password rejected"));
    }

    Ok(session)
}

fn run_command(session: &Session, command: &str, target: &str, timeout: Duration) -> Result<String> {
    let mut channel = session
        .channel_session()
        .map_err(|e| classify(e, target, timeout))?;
    channel.exec(command).map_err(|e| classify(e, target, timeout))?;

    let mut output = String::new();
    channel
        .read_to_string(&mut output)
        .map_err(|e| match e.kind() {
            ErrorKind::TimedOut | ErrorKind::WouldBlock => timeout_error(target, timeout),
            _ => Error::connection(target, e.to_string()),
        })?;
    channel.wait_close().map_err(|e| classify(e, target, timeout))?;

    Ok(output)
}

fn classify(error: ssh2::Error, target: &str, timeout: Duration) -> Error {
    match error.code() {
        ErrorCode::Session(LIBSSH2_ERROR_TIMEOUT) => timeout_error(target, timeout),
        _ => Error::connection(target, error.to_string()),
    }
}

fn timeout_error(target: &str, timeout: Duration) -> Error {
    Error::Timeout {
        target: target.to_string(),
        timeout_ms: timeout.as_millis() as u64,
    }
}
