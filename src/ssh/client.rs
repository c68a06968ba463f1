// SSH transport
use crate::config::Config;
use crate::utils::error::{ConnectStage, Result, TransferError};
use log::{debug, warn};
use ssh2::{CheckResult, KnownHostFileKind, Session};
use std::net::TcpStream;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostKeyError {
    #[error("server sent no host key")]
    Missing,

    #[error("cannot determine home directory for known_hosts")]
    NoHomeDir,

    #[error("cannot read {path}: {source}")]
    KnownHostsUnreadable {
        path: PathBuf,
        #[source]
        source: ssh2::Error,
    },

    #[error("host {0} is not listed in known_hosts")]
    Unknown(String),

    #[error("host key for {0} does not match known_hosts")]
    Mismatch(String),

    #[error("known_hosts lookup for {0} failed")]
    CheckFailed(String),
}

pub struct SshClient {
    pub session: Session,
}

impl SshClient {
    /// Opens the TCP connection, runs the SSH handshake, checks the host key
    /// unless `ignore_host_key` is set, and authenticates with the password.
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config.addr();

        let tcp = TcpStream::connect((config.server.as_str(), config.port))
            .map_err(|e| TransferError::connection(ConnectStage::Dial, &addr, e))?;

        let mut session =
            Session::new().map_err(|e| TransferError::connection(ConnectStage::Handshake, &addr, e))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| TransferError::connection(ConnectStage::Handshake, &addr, e))?;
        debug!("SSH handshake with {} completed", addr);

        if config.ignore_host_key {
            warn!("Host key verification disabled for {}", addr);
        } else {
            verify_host_key(&session, &config.server, config.port)
                .map_err(|e| TransferError::connection(ConnectStage::HostKey, &addr, e))?;
        }

        session
            .userauth_password(&config.user, &config.password)
            .map_err(|e| TransferError::connection(ConnectStage::Authenticate, &addr, e))?;

        if !session.authenticated() {
            return Err(TransferError::connection(
                ConnectStage::Authenticate,
                &addr,
                "server did not accept the credentials",
            ));
        }

        debug!("Authenticated as {}", config.user);
        Ok(SshClient { session })
    }

    pub fn sftp(&self, addr: &str) -> Result<ssh2::Sftp> {
        self.session
            .sftp()
            .map_err(|e| TransferError::connection(ConnectStage::Subsystem, addr, e))
    }

    pub fn disconnect(&self) {
        if let Err(e) = self.session.disconnect(None, "transfer finished", None) {
            debug!("SSH disconnect failed: {}", e);
        }
    }
}

fn verify_host_key(session: &Session, host: &str, port: u16) -> std::result::Result<(), HostKeyError> {
    let (key, _key_type) = session.host_key().ok_or(HostKeyError::Missing)?;

    let path = home::home_dir()
        .ok_or(HostKeyError::NoHomeDir)?
        .join(".ssh")
        .join("known_hosts");

    let mut known_hosts = session
        .known_hosts()
        .map_err(|_| HostKeyError::CheckFailed(host.to_string()))?;
    known_hosts
        .read_file(&path, KnownHostFileKind::OpenSSH)
        .map_err(|source| HostKeyError::KnownHostsUnreadable { path: path.clone(), source })?;

    match known_hosts.check_port(host, port, key) {
        CheckResult::Match => Ok(()),
        CheckResult::NotFound => Err(HostKeyError::Unknown(host.to_string())),
        CheckResult::Mismatch => Err(HostKeyError::Mismatch(host.to_string())),
        CheckResult::Failure => Err(HostKeyError::CheckFailed(host.to_string())),
    }
}
