// FTP over explicit TLS
use crate::config::Config;
use crate::ftp::tls;
use crate::transfer::RemoteSession;
use crate::utils::error::{BoxError, ConnectStage, Result, TransferError};
use log::{debug, warn};
use std::io::{Read, Write};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use suppaftp::types::FileType;
use suppaftp::{RustlsConnector, RustlsFtpStream};

/// Timeout for establishing the control connection.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(5);

pub struct FtpSession {
    stream: RustlsFtpStream,
}

impl FtpSession {
    /// Dials `server:port`, upgrades the control channel with AUTH TLS and logs in.
    pub fn connect(config: &Config) -> Result<Self> {
        let addr = config.addr();

        let socket_addrs = (config.server.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| TransferError::connection(ConnectStage::Resolve, &addr, e))?;
        let stream = dial(socket_addrs, &addr)?;

        if config.ignore_host_key {
            warn!("Certificate verification disabled for {}", addr);
        }
        let tls_config = tls::client_config(config.ignore_host_key)
            .map_err(|e| TransferError::connection(ConnectStage::Tls, &addr, e))?;
        let mut stream = stream
            .into_secure(RustlsConnector::from(Arc::new(tls_config)), &config.server)
            .map_err(|e| TransferError::connection(ConnectStage::Tls, &addr, e))?;
        debug!("TLS established with {}", addr);

        let login = stream.login(&config.user, &config.password);
        quit_on_error(&mut stream, login, quit_quietly)
            .map_err(|e| TransferError::connection(ConnectStage::Authenticate, &addr, e))?;
        let binary = stream.transfer_type(FileType::Binary);
        quit_on_error(&mut stream, binary, quit_quietly)
            .map_err(|e| TransferError::connection(ConnectStage::Session, &addr, e))?;

        debug!("Logged in as {}", config.user);
        Ok(FtpSession { stream })
    }

    pub fn close(mut self) {
        quit_quietly(&mut self.stream);
        debug!("FTP session closed");
    }
}

/// Tries every resolved address in turn and reports the last dial failure.
fn dial(socket_addrs: impl IntoIterator<Item = SocketAddr>, addr: &str) -> Result<RustlsFtpStream> {
    let mut last_error = None;
    for socket_addr in socket_addrs {
        match RustlsFtpStream::connect_timeout(socket_addr, DIAL_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                debug!("Dial {} failed: {}", socket_addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(match last_error {
        Some(e) => TransferError::connection(ConnectStage::Dial, addr, e),
        None => TransferError::connection(ConnectStage::Resolve, addr, "no address found"),
    })
}

/// Hands `result` back unchanged, sending QUIT first if it is an error.
fn quit_on_error<S, T, E>(
    stream: &mut S,
    result: std::result::Result<T, E>,
    quit: impl FnOnce(&mut S),
) -> std::result::Result<T, E> {
    if result.is_err() {
        quit(stream);
    }
    result
}

fn quit_quietly(stream: &mut RustlsFtpStream) {
    if let Err(e) = stream.quit() {
        debug!("FTP QUIT failed: {}", e);
    }
}

impl RemoteSession for FtpSession {
    type Reader = Box<dyn Read>;
    type Writer = Box<dyn Write>;

    fn open(&mut self, path: &str) -> std::result::Result<Self::Reader, BoxError> {
        Ok(Box::new(self.stream.retr_as_stream(path)?))
    }

    fn close_read(&mut self, reader: Self::Reader) -> std::result::Result<(), BoxError> {
        Ok(self.stream.finalize_retr_stream(reader)?)
    }

    fn create(&mut self, path: &str) -> std::result::Result<Self::Writer, BoxError> {
        Ok(Box::new(self.stream.put_with_stream(path)?))
    }

    fn close_write(&mut self, writer: Self::Writer) -> std::result::Result<(), BoxError> {
        Ok(self.stream.finalize_put_stream(writer)?)
    }

    fn remove(&mut self, path: &str) -> std::result::Result<(), BoxError> {
        Ok(self.stream.rm(path)?)
    }
}
