use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by the protocol libraries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A single step of a transfer job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenRemote,
    CreateLocal,
    OpenLocal,
    CreateRemote,
    Copy,
    FinishRemote,
    DeleteRemote,
    DeleteLocal,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::OpenRemote => "open remote file",
            Step::CreateLocal => "create local file",
            Step::OpenLocal => "open local file",
            Step::CreateRemote => "create remote file",
            Step::Copy => "copy data",
            Step::FinishRemote => "complete remote transfer",
            Step::DeleteRemote => "delete remote file",
            Step::DeleteLocal => "delete local file",
        };
        f.write_str(name)
    }
}

/// Where a connection attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStage {
    Resolve,
    Dial,
    Tls,
    Handshake,
    HostKey,
    Authenticate,
    Session,
    Subsystem,
}

impl fmt::Display for ConnectStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectStage::Resolve => "address resolution",
            ConnectStage::Dial => "dial",
            ConnectStage::Tls => "TLS negotiation",
            ConnectStage::Handshake => "SSH handshake",
            ConnectStage::HostKey => "host key verification",
            ConnectStage::Authenticate => "authentication",
            ConnectStage::Session => "session setup",
            ConnectStage::Subsystem => "SFTP subsystem start",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("cannot read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode config file {path}: {source}")]
    ConfigDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid protocol {0:?}, protocol should be ftp or sftp")]
    InvalidProtocol(String),

    #[error("{stage} with {addr} failed: {source}")]
    Connection {
        stage: ConnectStage,
        addr: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to {step} {path}: {source}")]
    Local {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {step} {path}: {source}")]
    Remote {
        step: Step,
        path: String,
        #[source]
        source: BoxError,
    },
}

impl TransferError {
    pub fn connection(stage: ConnectStage, addr: &str, source: impl Into<BoxError>) -> Self {
        TransferError::Connection {
            stage,
            addr: addr.to_string(),
            source: source.into(),
        }
    }

    pub fn remote(step: Step, path: &str, source: impl Into<BoxError>) -> Self {
        TransferError::Remote {
            step,
            path: path.to_string(),
            source: source.into(),
        }
    }

    pub fn local(step: Step, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TransferError::Local {
            step,
            path: path.into(),
            source,
        }
    }

    /// The job step that failed, if the error came from a transfer job.
    pub fn step(&self) -> Option<Step> {
        match self {
            TransferError::Local { step, .. } | TransferError::Remote { step, .. } => Some(*step),
            TransferError::Copy { .. } => Some(Step::Copy),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransferError>;
