// Job file loading
use crate::utils::error::{Result, TransferError};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default job file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "properties.json";

/// Connection settings and job lists, read once from the job file.
///
/// Keys are matched regardless of case (`Port`, `port` and `PORT` are the same
/// field), so the serde names below are the lower-cased keys.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user")]
    pub user: String,
    #[serde(rename = "password")]
    pub password: String,
    #[serde(rename = "server")]
    pub server: String,
    #[serde(rename = "port")]
    pub port: u16,
    #[serde(rename = "protocol")]
    pub protocol: String,
    #[serde(rename = "ignorehostkey")]
    pub ignore_host_key: bool,
    #[serde(rename = "filestoupload")]
    pub files_to_upload: Vec<UploadJob>,
    #[serde(rename = "filestodownload")]
    pub files_to_download: Vec<DownloadJob>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UploadJob {
    #[serde(rename = "localpath")]
    pub local_path: PathBuf,
    #[serde(rename = "remotepath")]
    pub remote_path: String,
    #[serde(rename = "deletelocalfileafterupload")]
    pub delete_local_file_after_upload: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DownloadJob {
    #[serde(rename = "remotepath")]
    pub remote_path: String,
    #[serde(rename = "localpath")]
    pub local_path: PathBuf,
    #[serde(rename = "deleteremotefileafterdownload")]
    pub delete_remote_file_after_download: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Ftp,
    Sftp,
}

impl FromStr for Protocol {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ftp" => Ok(Protocol::Ftp),
            "sftp" => Ok(Protocol::Sftp),
            other => Err(TransferError::InvalidProtocol(other.to_string())),
        }
    }
}

/// Run-time switches that do not come from the job file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferOptions {
    pub show_progress: bool,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TransferError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| TransferError::ConfigDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(content)?;
        serde_json::from_value(lowercase_keys(value))
    }

    pub fn protocol(&self) -> Result<Protocol> {
        self.protocol.parse()
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}

/// Lower-cases every object key. Keys that differ only by case collapse into one entry.
fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key.to_lowercase(), lowercase_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("protocol", &self.protocol)
            .field("ignore_host_key", &self.ignore_host_key)
            .field("files_to_upload", &self.files_to_upload)
            .field("files_to_download", &self.files_to_download)
            .finish()
    }
}
