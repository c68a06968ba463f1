// Protocol-independent job execution
pub mod download;
pub mod progress;
pub mod upload;

pub use download::download;
pub use upload::upload;

use crate::config::{Config, TransferOptions};
use crate::utils::error::{BoxError, Result};
use log::info;
use std::io::{Read, Write};

/// Remote file operations a protocol session provides to the job runner.
///
/// A reader returned by [`open`](RemoteSession::open) must be handed back to
/// [`close_read`](RemoteSession::close_read) once drained, and likewise for
/// writers and [`close_write`](RemoteSession::close_write); protocols such as
/// FTP only report the outcome of a data transfer at that point.
pub trait RemoteSession {
    type Reader: Read;
    type Writer: Write;

    fn open(&mut self, path: &str) -> std::result::Result<Self::Reader, BoxError>;

    fn close_read(&mut self, reader: Self::Reader) -> std::result::Result<(), BoxError>;

    /// Create or truncate `path`.
    fn create(&mut self, path: &str) -> std::result::Result<Self::Writer, BoxError>;

    fn close_write(&mut self, writer: Self::Writer) -> std::result::Result<(), BoxError>;

    fn remove(&mut self, path: &str) -> std::result::Result<(), BoxError>;
}

/// Runs every download, then every upload, in file order. Stops at the first error.
pub fn run_jobs<S: RemoteSession>(
    session: &mut S,
    config: &Config,
    options: &TransferOptions,
) -> Result<()> {
    info!(
        "{} download(s), {} upload(s) queued",
        config.files_to_download.len(),
        config.files_to_upload.len()
    );

    for job in &config.files_to_download {
        download(session, job, options)?;
    }

    for job in &config.files_to_upload {
        upload(session, job, options)?;
    }

    Ok(())
}
