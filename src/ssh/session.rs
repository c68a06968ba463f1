// SFTP session over an authenticated SSH connection
use crate::config::Config;
use crate::ssh::SshClient;
use crate::transfer::RemoteSession;
use crate::utils::error::{BoxError, Result};
use log::debug;
use ssh2::{File, Sftp};
use std::path::Path;

pub struct SftpSession {
    // Declared first so the SFTP channel is dropped before the SSH connection.
    sftp: Sftp,
    client: SshClient,
}

impl SftpSession {
    pub fn connect(config: &Config) -> Result<Self> {
        let client = SshClient::connect(config)?;
        let sftp = client.sftp(&config.addr())?;
        debug!("SFTP subsystem started");
        Ok(SftpSession { sftp, client })
    }

    /// Closes the SFTP channel, then the SSH connection.
    pub fn close(self) {
        let SftpSession { sftp, client } = self;
        drop(sftp);
        client.disconnect();
        debug!("SFTP session closed");
    }
}

impl RemoteSession for SftpSession {
    type Reader = File;
    type Writer = File;

    fn open(&mut self, path: &str) -> std::result::Result<File, BoxError> {
        Ok(self.sftp.open(Path::new(path))?)
    }

    fn close_read(&mut self, mut reader: File) -> std::result::Result<(), BoxError> {
        Ok(reader.close()?)
    }

    fn create(&mut self, path: &str) -> std::result::Result<File, BoxError> {
        Ok(self.sftp.create(Path::new(path))?)
    }

    fn close_write(&mut self, mut writer: File) -> std::result::Result<(), BoxError> {
        Ok(writer.close()?)
    }

    fn remove(&mut self, path: &str) -> std::result::Result<(), BoxError> {
        Ok(self.sftp.unlink(Path::new(path))?)
    }
}
