// SFTP handler
pub mod client;
pub mod session;

pub use client::SshClient;
pub use session::SftpSession;

use crate::config::{Config, TransferOptions};
use crate::transfer;
use crate::utils::error::Result;

/// Connects over SSH, runs every job through SFTP, and closes the session on every exit path.
pub fn run(config: &Config, options: &TransferOptions) -> Result<()> {
    println!("Connecting to SFTP server");
    let mut session = SftpSession::connect(config)?;

    let result = transfer::run_jobs(&mut session, config, options);
    session.close();
    result
}
