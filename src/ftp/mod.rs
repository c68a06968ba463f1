// FTP handler
pub mod session;
pub mod tls;

pub use session::FtpSession;

use crate::config::{Config, TransferOptions};
use crate::transfer;
use crate::utils::error::Result;

/// Connects with explicit TLS, runs every job, and sends QUIT on every exit path.
pub fn run(config: &Config, options: &TransferOptions) -> Result<()> {
    println!("Connecting to FTP server");
    let mut session = FtpSession::connect(config)?;

    let result = transfer::run_jobs(&mut session, config, options);
    session.close();
    result
}
