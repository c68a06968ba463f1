// Library entry: module exports and protocol dispatch
pub mod cli;
pub mod config;
pub mod ftp;
pub mod ssh;
pub mod transfer;
pub mod utils;

use config::{Config, Protocol, TransferOptions};
use log::info;
use utils::error::Result;

/// Resolves the configured protocol. Nothing is opened before this succeeds.
pub fn select_protocol(config: &Config) -> Result<Protocol> {
    config.protocol()
}

/// Runs every job in `config` with the protocol it names.
pub fn run_transfer(config: &Config, options: &TransferOptions) -> Result<()> {
    match select_protocol(config)? {
        Protocol::Ftp => {
            println!("In FTP mode");
            info!("Starting FTP transfer to {}", config.addr());
            ftp::run(config, options)
        }
        Protocol::Sftp => {
            println!("In SFTP mode");
            info!("Starting SFTP transfer to {}", config.addr());
            ssh::run(config, options)
        }
    }
}
