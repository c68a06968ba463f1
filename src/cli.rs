// Command-line arguments
use crate::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sync-transfer")]
#[command(about = "Upload and download files over FTPS or SFTP as listed in a JSON job file")]
#[command(version)]
pub struct Cli {
    /// Path of the JSON job file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide per-file progress bars
    #[arg(short, long)]
    pub quiet: bool,
}
