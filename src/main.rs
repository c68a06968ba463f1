use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use sync_transfer::{
    cli::Cli,
    config::{Config, TransferOptions},
    run_transfer,
};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        eprintln!("\n❌ Transfer failed: {:#}\n", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    println!("Reading config file");
    let config = Config::load(&cli.config).context("Error reading the JSON file")?;

    println!(
        "Will connect to {}:{} with username {}",
        config.server, config.port, config.user
    );

    let options = TransferOptions {
        show_progress: !cli.quiet,
    };
    run_transfer(&config, &options)?;

    println!("\n✅ Transfer completed successfully!\n");
    Ok(())
}
