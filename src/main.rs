use clap::Parser;
use relay_ctl::{cli::Cli, config, run_command};
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> relay_ctl::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration, then apply flag / environment overrides
    let config = config::load_config(cli.config.as_deref())?
        .with_overrides(cli.api_url.clone(), cli.api_token.clone());
    log::debug!("Using relay API at {}", config.api.url);

    run_command(cli.command, &config, cli.json).await
}
