use clap::Parser;
use sample_accounts::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::bootstrap()?;

    cli::run(cli.command, &config).await
}
