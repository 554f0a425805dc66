use clap::Parser;
use produce_inventory::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Import { file } => cli::import::run(file).await,
        Command::Migrate => cli::migrate::run().await,
    }
}
