mod cli;
mod commands;
mod utils;

use crate::cli::{Commands, PulseboardCli};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = PulseboardCli::parse_args();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Seed(args) => commands::seed::run(args),
        Commands::Clean(args) => commands::clean::run(args),
    }
}
