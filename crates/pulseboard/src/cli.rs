use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pulseboard",
    version,
    about = "Pulseboard team reporting CLI",
    long_about = "Runs the team reporting service: background report generation, live event delivery and shared dashboards."
)]
pub struct PulseboardCli {
    #[command(subcommand)]
    pub command: Commands,
}

impl PulseboardCli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the pulseboard server
    Serve(ServeArgs),
    /// Load a small demo data set into the store
    Seed(SeedArgs),
    /// Remove all stored data
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Port to bind; a free port is picked when omitted
    #[arg(long)]
    pub port: Option<u16>,

    /// Data directory (defaults to ~/.pulseboard)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Data directory (defaults to ~/.pulseboard)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Data directory (defaults to ~/.pulseboard)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,
}
