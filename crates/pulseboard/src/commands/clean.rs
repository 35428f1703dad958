use crate::cli::CleanArgs;
use crate::utils::is_server_running;
use anyhow::Result;
use logging::LogMode;
use std::process;
use store::DataDirectory;
use tracing::{error, info};

pub fn run(args: CleanArgs) -> Result<()> {
    let _guards = logging::init(LogMode::Cli, args.verbose)?;

    let data_dir = match args.data_dir {
        Some(root) => DataDirectory::new(root)?,
        None => DataDirectory::new_system_default()?,
    };
    if let Some(port) = is_server_running(&data_dir)? {
        error!("pulseboard server is running on port {port}. Stop it before running clean.");
        process::exit(1);
    }

    data_dir.delete_all()?;
    info!("Clean completed");
    Ok(())
}
