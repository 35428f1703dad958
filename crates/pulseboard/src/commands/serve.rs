use crate::cli::ServeArgs;
use crate::utils::{is_server_running, lock_file_path, print_server_info};
use anyhow::Result;
use event_bus::EventBus;
use logging::LogMode;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use store::{DataDirectory, DocumentStore};

pub async fn run(args: ServeArgs) -> Result<()> {
    let data_dir = match args.data_dir {
        Some(root) => DataDirectory::new(root)?,
        None => DataDirectory::new_system_default()?,
    };
    let _guards = logging::init(
        LogMode::Server {
            logs_dir: Some(data_dir.logs_dir.clone()),
        },
        args.verbose,
    )?;

    if let Some(port) = is_server_running(&data_dir)? {
        // A server already owns this data directory; hand out its address.
        print_server_info(port)?;
        return Ok(());
    }

    let port = match args.port {
        Some(port) => port,
        None => http_server::find_unused_port()?,
    };

    // The lock file lets other invocations and tooling detect the server.
    let lock_file = lock_file_path(&data_dir);
    let mut file = fs::File::create(&lock_file)?;
    write!(file, "{port}")?;
    file.flush()?;
    print_server_info(port)?;

    let store = Arc::new(DocumentStore::new(
        data_dir.catalog_path.clone(),
        env!("CARGO_PKG_VERSION").to_string(),
    )?);
    let event_bus = Arc::new(EventBus::new());

    tracing::info!("Data directory: {}", data_dir.root_path.display());
    let result = http_server::run(port, store, event_bus).await;

    let _ = fs::remove_file(&lock_file);
    result
}
