use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::net::TcpStream;
use std::path::PathBuf;
use std::time::Duration;
use store::DataDirectory;

const LOCK_FILE_NAME: &str = "pulseboard.lock";

/// Printed to stdout as a single JSON line so launchers can find the server.
#[derive(Serialize, Deserialize, Debug)]
pub struct ServerInfo {
    pub port: u16,
}

pub fn print_server_info(port: u16) -> Result<()> {
    println!("{}", serde_json::to_string(&ServerInfo { port })?);
    Ok(())
}

pub fn lock_file_path(data_dir: &DataDirectory) -> PathBuf {
    data_dir.root_path.join(LOCK_FILE_NAME)
}

/// Reads the lock file and probes the recorded port. A lock naming a dead
/// port is stale and gets removed.
pub fn is_server_running(data_dir: &DataDirectory) -> Result<Option<u16>> {
    let lock_file = lock_file_path(data_dir);
    if !lock_file.exists() {
        return Ok(None);
    }

    let mut contents = String::new();
    fs::File::open(&lock_file)?
        .read_to_string(&mut contents)
        .map_err(|e| anyhow::anyhow!("Could not read lock file: {}", e))?;
    let port: u16 = contents
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("Could not parse port from lock file: {}", e))?;

    if TcpStream::connect_timeout(
        &format!("127.0.0.1:{port}").parse()?,
        Duration::from_millis(100),
    )
    .is_ok()
    {
        Ok(Some(port))
    } else {
        fs::remove_file(lock_file)?;
        Ok(None)
    }
}
