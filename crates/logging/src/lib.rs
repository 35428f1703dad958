//! This crate provides logging initialization for the pulseboard application.
//!
//! It supports two modes:
//! - CLI mode: logs to STDOUT.
//! - Server mode: logs to STDERR and to a rolling file in the data directory.
//!
//! The server logs are rolled over when they reach 5 MB. Rotated logs are
//! compressed. The maximum number of rotated logs is 20.

use anyhow::Result;
use file_rotate::{ContentLimit, FileRotate, compression::Compression, suffix::AppendCount};
use std::path::PathBuf;
use store::DataDirectory;
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt::writer::MakeWriterExt};

pub enum LogMode {
    Cli,
    Server {
        /// Directory for the rolling log file; the system default data
        /// directory is used when absent.
        logs_dir: Option<PathBuf>,
    },
}

/// Guard that keeps background logging workers alive.
pub struct LoggingGuards {
    _guards: Vec<WorkerGuard>,
}

pub fn init(mode: LogMode, verbose: bool) -> Result<Option<LoggingGuards>> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    match mode {
        LogMode::Cli => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            Ok(None)
        }
        LogMode::Server { logs_dir } => {
            let logs_dir = match logs_dir {
                Some(dir) => dir,
                None => DataDirectory::get_system_data_directory()?.join("logs"),
            };
            std::fs::create_dir_all(&logs_dir)?;

            let writer = FileRotate::new(
                logs_dir.join("logs.log"),
                AppendCount::new(20),
                ContentLimit::Bytes(5 * 1024 * 1024),
                Compression::OnRotate(1),
                None,
            );

            let (file_non_blocking, file_guard) = tracing_appender::non_blocking(writer);
            // A supervisor may not consume stderr, which would hang the app.
            // Limit the number of buffered lines to avoid blowing up the memory
            // and drop the lines that go over the buffer limit with lossy=true.
            let (stderr_non_blocking, stderr_guard) = NonBlockingBuilder::default()
                .lossy(true)
                .buffered_lines_limit(10_000)
                .finish(std::io::stderr());

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(
                    file_non_blocking
                        .with_max_level(tracing::Level::INFO)
                        .and(stderr_non_blocking),
                )
                .with_ansi(false)
                .init();

            Ok(Some(LoggingGuards {
                _guards: vec![file_guard, stderr_guard],
            }))
        }
    }
}
