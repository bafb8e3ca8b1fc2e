//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to a file through a non-blocking
//! writer. Line-oriented modes log to stderr, and only when asked to.
//! `RUST_LOG` always wins over the configured level.

use std::path::{Path, PathBuf};
use std::{fs, io};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Routes tracing output to the configured log file.
///
/// The returned guard flushes pending lines on drop; hold it for the life of
/// the process.
pub fn init_file_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let path = config.file_path();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid log file path {}", path.display()))?;

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.level))
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install file logger")?;

    Ok(guard)
}

/// Routes tracing output to stderr.
pub fn init_stderr_logging(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to install stderr logger")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("unitdc.log");
        let config = LoggingConfig {
            level: "debug".into(),
            file: Some(file.clone()),
        };

        // A global subscriber may already be installed by another test;
        // the directory must exist either way.
        let _guard = init_file_logging(&config);
        assert!(file.parent().unwrap().is_dir());
    }
}
