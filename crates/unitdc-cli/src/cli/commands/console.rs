//! Interactive console handler.

use anyhow::Result;
use tracing::info;
use unitdc_core::config::Config;
use unitdc_core::logging;

use crate::modes;

pub fn run(config: &Config) -> Result<()> {
    // The TUI owns the terminal; logs go to a file. Guard lives until exit.
    let _guard = logging::init_file_logging(&config.logging)?;
    info!("Launching console");
    modes::run_tui(config)
}
