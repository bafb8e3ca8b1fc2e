//! Repl command handler.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use unitdc_core::config::Config;

use crate::modes::line::LineSession;

pub async fn run(config: &Config) -> Result<()> {
    let mut session = LineSession::start(config, false).await?;

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();

    if interactive {
        session.prompt(&mut stderr)?;
    }
    for line in stdin.lock().lines() {
        let line = line.context("read stdin")?;
        if !line.trim().is_empty() {
            // Failures are reported inline; the repl keeps going.
            session.submit(&line, &mut stdout, &mut stderr)?;
        }
        if interactive {
            session.prompt(&mut stderr)?;
        }
    }
    stdout.flush()?;
    Ok(())
}
