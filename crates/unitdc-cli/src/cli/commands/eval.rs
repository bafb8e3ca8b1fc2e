//! Eval command handler.

use std::io;

use anyhow::{Result, bail};
use unitdc_core::config::Config;

use crate::modes::line::LineSession;

pub async fn run(config: &Config, exprs: &[String], json: bool) -> Result<()> {
    let mut session = LineSession::start(config, json).await?;

    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    let mut failed = 0;
    for expr in exprs {
        if !session.submit(expr, &mut stdout, &mut stderr)? {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} expressions failed", exprs.len());
    }
    Ok(())
}
