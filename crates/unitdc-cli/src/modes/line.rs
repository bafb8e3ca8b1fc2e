//! Line-oriented session driver shared by `repl` and `eval`.
//!
//! Each submitted line becomes one input cell. Cells produced by the
//! submission are printed as they would read in the console:
//! - outputs as `[k]: display` on stdout, newest first
//! - messages as `message: ...` on stderr
//! - errors as `Error: ...` on stderr
//!
//! Events the engine emitted before rejecting a line are printed ahead of
//! the error, even though the transcript drops them.
//!
//! With `json`, every produced cell is written to stdout as one JSON line.

use std::io::Write;

use anyhow::{Context, Result, bail};
use tracing::debug;
use unitdc_core::config::{Config, paths};
use unitdc_core::session::{BootstrapOutcome, output_lines};
use unitdc_core::{Cell, Session, SubmitOutcome};
use unitdc_engine::Loader;
use unitdc_types::EngineLoader;

pub struct LineSession {
    session: Session,
    json: bool,
}

impl LineSession {
    /// Loads the engine with the built-in prelude plus the configured one.
    ///
    /// # Errors
    /// Fails when the engine cannot be loaded.
    pub async fn start(config: &Config, json: bool) -> Result<Self> {
        let prelude = config.prelude_path(&paths::unitdc_home());
        let loader = Loader::new().with_prelude_file(prelude);
        Self::with_loader(Box::new(loader), json).await
    }

    /// Bootstraps a session from any engine loader.
    ///
    /// # Errors
    /// Fails when the loader reports a bootstrap error.
    pub async fn with_loader(
        loader: Box<dyn EngineLoader>,
        json: bool,
    ) -> Result<Self> {
        let mut session = Session::new();
        match session.bootstrap(loader).await {
            Some(BootstrapOutcome::Ready) => Ok(Self { session, json }),
            Some(BootstrapOutcome::Failed(err)) => Err(err.into()),
            Some(BootstrapOutcome::Ignored) | None => bail!("engine bootstrap did not run"),
        }
    }

    /// Submits `text` as a new cell and prints what it produced.
    ///
    /// Returns whether the engine accepted the text.
    ///
    /// # Errors
    /// Fails on session precondition errors or when writing output fails.
    pub fn submit(
        &mut self,
        text: &str,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> Result<bool> {
        self.session.update_active_text(text)?;
        let submitted = self.session.cells().len() - 1;
        let outcome = self.session.submit()?;
        debug!(?outcome, "Line submitted");

        if let SubmitOutcome::Failed { discarded, .. } = &outcome {
            for cell in discarded {
                self.print_cell(cell, out, err)?;
            }
        }

        // Everything between the submitted cell and the fresh input.
        let cells = self.session.cells();
        for cell in &cells[submitted + 1..cells.len() - 1] {
            self.print_cell(cell, out, err)?;
        }
        out.flush()?;
        Ok(outcome.is_success())
    }

    /// Writes `In [n]: ` for the active input.
    ///
    /// # Errors
    /// Fails when writing fails.
    pub fn prompt(&self, err: &mut impl Write) -> Result<()> {
        let number = self.session.cells().iter().filter(|c| c.is_input()).count();
        write!(err, "In [{number}]: ")?;
        err.flush()?;
        Ok(())
    }

    fn print_cell(&self, cell: &Cell, out: &mut impl Write, err: &mut impl Write) -> Result<()> {
        if self.json {
            let line = serde_json::to_string(cell).context("serialize cell")?;
            writeln!(out, "{line}")?;
            return Ok(());
        }
        match cell {
            Cell::Output { results } => {
                for line in output_lines(results) {
                    writeln!(out, "{line}")?;
                }
            }
            Cell::Message { text } => writeln!(err, "message: {text}")?,
            Cell::Error { text } => writeln!(err, "Error: {text}")?,
            Cell::Input { .. } => {}
        }
        Ok(())
    }
}
