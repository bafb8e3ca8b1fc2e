//! Full-screen terminal front-end for the UnitDC console.
//!
//! Elm-style: `AppState` is mutated only by `update::update`, which returns
//! `UiEffect`s; `render` is pure; `TuiRuntime` owns the terminal and runs
//! effects.

pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};

use anyhow::{Result, bail};
pub use features::{input, keyboard, transcript};
pub use runtime::TuiRuntime;
use tracing::info;
use unitdc_core::config::{Config, paths};
use unitdc_engine::Loader;

use crate::state::AppState;

/// Runs the interactive console until the user quits.
///
/// Must be called from within a multi-threaded tokio runtime; the engine
/// loads on a background task.
///
/// # Errors
/// Fails when stderr is not a terminal or terminal I/O fails.
pub fn run_tui(config: &Config) -> Result<()> {
    if !stderr().is_terminal() {
        bail!(
            "The console requires a terminal.\n\
             Use `unitdc eval '...'` or `unitdc repl` for non-interactive use."
        );
    }

    let prelude = config.prelude_path(&paths::unitdc_home());
    info!(prelude = ?prelude, "Starting console");
    let loader = Loader::new().with_prelude_file(prelude);

    let mut runtime = TuiRuntime::new(AppState::new(config), Box::new(loader))?;
    runtime.run()
}
