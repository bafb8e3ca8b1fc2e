//! Runtime execution modes.
//!
//! - `line`: line-oriented modes over stdin/stdout (repl, eval)
//! - `tui`: full-screen interactive console (optional feature)

pub mod line;

#[cfg(feature = "tui")]
pub use unitdc_tui::run_tui;

#[cfg(not(feature = "tui"))]
pub fn run_tui(_config: &unitdc_core::config::Config) -> anyhow::Result<()> {
    anyhow::bail!("TUI support is disabled in this build (feature \"tui\").");
}
