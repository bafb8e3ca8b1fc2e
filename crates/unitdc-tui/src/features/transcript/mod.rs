//! Transcript pane: cell rendering and scrolling.

mod render;
mod state;
mod wrap;

pub use render::transcript_lines;
pub use state::TranscriptState;
pub use wrap::wrap_line;
