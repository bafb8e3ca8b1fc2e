//! Reference calculation engine for UnitDC.
//!
//! A stack-based (RPN) interpreter over whitespace-separated tokens:
//! - numbers push unitless values
//! - `(sym)` attaches or converts units
//! - single-letter operators print, duplicate, swap or clear the stack
//! - `@base(sym)` / `@derived(sym)` define new units
//!
//! `Interpreter` implements `unitdc_types::Engine`; `Loader` builds one with
//! the built-in prelude (plus an optional user prelude file).

mod error;
mod interpreter;
mod loader;
mod prelude;
mod tokenizer;
mod units;
mod value;

pub use error::{EngineError, SyntaxError};
pub use interpreter::Interpreter;
pub use loader::Loader;
pub use prelude::PRELUDE;
pub use tokenizer::{Cursor, Token, Tokenizer};
pub use units::{Dimension, Unit, UnitDef, UnitSystem};
pub use value::Value;
