//! Asynchronous engine construction.

use std::path::PathBuf;

use futures_util::future::BoxFuture;
use tracing::{debug, info};
use unitdc_types::{BootstrapError, Engine, EngineLoader};

use crate::interpreter::Interpreter;

/// Builds an `Interpreter` with the built-in prelude and an optional
/// user prelude file.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    prelude_file: Option<PathBuf>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prelude_file(mut self, path: Option<PathBuf>) -> Self {
        self.prelude_file = path;
        self
    }

    async fn build(self) -> Result<Interpreter, BootstrapError> {
        let mut interpreter = Interpreter::with_prelude()
            .map_err(|e| BootstrapError::new(format!("built-in prelude: {e}")))?;

        if let Some(path) = self.prelude_file {
            debug!(path = %path.display(), "Reading user prelude");
            let source = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| BootstrapError::new(format!("{}: {e}", path.display())))?;
            interpreter
                .run(&source)
                .map_err(|e| BootstrapError::new(format!("{}: {e}", path.display())))?;
        }

        info!("Engine loaded");
        Ok(interpreter)
    }
}

impl EngineLoader for Loader {
    fn load(self: Box<Self>) -> BoxFuture<'static, Result<Box<dyn Engine>, BootstrapError>> {
        Box::pin(async move {
            let interpreter = self.build().await?;
            Ok(Box::new(interpreter) as Box<dyn Engine>)
        })
    }
}
