//! Apply a hand-written predicate

use super::outcome::report;
use super::SessionOptions;
use crate::console::CliConsole;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tablon_core::llm::TextGenerator;
use tablon_core::{FilterSession, GeneratedPredicate, TablonError, TablonResult};

/// Stand-in generator; `apply` never translates
struct NoBackend;

#[async_trait]
impl TextGenerator for NoBackend {
    async fn generate(&self, _instruction: &str) -> TablonResult<String> {
        Err(TablonError::translation_unavailable(
            "no backend is configured for apply",
        ))
    }
}

pub async fn execute(options: &SessionOptions, predicate: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let console = CliConsole::new(options.verbose);
    let config = options.load_config()?;
    let mut session = FilterSession::from_config(&config, Arc::new(NoBackend))?;
    let output = output.unwrap_or_else(|| config.export.archive_path());

    let spinner = console.spinner("Loading dataset");
    let outcome = session
        .apply_predicate(GeneratedPredicate::new(predicate))
        .await;
    spinner.finish_and_clear();

    if !report(&console, &session, &outcome?, &output).await? {
        anyhow::bail!("the predicate could not be applied");
    }
    Ok(())
}
