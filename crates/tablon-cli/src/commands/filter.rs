//! One-shot filter command

use super::outcome::report;
use super::{build_session, SessionOptions};
use crate::console::CliConsole;
use std::path::PathBuf;
use tablon_core::FilterRequest;

pub async fn execute(options: &SessionOptions, text: &str, output: Option<PathBuf>) -> anyhow::Result<()> {
    let console = CliConsole::new(options.verbose);
    let config = options.load_config()?;
    let mut session = build_session(&config, &console)?;
    let output = output.unwrap_or_else(|| config.export.archive_path());

    let spinner = console.spinner("Loading dataset");
    let loaded = session.dataset().await;
    spinner.finish_and_clear();
    loaded?;

    let spinner = console.spinner("Translating request");
    let outcome = session.submit(FilterRequest::new(text)).await;
    spinner.finish_and_clear();

    if !report(&console, &session, &outcome?, &output).await? {
        anyhow::bail!("the generated predicate could not be applied");
    }
    Ok(())
}
