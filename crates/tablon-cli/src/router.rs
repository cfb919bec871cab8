//! Command routing logic for CLI

use crate::args::{Cli, Commands, ConfigAction};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    let options = commands::SessionOptions {
        config_file: cli.config_file.clone(),
        verbose: cli.verbose,
        format: cli.format,
        language: cli.language,
    };

    tracing::debug!(
        "Routing: command={:?}, config_file={}",
        cli.command,
        options.config_file.display()
    );

    match cli.command {
        None => commands::interactive::execute(&options).await,
        Some(Commands::Filter { text, output }) => {
            commands::filter::execute(&options, &text, output).await
        }
        Some(Commands::Apply { predicate, output }) => {
            commands::apply::execute(&options, &predicate, output).await
        }
        Some(Commands::Prompt { text }) => commands::prompt::execute(&options, &text),
        Some(Commands::Schema) => commands::schema::execute(),
        Some(Commands::Config { action }) => route_config(action, &options).await,
    }
}

async fn route_config(action: ConfigAction, options: &commands::SessionOptions) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => commands::config::show(&options.config_file).await,
        ConfigAction::Validate => commands::config::validate(&options.config_file).await,
        ConfigAction::Init { force } => commands::config::init(&options.config_file, force).await,
    }
}
