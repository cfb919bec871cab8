//! Interactive mode: one condition per line until `exit`

use super::outcome::report;
use super::{build_session, SessionOptions};
use crate::console::CliConsole;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use tablon_core::FilterRequest;

enum Line {
    Quit,
    Help,
    Skip,
    Request(String),
}

fn classify(input: &str) -> Line {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" | "salir" => Line::Quit,
        "help" | "ayuda" | "?" => Line::Help,
        "" => Line::Skip,
        _ => Line::Request(trimmed.to_string()),
    }
}

fn print_help() {
    println!("Describe the rows to keep, for example:");
    println!("  {}", "marca toyota importadas en 2023".cyan());
    println!("  {}", "motos con cilindrada mayor a 150".cyan());
    println!("Type {} to leave.", "exit".bold());
}

pub async fn execute(options: &SessionOptions) -> anyhow::Result<()> {
    let console = CliConsole::new(options.verbose);
    let config = options.load_config()?;
    let mut session = build_session(&config, &console)?;
    let output = config.export.archive_path();

    console.print_header("Tablon");

    let spinner = console.spinner(&format!("Loading {}", config.storage.location()));
    let loaded = session.dataset().await;
    spinner.finish_and_clear();
    let dataset = match loaded {
        Ok(dataset) => dataset,
        Err(e) => {
            console.print_error(&e);
            return Err(e.into());
        }
    };
    console.print_preview("Dataset", &dataset);
    println!("Type 'help' for examples, 'exit' to quit.");

    let theme = ColorfulTheme::default();
    loop {
        println!();
        let input: String = match Input::with_theme(&theme)
            .with_prompt("Condition")
            .allow_empty(true)
            .interact_text()
        {
            Ok(input) => input,
            Err(_) => break,
        };

        let text = match classify(&input) {
            Line::Quit => break,
            Line::Help => {
                print_help();
                continue;
            }
            Line::Skip => continue,
            Line::Request(text) => text,
        };

        let spinner = console.spinner("Translating request");
        let submitted = session.submit(FilterRequest::new(text)).await;
        spinner.finish_and_clear();

        let outcome = match submitted {
            Ok(outcome) => outcome,
            Err(e) => {
                console.print_error(&e);
                continue;
            }
        };

        match report(&console, &session, &outcome, &output).await {
            Ok(true) => {}
            Ok(false) => {
                if let Some(last) = session.last_result() {
                    console.info(&format!(
                        "Previous result ({} rows) is still in {}",
                        last.row_count(),
                        output.display()
                    ));
                }
            }
            Err(e) => console.error(&format!("{:#}", e)),
        }
    }

    console.success("Bye");
    Ok(())
}
