//! CLI console utilities

use colored::*;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tablon_core::{Dataset, GeneratedPredicate, PredicateFault, TablonError, UnifiedError};

/// Rows shown in table previews
pub const PREVIEW_ROWS: usize = 5;

const MAX_CELL_WIDTH: usize = 18;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Label and value on one line
    pub fn field(&self, label: &str, value: &str) {
        println!("  {:<22} {}", format!("{}:", label).dimmed(), value);
    }

    /// Spinner shown while a slow step runs; finish it with `finish_and_clear`
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn print_predicate(&self, predicate: &GeneratedPredicate) {
        println!("{} {}", "Predicate:".cyan().bold(), predicate.source_text().yellow());
    }

    pub fn print_counts(&self, before: usize, after: usize) {
        println!(
            "{} {} {} {}",
            "Rows:".cyan().bold(),
            before.to_string().bold(),
            "→".dimmed(),
            after.to_string().green().bold()
        );
    }

    /// Fault and the expression that produced it
    pub fn print_fault(&self, predicate: &GeneratedPredicate, fault: &PredicateFault) {
        self.error(&format!("{} ({})", fault, fault.code()));
        eprintln!("  {} {}", "attempted:".dimmed(), predicate.source_text());
        eprintln!("  {}", "Reword the request and try again.".dimmed());
    }

    pub fn print_error(&self, error: &TablonError) {
        self.error(&error.to_string());
        if let Some(context) = error.context() {
            eprintln!("  {}", context.dimmed());
        }
        if error.is_user_retryable() {
            eprintln!("  {}", "The session is still usable; try again.".dimmed());
        }
    }

    /// First rows of `table`, as many columns as fit the terminal
    pub fn print_preview(&self, title: &str, table: &Dataset) {
        println!("{} {}", title.bold(), format!("({} rows)", table.row_count()).dimmed());
        if table.column_count() == 0 {
            return;
        }

        let preview = table.head(PREVIEW_ROWS);
        let term_width = Term::stdout().size().1 as usize;
        let column_width = MAX_CELL_WIDTH + 3;
        let shown = (term_width.max(column_width) / column_width).clamp(1, preview.column_count());

        let header: Vec<String> = preview.column_names()[..shown]
            .iter()
            .map(|name| pad(name))
            .collect();
        println!("  {}", header.join(" │ ").bold());

        for row in 0..preview.row_count() {
            let cells: Vec<String> = preview.columns()[..shown]
                .iter()
                .map(|column| pad(&column.cells()[row].to_string()))
                .collect();
            println!("  {}", cells.join(" │ "));
        }

        if shown < preview.column_count() {
            println!(
                "  {}",
                format!("… {} more columns", preview.column_count() - shown).dimmed()
            );
        }
    }
}

fn pad(value: &str) -> String {
    let mut text: String = value.chars().take(MAX_CELL_WIDTH).collect();
    if value.chars().count() > MAX_CELL_WIDTH {
        text.pop();
        text.push('…');
    }
    format!("{:<width$}", text, width = MAX_CELL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::pad;

    #[test]
    fn test_pad_truncates_long_cells() {
        let padded = pad("A VERY LONG IMPORTER NAME S.A.");
        assert_eq!(padded.chars().count(), 18);
        assert!(padded.ends_with('…'));
        assert_eq!(pad("KIA").trim_end(), "KIA");
    }
}
