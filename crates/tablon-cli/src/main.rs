//! Tablon CLI application
//!
//! Filter the vehicle import table by describing the rows you want.
//!
//! - `tablon`: interactive loop, one condition per line
//! - `tablon filter "<text>"`: one request, archive written and exit
//! - `tablon apply "<predicate>"`: skip the backend and run a predicate directly
//! - `tablon prompt "<text>"`: print the instruction that would be sent
//! - `tablon schema`: list the known columns
//! - `tablon config init|show|validate`

mod args;
mod commands;
mod console;
mod logging;
mod router;

use clap::Parser;

pub use args::{Cli, Commands, ConfigAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&cli);
    router::route(cli).await
}
