//! List the registry columns

use colored::*;
use tablon_core::SchemaRegistry;

pub fn execute() -> anyhow::Result<()> {
    let registry = SchemaRegistry::vehicle_imports();

    println!("{}", "Columns".bold().underline());
    for spec in registry.columns() {
        let mut notes = Vec::new();
        if let Some(values) = &spec.allowed_values {
            notes.push(format!("one of {}", values.join(", ")));
        }
        if spec.uppercases_input() {
            notes.push("upper case".to_string());
        }
        if let Some(redirect) = &spec.redirect {
            notes.push(format!("use {} instead", redirect.yellow()));
        }
        if let Some(description) = &spec.description {
            notes.push(description.clone());
        }

        println!(
            "  {:<22} {:<12} {}",
            spec.name.green(),
            spec.semantic_type.label().cyan(),
            notes.join("; ").dimmed()
        );
    }
    Ok(())
}
