//! Dry run: print the compiled instruction

use super::SessionOptions;
use std::sync::Arc;
use tablon_core::{PromptCompiler, SchemaRegistry};

pub fn execute(options: &SessionOptions, text: &str) -> anyhow::Result<()> {
    let config = options.load_config()?;
    let compiler = PromptCompiler::new(Arc::new(SchemaRegistry::vehicle_imports()))
        .with_language(config.prompt.language);
    println!("{}", compiler.compile(text));
    Ok(())
}
