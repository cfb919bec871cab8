//! Backend instruction compilation
//!
//! The instruction is built from the schema registry only, so the column list,
//! casing rules and vocabularies the backend sees can never drift from what the
//! predicate sandbox accepts.

mod compiler;
mod language;

pub use compiler::PromptCompiler;
pub use language::PromptLanguage;
