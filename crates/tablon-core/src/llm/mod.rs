//! Text-generation backends
//!
//! The session only sees [`TextGenerator`]; [`LlmClient`] is the HTTP
//! implementation that dispatches to the configured provider.

mod client;
mod generator;
pub mod parsers;
pub mod providers;

pub use client::LlmClient;
pub use generator::TextGenerator;
pub use parsers::{LlmResponse, ResponseParser};

#[cfg(test)]
pub use generator::MockTextGenerator;
