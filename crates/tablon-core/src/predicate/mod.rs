//! Predicate sandbox
//!
//! Generated filter text goes through four stages:
//! - [`lexer`] and [`parser`]: text to a syntax tree, or a `SyntaxFault`
//! - `compile`: names and types resolved against the dataset and registry
//! - `eval`: the typed [`Predicate`] becomes a row mask
//!
//! [`PredicateSandbox`] runs all of them and returns a [`FilteredResult`].

pub mod ast;
mod compile;
mod eval;
mod fault;
pub mod lexer;
pub mod parser;
mod sandbox;
mod tree;

pub use ast::CompareOp;
pub use fault::PredicateFault;
pub use sandbox::{FilteredResult, GeneratedPredicate, PredicateSandbox};
pub use tree::{
    Comparison, Constant, DatePart, Operand, Predicate, Rhs, TextMatch, TextPattern, Transform,
    ValueKind,
};
