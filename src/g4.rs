//! Main module for g4fmt library functionality

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod formatting;
pub mod lexing;
pub mod parsing;
pub mod runner;
pub mod testing;

pub use diagnostics::FormatterDiagnostic;
pub use error::FormatError;
pub use formatting::{format_grammar, format_grammar_to, FormatterOutput};
