//! # g4fmt
//!
//! A pretty-printer for ANTLR v4 grammar files.
//!
//! The formatter lexes a `.g4` grammar (keeping comments and whitespace on a
//! hidden channel), parses it into a syntax tree and walks that tree, writing
//! every token back out with canonical line breaks, indentation and spacing.
//! Comments come back where they were, relative to the surrounding tokens.
//!
//! ```text
//! grammar T;
//! foo : 'a' 'b' ;
//! ```
//!
//! becomes
//!
//! ```text
//! grammar T;
//!
//! foo
//!    : 'a' 'b'
//!    ;
//! ```
//!
//! ## Testing
//!
//! Shared fixtures and token helpers live in the [testing module](g4::testing).

pub mod g4;

pub use g4::{format_grammar, format_grammar_to, FormatError, FormatterDiagnostic, FormatterOutput};
