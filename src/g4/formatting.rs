//! Formatter
//!
//! Re-emits a grammar in canonical layout: one rule per block, bodies indented
//! under the rule name, normalized spacing around punctuation, and every
//! comment back at its original relative position.
//!
//! Structure:
//!     [`engine`] walks the syntax tree as a visitor and drives the parts below.
//!     [`hidden`] finds the comments around nodes and leaves, [`context`] keeps
//!     the stack of active constructs and decides line breaks and indentation,
//!     [`spacing`] decides single spaces between tokens, [`indent`] tracks the
//!     depth and [`writer`] owns the output sink.
//!
//! Properties:
//!     Every main-channel token is written once, in order (the end-of-input
//!     marker and action whitespace that directly follows a line break are
//!     dropped). Every comment is written once, in order. Formatting formatted
//!     output again gives the same text.

pub mod context;
pub mod engine;
pub mod hidden;
pub mod indent;
pub mod spacing;
pub mod writer;

use std::io::Write;

use crate::g4::config::FormattingRules;
use crate::g4::diagnostics::FormatterDiagnostic;
use crate::g4::error::FormatError;
use crate::g4::lexing::tokenize;
use crate::g4::parsing::parse_grammar;

pub use engine::GrammarFormatter;

/// Formatted text plus whatever was reported along the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOutput {
    pub rendered: String,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

/// Format a grammar source into a string.
pub fn format_grammar(source: &str, rules: &FormattingRules) -> Result<FormatterOutput, FormatError> {
    let (bytes, diagnostics) = format_grammar_to(source, rules, Vec::new())?;
    let rendered = String::from_utf8(bytes)
        .map_err(|err| FormatError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;
    Ok(FormatterOutput {
        rendered,
        diagnostics,
    })
}

/// Format a grammar source into `sink`, returning the sink and the diagnostics.
pub fn format_grammar_to<W: Write>(
    source: &str,
    rules: &FormattingRules,
    sink: W,
) -> Result<(W, Vec<FormatterDiagnostic>), FormatError> {
    let stream = tokenize(source);
    let tree = parse_grammar(&stream).map_err(FormatError::Parse)?;
    let mut formatter = GrammarFormatter::new(&stream, sink, rules);
    tree.accept(&stream, &mut formatter)?;
    formatter.finish()
}
