//! Diagnostics reported while formatting
//!
//! Formatting never fails because a grammar is wrong. When the parser cannot
//! place some tokens it keeps them verbatim and the problem is reported here
//! instead, one entry per region, with the source line it starts on.
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatterDiagnostic {
    /// 1-based source line
    pub line: usize,
    pub message: String,
}

impl FormatterDiagnostic {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for FormatterDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
