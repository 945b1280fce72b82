//! Error types
use std::fmt;
use std::io;

use crate::g4::diagnostics::FormatterDiagnostic;

/// Why a formatting run produced no output
#[derive(Debug)]
pub enum FormatError {
    /// The output sink failed; whatever was written is unusable
    Io(io::Error),
    /// The grammar header could not be parsed
    Parse(Vec<FormatterDiagnostic>),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Io(err) => write!(f, "Failed to write output: {}", err),
            FormatError::Parse(diagnostics) => {
                write!(f, "Failed to parse grammar")?;
                for diagnostic in diagnostics {
                    write!(f, "\n  {}", diagnostic)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Io(err) => Some(err),
            FormatError::Parse(_) => None,
        }
    }
}

impl From<io::Error> for FormatError {
    fn from(err: io::Error) -> Self {
        FormatError::Io(err)
    }
}
