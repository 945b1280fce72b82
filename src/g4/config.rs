//! Configuration loading
//!
//! `defaults/g4fmt.default.toml` is embedded into the library so that the
//! documented defaults and runtime behavior stay in sync. Applications layer
//! user files on top of those defaults via [`Loader`] before deserializing
//! into [`G4fmtConfig`].
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/g4fmt.default.toml");

/// Name of the per-directory configuration file picked up by the CLI
pub const LOCAL_CONFIG_FILE: &str = ".g4fmt.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct G4fmtConfig {
    pub formatting: FormattingRules,
}

/// Knobs of the grammar formatter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormattingRules {
    /// Spaces per indentation level
    pub indent_width: usize,
    /// Texts that are never preceded by a space
    pub no_space_before: Vec<String>,
    /// Texts that are never followed by a space
    pub no_space_after: Vec<String>,
    /// Prefixes that mark a hidden token as a comment
    pub comment_openers: Vec<String>,
}

impl Default for FormattingRules {
    fn default() -> Self {
        Self {
            indent_width: 3,
            no_space_before: ["?", "*", ";", ")"].map(String::from).to_vec(),
            no_space_after: vec!["(".to_string()],
            comment_openers: vec!["/*".to_string(), "//".to_string()],
        }
    }
}

/// Comment syntaxes the lexer puts on the hidden channel
const LEXER_COMMENT_OPENERS: [&str; 2] = ["//", "/*"];

impl FormattingRules {
    /// Reject comment openers that would drop comments the lexer produces.
    ///
    /// Every `//` and `/*` comment must be matched by some opener, and an empty
    /// opener would turn whitespace into comments.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comment_openers.iter().any(|opener| opener.is_empty()) {
            return Err(ConfigError::Message(
                "formatting.comment_openers must not contain an empty opener".to_string(),
            ));
        }
        for syntax in LEXER_COMMENT_OPENERS {
            let covered = self
                .comment_openers
                .iter()
                .any(|opener| syntax.starts_with(opener.as_str()));
            if !covered {
                return Err(ConfigError::Message(format!(
                    "formatting.comment_openers must cover `{}` comments",
                    syntax
                )));
            }
        }
        Ok(())
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<G4fmtConfig, ConfigError> {
        let config: G4fmtConfig = self.builder.build()?.try_deserialize()?;
        config.formatting.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<G4fmtConfig, ConfigError> {
    Loader::new().build()
}
