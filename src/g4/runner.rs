//! Running the formatter over files
//!
//! [`FormatterEngine`] owns the active [`FormattingRules`] and applies them to
//! sources, single files or whole directory trees. Directories are walked with
//! the `ignore` crate, so `.gitignore`d and hidden files are skipped; only
//! `*.g4` files inside them are picked up. Files named explicitly are always
//! formatted.
use serde::Serialize;
use similar::TextDiff;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::g4::config::FormattingRules;
use crate::g4::diagnostics::FormatterDiagnostic;
use crate::g4::error::FormatError;
use crate::g4::formatting::{format_grammar, FormatterOutput};

/// File extension of ANTLR v4 grammars
pub const GRAMMAR_EXTENSION: &str = "g4";

/// Formatter execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    /// Keep the formatted text in the report for the caller to print
    Stdout,
    /// Only report which files would change, with a diff
    Check,
    /// Rewrite changed files in place
    Write,
}

/// Aggregate formatter run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormatterRunSummary {
    pub files_seen: usize,
    pub files_changed: usize,
    pub files_failed: usize,
    pub warnings: usize,
    pub files_with_warnings: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatterFileReport {
    pub path: PathBuf,
    pub changed: bool,
    pub diagnostics: Vec<FormatterDiagnostic>,
    /// Set when the file could not be read or its header could not be parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unified diff against the input, filled in check mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
    /// Formatted text, filled in stdout mode
    #[serde(skip)]
    pub rendered: Option<String>,
}

impl FormatterFileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            diagnostics: Vec::new(),
            error: None,
            diff: None,
            rendered: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FormatterRunReport {
    pub summary: FormatterRunSummary,
    pub files: Vec<FormatterFileReport>,
}

impl FormatterRunReport {
    /// Whether any file failed to format
    pub fn has_failures(&self) -> bool {
        self.summary.files_failed > 0
    }
}

#[derive(Debug, Clone)]
pub struct FormatterEngine {
    rules: FormattingRules,
}

impl FormatterEngine {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FormattingRules {
        &self.rules
    }

    pub fn format_source(&self, source: &str) -> Result<FormatterOutput, FormatError> {
        format_grammar(source, &self.rules)
    }

    pub fn format_path_to_string(&self, path: &Path) -> Result<String, FormatError> {
        let input = fs::read_to_string(path)?;
        Ok(self.format_source(&input)?.rendered)
    }

    /// Expand `paths` into the list of grammar files to format.
    pub fn collect_grammar_files(&self, paths: &[PathBuf]) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for path in paths {
            if !path.is_dir() {
                files.push(path.clone());
                continue;
            }
            let mut found = Vec::new();
            for entry in ignore::WalkBuilder::new(path).build() {
                let entry = entry.map_err(io::Error::other)?;
                let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
                if is_file && has_grammar_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        }
        Ok(files)
    }

    pub fn run_paths_with_report(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunReport> {
        let files = self.collect_grammar_files(paths)?;
        let mut report = FormatterRunReport {
            summary: FormatterRunSummary::default(),
            files: Vec::with_capacity(files.len()),
        };
        for path in &files {
            report.summary.files_seen += 1;
            let file_report = self.run_file(path, mode)?;
            if file_report.error.is_some() {
                report.summary.files_failed += 1;
            }
            if file_report.changed {
                report.summary.files_changed += 1;
            }
            if !file_report.diagnostics.is_empty() {
                report.summary.warnings += file_report.diagnostics.len();
                report.summary.files_with_warnings += 1;
            }
            report.files.push(file_report);
        }
        Ok(report)
    }

    fn run_file(&self, path: &Path, mode: FormatMode) -> io::Result<FormatterFileReport> {
        let mut file_report = FormatterFileReport::new(path);
        let input = match fs::read_to_string(path) {
            Ok(input) => input,
            Err(err) => {
                log::warn!("cannot read {}: {}", path.display(), err);
                file_report.error = Some(err.to_string());
                return Ok(file_report);
            }
        };
        let output = match self.format_source(&input) {
            Ok(output) => output,
            Err(FormatError::Io(err)) => return Err(err),
            Err(err) => {
                log::warn!("cannot format {}: {}", path.display(), err);
                file_report.error = Some(err.to_string());
                return Ok(file_report);
            }
        };
        file_report.changed = output.rendered != input;
        file_report.diagnostics = output.diagnostics;
        match mode {
            FormatMode::Write if file_report.changed => {
                log::info!("rewriting {}", path.display());
                fs::write(path, &output.rendered)?;
            }
            FormatMode::Check if file_report.changed => {
                let label = path.display().to_string();
                file_report.diff = Some(unified_diff(&label, &input, &output.rendered));
            }
            FormatMode::Stdout => file_report.rendered = Some(output.rendered),
            _ => {}
        }
        Ok(file_report)
    }
}

fn has_grammar_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GRAMMAR_EXTENSION)
}

/// Line diff between the original and the formatted text.
pub fn unified_diff(label: &str, original: &str, formatted: &str) -> String {
    TextDiff::from_lines(original, formatted)
        .unified_diff()
        .context_radius(2)
        .header(&format!("{} (original)", label), &format!("{} (formatted)", label))
        .to_string()
}
