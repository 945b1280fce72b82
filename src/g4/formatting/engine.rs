//! Formatting engine
//!
//! [`GrammarFormatter`] is the [`Visitor`] that turns a syntax tree back into
//! text. For every event it first asks the hidden-token locator for comments
//! that belong before it, then lets the context stack decide the layout:
//!
//! - entering a node pushes a frame for recognized categories, and starts a
//!   new line for block-level ones;
//! - a leaf runs the operations planned by the active frame;
//! - leaving a node flushes the comments after it and pops its frame,
//!   restoring the indentation it started with.
//!
//! One formatter serves exactly one run and is consumed by [`finish`].
//!
//! [`finish`]: GrammarFormatter::finish
use log::{debug, trace, warn};
use std::io::Write;

use super::context::{ContextStack, LayoutOp};
use super::hidden::HiddenTokenLocator;
use super::indent::IndentTracker;
use super::spacing::SpacingPolicy;
use super::writer::OutputWriter;
use crate::g4::config::FormattingRules;
use crate::g4::diagnostics::FormatterDiagnostic;
use crate::g4::error::FormatError;
use crate::g4::lexing::{Token, TokenStream};
use crate::g4::parsing::{Category, Entry, NodeKind, SyntaxNode, Visitor};

pub struct GrammarFormatter<'s, W: Write> {
    stream: &'s TokenStream,
    writer: OutputWriter<W>,
    spacing: SpacingPolicy,
    indent: IndentTracker,
    contexts: ContextStack,
    hidden: HiddenTokenLocator,
    diagnostics: Vec<FormatterDiagnostic>,
    previous: String,
    break_pending: bool,
}

impl<'s, W: Write> GrammarFormatter<'s, W> {
    pub fn new(stream: &'s TokenStream, sink: W, rules: &FormattingRules) -> Self {
        Self {
            stream,
            writer: OutputWriter::new(sink),
            spacing: SpacingPolicy::from_rules(rules),
            indent: IndentTracker::new(rules.indent_width),
            contexts: ContextStack::new(),
            hidden: HiddenTokenLocator::from_rules(rules),
            diagnostics: Vec::new(),
            previous: String::new(),
            break_pending: false,
        }
    }

    /// Current indentation depth
    pub fn indent_depth(&self) -> usize {
        self.indent.depth()
    }

    /// Terminate the output and return the sink with the collected diagnostics.
    pub fn finish(self) -> Result<(W, Vec<FormatterDiagnostic>), FormatError> {
        if self.indent.depth() != 0 {
            warn!("formatting ended at indentation depth {}", self.indent.depth());
        }
        let sink = self.writer.finish()?;
        Ok((sink, self.diagnostics))
    }

    fn line_break(&mut self) -> std::io::Result<()> {
        self.break_pending = false;
        self.writer.line_break(self.indent.render())
    }

    fn emit(&mut self, text: &str) -> std::io::Result<()> {
        if self.break_pending {
            self.line_break()?;
        }
        let category = self.contexts.active();
        if category == Category::ActionBlock
            && self.writer.at_line_start()
            && text.trim().is_empty()
        {
            return Ok(());
        }
        let at_line_start = self.writer.at_line_start();
        if self
            .spacing
            .needs_space(&self.previous, text, category, at_line_start)
        {
            self.writer.write_raw(" ")?;
        }
        self.write_text(text)
    }

    fn write_comment(&mut self, category: Category, text: &str) -> std::io::Result<()> {
        if category != Category::GrammarSpec || self.break_pending {
            self.line_break()?;
        }
        self.write_text(text)?;
        if matches!(category, Category::GrammarSpec | Category::GrammarType) {
            self.line_break()?;
        } else if text.starts_with("//") {
            self.break_pending = true;
        }
        Ok(())
    }

    fn write_comments(&mut self, category: Category, comments: Vec<&Token>) -> std::io::Result<()> {
        for comment in comments {
            trace!("comment {} in {:?}", comment.index, category);
            self.write_comment(category, comment.text.trim_end())?;
        }
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> std::io::Result<()> {
        self.writer.write_raw(text)?;
        self.previous.clear();
        self.previous.push_str(text);
        Ok(())
    }

    fn leaf(&mut self, token: &Token) -> Result<(), FormatError> {
        let comments = self.hidden.flush_before(token.index, self.stream);
        let category = self.contexts.active();
        self.write_comments(category, comments)?;
        for op in self.contexts.plan(token.kind, &token.text) {
            match op {
                LayoutOp::Break => self.line_break()?,
                LayoutOp::Indent => self.indent.increment(),
                LayoutOp::Dedent => self.indent.decrement(),
                LayoutOp::Emit => self.emit(&token.text)?,
            }
        }
        debug!("{:?} : {}", category, token.text);
        Ok(())
    }
}

impl<'s, W: Write> Visitor for GrammarFormatter<'s, W> {
    type Error = FormatError;

    fn visit_node(&mut self, node: &SyntaxNode) -> Result<(), FormatError> {
        trace!("enter {:?}", node.kind);
        let category = node.category();
        if let Some(span) = node.span {
            let comments = self.hidden.flush_left(span, self.stream);
            self.write_comments(category, comments)?;
        }
        if node.kind == NodeKind::Recovered {
            let line = node
                .span
                .and_then(|span| self.stream.get(span.start))
                .map_or(0, |token| token.line);
            warn!("line {}: could not parse this part of the grammar; keeping it as is", line);
            self.diagnostics.push(FormatterDiagnostic::new(
                line,
                "could not parse this part of the grammar; kept verbatim",
            ));
        }
        match category.entry() {
            Entry::Block => {
                self.contexts.push(category, self.indent.depth());
                self.line_break()?;
            }
            Entry::Inline => self.contexts.push(category, self.indent.depth()),
            Entry::Inherit => {}
        }
        Ok(())
    }

    fn leave_node(&mut self, node: &SyntaxNode) -> Result<(), FormatError> {
        let category = node.category();
        if let Some(span) = node.span {
            let comments = self.hidden.flush_right(span, self.stream);
            self.write_comments(category, comments)?;
        }
        if category.owns_frame() {
            if let Some(frame) = self.contexts.pop() {
                self.indent.restore(frame.saved_indent);
            }
        }
        trace!("leave {:?}", node.kind);
        Ok(())
    }

    fn visit_token(&mut self, token: &Token) -> Result<(), FormatError> {
        self.leaf(token)
    }

    fn visit_error(&mut self, token: &Token) -> Result<(), FormatError> {
        debug!("recovered token {:?}", token.text);
        self.leaf(token)
    }
}
