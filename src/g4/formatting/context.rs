//! Context dispatcher
//!
//! Layout decisions depend on the innermost recognized construct: a rule body,
//! an options block, a labeled alternative, an action. Each one owns a
//! [`Frame`] on a stack. Entering a recognized node pushes a frame, leaving it
//! pops the frame and the enclosing construct's rules apply again. Nodes of any
//! other kind keep the frame of their nearest recognized ancestor.
//!
//! For a leaf, [`Frame::plan`] returns the layout operations to run, as a
//! pure table lookup. The engine executes them.
use crate::g4::lexing::TokenKind;
use crate::g4::parsing::Category;

/// One step of laying out a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOp {
    /// New line at the current depth
    Break,
    Indent,
    Dedent,
    /// Write the token, spaced by the spacing policy
    Emit,
}

use LayoutOp::{Break, Dedent, Emit, Indent};

const EMIT: &[LayoutOp] = &[Emit];
const SUPPRESS: &[LayoutOp] = &[];
const EMIT_THEN_BREAK: &[LayoutOp] = &[Emit, Break];
const BREAK_THEN_EMIT: &[LayoutOp] = &[Break, Emit];
const OPEN_BODY: &[LayoutOp] = &[Indent, Break, Emit];
const CLOSE_BODY: &[LayoutOp] = &[Break, Emit, Dedent, Break];
const CLOSE_BLOCK: &[LayoutOp] = &[Emit, Dedent, Break];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub category: Category,
    /// Indent depth when the frame was pushed
    pub saved_indent: usize,
    /// Unclosed `(` seen in this frame
    pub paren_depth: usize,
}

impl Frame {
    pub fn new(category: Category, saved_indent: usize) -> Self {
        Self {
            category,
            saved_indent,
            paren_depth: 0,
        }
    }

    /// Layout operations for a leaf of `kind` with literal `text`.
    pub fn plan(&mut self, kind: TokenKind, text: &str) -> &'static [LayoutOp] {
        if kind == TokenKind::Eof {
            return SUPPRESS;
        }
        match self.category {
            Category::OptionsSpec
            | Category::ModeSpec
            | Category::TokensSpec
            | Category::ChannelsSpec => match kind {
                TokenKind::LBrace => OPEN_BODY,
                TokenKind::RBrace => CLOSE_BLOCK,
                _ => EMIT,
            },
            Category::LabeledAlternative => match kind {
                TokenKind::LParen => {
                    self.paren_depth += 1;
                    EMIT
                }
                TokenKind::RParen => {
                    self.paren_depth = self.paren_depth.saturating_sub(1);
                    EMIT
                }
                TokenKind::Semi => CLOSE_BODY,
                TokenKind::Or if self.paren_depth == 0 => BREAK_THEN_EMIT,
                _ => EMIT,
            },
            Category::RuleSpec | Category::LexerRuleSpec => {
                self.paren_depth = 0;
                match kind {
                    TokenKind::Colon => OPEN_BODY,
                    TokenKind::Semi => CLOSE_BODY,
                    TokenKind::DocComment => EMIT_THEN_BREAK,
                    TokenKind::Or if self.category == Category::RuleSpec => BREAK_THEN_EMIT,
                    _ => EMIT,
                }
            }
            Category::GrammarSpec => match kind {
                TokenKind::Semi | TokenKind::DocComment => EMIT_THEN_BREAK,
                _ => EMIT,
            },
            Category::ActionBlock => match (kind, text) {
                (TokenKind::DocComment, _) | (_, ";") | (_, "@") => EMIT_THEN_BREAK,
                _ => EMIT,
            },
            Category::GrammarType | Category::Other => EMIT,
        }
    }
}

/// Stack of active frames, innermost last
#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The category whose rules currently apply
    pub fn active(&self) -> Category {
        self.frames
            .last()
            .map_or(Category::Other, |frame| frame.category)
    }

    pub fn push(&mut self, category: Category, indent: usize) {
        self.frames.push(Frame::new(category, indent));
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn plan(&mut self, kind: TokenKind, text: &str) -> &'static [LayoutOp] {
        match self.frames.last_mut() {
            Some(frame) => frame.plan(kind, text),
            None => EMIT,
        }
    }
}
