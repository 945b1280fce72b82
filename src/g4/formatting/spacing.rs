//! Spacing policy
//!
//! Decides whether a single space goes between the previously written text and
//! the next token. The decision only looks at the two texts, the active
//! category and whether the writer sits at the start of a line.
use std::collections::HashSet;

use crate::g4::config::FormattingRules;
use crate::g4::parsing::Category;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacingPolicy {
    no_space_before: HashSet<String>,
    no_space_after: HashSet<String>,
}

impl SpacingPolicy {
    pub fn new<B, A>(no_space_before: B, no_space_after: A) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            no_space_before: no_space_before.into_iter().map(Into::into).collect(),
            no_space_after: no_space_after.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_rules(rules: &FormattingRules) -> Self {
        Self::new(rules.no_space_before.clone(), rules.no_space_after.clone())
    }

    pub fn needs_space(
        &self,
        previous: &str,
        next: &str,
        category: Category,
        at_line_start: bool,
    ) -> bool {
        if at_line_start || category == Category::ActionBlock {
            return false;
        }
        !(self.no_space_after.contains(previous) || self.no_space_before.contains(next))
    }
}

impl Default for SpacingPolicy {
    fn default() -> Self {
        Self::from_rules(&FormattingRules::default())
    }
}
