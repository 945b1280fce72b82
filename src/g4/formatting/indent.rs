//! Indent tracker
//!
//! A single nesting depth, rendered as `depth` copies of the indent unit.
use log::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentTracker {
    depth: usize,
    unit: String,
}

impl IndentTracker {
    pub fn new(width: usize) -> Self {
        Self {
            depth: 0,
            unit: " ".repeat(width),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn increment(&mut self) {
        self.depth += 1;
    }

    /// Decrease the depth. Going below zero is clamped and logged.
    pub fn decrement(&mut self) {
        match self.depth.checked_sub(1) {
            Some(depth) => self.depth = depth,
            None => warn!("indentation would drop below zero; keeping it at zero"),
        }
    }

    /// Return to a depth saved earlier, logging any drift.
    pub fn restore(&mut self, depth: usize) {
        if self.depth != depth {
            warn!(
                "indentation drifted from {} to {}; restoring {}",
                depth, self.depth, depth
            );
        }
        self.depth = depth;
    }

    pub fn render(&self) -> String {
        self.unit.repeat(self.depth)
    }
}

impl Default for IndentTracker {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let mut indent = IndentTracker::default();
        assert_eq!(indent.render(), "");
        indent.increment();
        indent.increment();
        assert_eq!(indent.render(), "      ");
        indent.decrement();
        assert_eq!(indent.render(), "   ");
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut indent = IndentTracker::new(2);
        indent.decrement();
        assert_eq!(indent.depth(), 0);
    }

    #[test]
    fn test_restore() {
        let mut indent = IndentTracker::new(4);
        indent.increment();
        indent.increment();
        indent.restore(1);
        assert_eq!(indent.depth(), 1);
        assert_eq!(indent.render(), "    ");
    }
}
