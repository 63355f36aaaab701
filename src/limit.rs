//! Recursion-depth budget for the recursive-descent parser.
//!
//! Bracket nesting depth is driven entirely by document content, so a
//! pathological input (`((((((...`) can otherwise drive `parse_list` /
//! `parse_child` recursion deep enough to overflow the stack. Ported from
//! the teacher crate's `apollo_parser::limit::LimitTracker`.

use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy)]
pub struct LimitTracker {
    current: usize,
    /// High water mark reached over the lifetime of this tracker.
    pub high: usize,
    pub limit: usize,
}

/// Chosen the same way the teacher crate chose its own recursion limit: a
/// comfortable safety margin under where an unoptimized debug build starts
/// to risk a stack overflow.
pub const DEFAULT_RECURSION_LIMIT: usize = 500;

impl Default for LimitTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RECURSION_LIMIT)
    }
}

impl LimitTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            current: 0,
            high: 0,
            limit,
        }
    }

    pub fn limited(&self) -> bool {
        self.current > self.limit
    }

    pub fn consume(&mut self) {
        self.current += 1;
        if self.current > self.high {
            self.high = self.current;
        }
    }

    pub fn release(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

impl fmt::Debug for LimitTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recursion limit: {}, high: {}", self.limit, self.high)
    }
}
