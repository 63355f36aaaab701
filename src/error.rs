//! Fatal error conditions (spec §7).
//!
//! The parser itself never fails: unmatched openers/closers are represented
//! as tree nodes, not errors. The one fatal condition in the core is a
//! mis-provided edit sequence handed to the [`crate::edits::EditOffsetMapper`].

use crate::length::Length;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MapperError {
    #[error("text edit old_start {old_start:?} is greater than old_end {old_end:?}")]
    InvalidEditRange {
        old_start: Length,
        old_end: Length,
    },

    #[error("text edits overlap: [{a_start:?}, {a_end:?}) and [{b_start:?}, {b_end:?})")]
    OverlappingEdits {
        a_start: Length,
        a_end: Length,
        b_start: Length,
        b_end: Length,
    },
}
