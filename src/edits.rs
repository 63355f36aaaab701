//! Maps offsets between the old and new document after a batch of edits
//! (spec component F).
//!
//! [`Length`] only represents non-negative displacement, so this mapper
//! never computes a signed net delta. Instead it walks the edit list once,
//! in old-document order, and accumulates each edit's four endpoints
//! (`old_start`, `old_end`, `new_start`, `new_end`) purely through
//! [`Length::add`] and [`Length::diff_non_neg`].

use crate::error::MapperError;
use crate::length::Length;

/// One replacement: the half-open `[old_start, old_end)` range of the
/// previous document is replaced by `new_length` worth of new content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub old_start: Length,
    pub old_end: Length,
    pub new_length: Length,
}

impl TextEdit {
    pub fn new(old_start: Length, old_end: Length, new_length: Length) -> Self {
        Self {
            old_start,
            old_end,
            new_length,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    old_start: Length,
    old_end: Length,
    new_start: Length,
    new_end: Length,
}

pub struct EditOffsetMapper {
    spans: Vec<Span>,
}

impl EditOffsetMapper {
    /// `edits` must be sorted by `old_start` and pairwise non-overlapping;
    /// violating either is a fatal, caller-provided-bad-input error rather
    /// than something the parser can recover from.
    pub fn new(edits: &[TextEdit]) -> Result<Self, MapperError> {
        let mut spans = Vec::with_capacity(edits.len());
        let mut prev: Option<Span> = None;

        for edit in edits {
            if edit.old_start > edit.old_end {
                return Err(MapperError::InvalidEditRange {
                    old_start: edit.old_start,
                    old_end: edit.old_end,
                });
            }
            if let Some(p) = prev {
                if edit.old_start < p.old_end {
                    return Err(MapperError::OverlappingEdits {
                        a_start: p.old_start,
                        a_end: p.old_end,
                        b_start: edit.old_start,
                        b_end: edit.old_end,
                    });
                }
            }

            let new_start = match prev {
                None => edit.old_start,
                Some(p) => p.new_end.add(p.old_end.diff_non_neg(edit.old_start)),
            };
            let new_end = new_start.add(edit.new_length);

            let span = Span {
                old_start: edit.old_start,
                old_end: edit.old_end,
                new_start,
                new_end,
            };
            spans.push(span);
            prev = Some(span);
        }

        Ok(Self { spans })
    }

    /// Maps `new_offset`, which must fall outside every edit's
    /// `[new_start, new_end)` range, back to the corresponding offset in
    /// the previous document.
    pub fn get_offset_before_change(&self, new_offset: Length) -> Length {
        match self.enclosing_span(new_offset) {
            None => new_offset,
            Some(span) => span.old_end.add(span.new_end.diff_non_neg(new_offset)),
        }
    }

    /// Distance from `new_offset` to the start of the next edit in the new
    /// document, `ZERO` if `new_offset` already sits inside one, or `None`
    /// if there is no later edit (the caller may read to the end of the
    /// document).
    pub fn get_distance_to_next_change(&self, new_offset: Length) -> Option<Length> {
        self.spans
            .iter()
            .find(|span| span.new_end > new_offset)
            .map(|span| new_offset.diff_non_neg(span.new_start))
    }

    /// Span that ends at or before `new_offset`, i.e. the most recent edit
    /// fully behind this position. `None` means `new_offset` is before the
    /// first edit entirely.
    fn enclosing_span(&self, new_offset: Length) -> Option<Span> {
        self.spans
            .iter()
            .rev()
            .find(|span| span.new_end <= new_offset)
            .copied()
    }
}
