//! Top-level entry point tying the parser, reader and edit mapper together
//! into the incremental session an editor actually drives (spec component
//! L, supplementing the distilled spec's bare component list).

use std::rc::Rc;

use crate::ast::{empty_list, AstNode, ExpectedClosers};
use crate::edits::{EditOffsetMapper, TextEdit};
use crate::error::MapperError;
use crate::length::Length;
use crate::parser::Parser;
use crate::range::{collect_brackets, BracketInRange};
use crate::reader::NodeReader;
use crate::token::Tokenizer;

/// Owns the current bracket-pair tree for a single document and drives
/// reparses as edits come in.
pub struct BracketColorizer {
    root: Rc<AstNode>,
}

impl Default for BracketColorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BracketColorizer {
    pub fn new() -> Self {
        Self { root: empty_list() }
    }

    pub fn root(&self) -> &Rc<AstNode> {
        &self.root
    }

    pub fn document_length(&self) -> Length {
        self.root.length()
    }

    /// Full parse with no subtree reuse, for the initial load of a
    /// document or whenever the caller has no reliable old tree.
    pub fn parse_full<T: Tokenizer>(&mut self, tokenizer: T) {
        self.root = Parser::new(tokenizer).parse_document();
    }

    /// Reparses after a batch of edits, reusing unaffected subtrees from
    /// the current tree. `tokenizer` must stream the *new* document;
    /// `edits` describes the changes in old-document coordinates.
    pub fn handle_content_changed<T: Tokenizer>(
        &mut self,
        tokenizer: T,
        edits: &[TextEdit],
    ) -> Result<(), MapperError> {
        let mapper = EditOffsetMapper::new(edits)?;
        let mut reader = NodeReader::new(self.root.clone());
        self.root = Parser::new(tokenizer)
            .with_reader(&mut reader)
            .with_mapper(&mapper)
            .parse_document();
        Ok(())
    }

    /// Spec §5's token-range-changed case: some ranges were reclassified
    /// (e.g. a bracket went from "live code" to "inside a string") without
    /// any actual text changing. Modeled as a batch of zero-net-length
    /// edits covering those ranges, so it reuses the exact same reparse
    /// path as a real content change instead of a second, divergent one.
    pub fn handle_token_ranges_changed<T: Tokenizer>(
        &mut self,
        tokenizer: T,
        ranges: &[(Length, Length)],
    ) -> Result<(), MapperError> {
        let edits: Vec<TextEdit> = ranges
            .iter()
            .map(|(start, end)| TextEdit::new(*start, *end, start.diff_non_neg(*end)))
            .collect();
        self.handle_content_changed(tokenizer, &edits)
    }

    pub fn get_brackets_in_range(&self, start: Length, end: Length) -> Vec<BracketInRange> {
        collect_brackets(&self.root, start, end)
    }

    /// Whether the current root node can stand as-is if reused wholesale
    /// (mirrors [`crate::ast::can_be_reused`] with an empty ancestor set,
    /// i.e. as if reusing at the document root).
    pub fn root_can_be_reused(&self) -> bool {
        crate::ast::can_be_reused(&self.root, &ExpectedClosers::new())
    }
}
