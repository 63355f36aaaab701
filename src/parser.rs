//! Incremental recursive-descent parser (spec component G).
//!
//! `Parser` drives a [`Tokenizer`] and, when reparsing, consults a
//! [`NodeReader`] over the previous tree before asking the tokenizer for
//! anything: if the reader hands back a reusable subtree at the current
//! offset, the tokenizer is fast-forwarded past it with
//! [`Tokenizer::skip`] instead of being asked to re-lex that span.

use std::rc::Rc;

use crate::ast::{
    empty_list, merge23_trees, AstNode, BracketNode, ExpectedClosers, InvalidBracketNode,
    PairNode, TextNode,
};
use crate::edits::EditOffsetMapper;
use crate::length::Length;
use crate::limit::LimitTracker;
use crate::reader::NodeReader;
use crate::token::{TokenKind, Tokenizer};

pub struct Parser<'r, T: Tokenizer> {
    tokenizer: T,
    reader: Option<&'r mut NodeReader>,
    mapper: Option<&'r EditOffsetMapper>,
    limit: LimitTracker,
    bailed: bool,
}

impl<'r, T: Tokenizer> Parser<'r, T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            reader: None,
            mapper: None,
            limit: LimitTracker::default(),
            bailed: false,
        }
    }

    /// Attaches a reader over the previous tree, enabling subtree reuse.
    /// Only reuses nodes verbatim at the current new-document offset when
    /// no `mapper` is attached — attach one via [`Parser::with_mapper`]
    /// whenever the tokenizer streams a document that differs from the one
    /// `reader` was built over.
    pub fn with_reader(mut self, reader: &'r mut NodeReader) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Maps new-document offsets to old-document offsets so `reader` can be
    /// queried correctly after edits have shifted everything downstream of
    /// them.
    pub fn with_mapper(mut self, mapper: &'r EditOffsetMapper) -> Self {
        self.mapper = Some(mapper);
        self
    }

    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.limit = LimitTracker::new(limit);
        self
    }

    /// Parses the whole stream and returns the document root.
    pub fn parse_document(mut self) -> Rc<AstNode> {
        let expected = ExpectedClosers::new();
        self.parse_list(&expected)
    }

    /// Parses children until a closing bracket whose category is in
    /// `expected` is seen (left unconsumed for whichever ancestor
    /// enrolled that category) or the stream is exhausted. Per the
    /// matching policy, `expected` accumulates every enclosing category
    /// on the way down rather than just the innermost one, so a single
    /// closer can terminate several nested unclosed levels at once; a
    /// nested opener of an already-expected category does not get a
    /// second enrollment (`ExpectedClosers::insert` is a no-op then).
    fn parse_list(&mut self, expected: &ExpectedClosers) -> Rc<AstNode> {
        let mut children = Vec::new();
        loop {
            if self.bailed {
                break;
            }
            match self.tokenizer.peek() {
                None => break,
                Some(tok) if tok.kind == TokenKind::ClosingBracket => {
                    if expected.contains(tok.category) {
                        break;
                    }
                    self.tokenizer.read();
                    children.push(Rc::new(AstNode::InvalidBracket(InvalidBracketNode {
                        length: tok.length,
                        category: tok.category,
                    })));
                }
                _ => {
                    if let Some(child) = self.parse_child(expected) {
                        children.push(child);
                    } else {
                        break;
                    }
                }
            }
        }
        merge23_trees(children)
    }

    /// Parses exactly one child: a reused subtree, a coalesced text run, or
    /// a bracket pair (recursing into its contents).
    fn parse_child(&mut self, expected: &ExpectedClosers) -> Option<Rc<AstNode>> {
        if let Some(reused) = self.try_reuse(expected) {
            return Some(reused);
        }

        let first = self.tokenizer.peek()?;
        match first.kind {
            TokenKind::Text => Some(self.parse_text_run()),
            TokenKind::OpeningBracket => Some(self.parse_bracket_pair(expected)),
            TokenKind::ClosingBracket => {
                // Callers check for closing brackets before calling
                // parse_child for anything but the very first token; this
                // only fires when a stray closer opens a list with no
                // enclosing context at all.
                self.tokenizer.read();
                Some(Rc::new(AstNode::InvalidBracket(InvalidBracketNode {
                    length: first.length,
                    category: first.category,
                })))
            }
        }
    }

    fn try_reuse(&mut self, expected: &ExpectedClosers) -> Option<Rc<AstNode>> {
        let new_offset = self.tokenizer.offset();

        let max_len = match self.mapper {
            Some(mapper) => {
                let max_len = mapper.get_distance_to_next_change(new_offset);
                // Sitting inside (or at the start of) an edit: nothing old
                // to reuse here, the tokenizer must produce this content.
                if max_len == Some(Length::ZERO) {
                    return None;
                }
                max_len
            }
            None => None,
        };
        let old_offset = match self.mapper {
            Some(mapper) => mapper.get_offset_before_change(new_offset),
            None => new_offset,
        };

        let reader = self.reader.as_mut()?;
        let reused = reader.read_longest_node_at(old_offset, max_len, expected)?;

        self.tokenizer.skip(reused.length());
        Some(reused)
    }

    fn parse_text_run(&mut self) -> Rc<AstNode> {
        let mut length = Length::ZERO;
        while let Some(tok) = self.tokenizer.peek() {
            if tok.kind != TokenKind::Text {
                break;
            }
            self.tokenizer.read();
            length = length.add(tok.length);
        }
        Rc::new(AstNode::Text(TextNode { length }))
    }

    fn parse_bracket_pair(&mut self, expected: &ExpectedClosers) -> Rc<AstNode> {
        let opening_tok = self.tokenizer.read().expect("peeked as OpeningBracket");
        let opening = BracketNode {
            length: opening_tok.length,
            category: opening_tok.category,
        };

        self.limit.consume();
        if self.limit.limited() {
            self.bailed = true;
            let tail = self.drain_remaining_as_text();
            return Rc::new(AstNode::Pair(PairNode {
                length: opening.length.add(tail.length()),
                category: opening.category,
                opening,
                child: Some(tail),
                closing: None,
            }));
        }

        let mut child_expected = expected.clone();
        child_expected.insert(opening.category);
        let child = self.parse_list(&child_expected);
        self.limit.release();

        // `parse_list` only stops at a closer in `child_expected`, which
        // covers every ancestor category as well as our own. If the
        // closer it stopped on isn't ours, it belongs to some outer
        // level instead: leave it unconsumed so that level (or the
        // stray-closer handling in its own `parse_list`) sees it.
        let closing = match self.tokenizer.peek() {
            Some(tok) if tok.kind == TokenKind::ClosingBracket && tok.category == opening.category => {
                self.tokenizer.read();
                Some(BracketNode {
                    length: tok.length,
                    category: tok.category,
                })
            }
            _ => None,
        };

        let mut length = opening.length.add(child.length());
        if let Some(c) = closing {
            length = length.add(c.length);
        }

        let child = if child.is_empty_list() { None } else { Some(child) };

        Rc::new(AstNode::Pair(PairNode {
            length,
            category: opening.category,
            opening,
            child,
            closing,
        }))
    }

    /// Reads everything left in the tokenizer into one `Text` node, used
    /// once the recursion budget is exhausted.
    fn drain_remaining_as_text(&mut self) -> Rc<AstNode> {
        let mut length = Length::ZERO;
        while let Some(tok) = self.tokenizer.read() {
            length = length.add(tok.length);
        }
        if length.is_zero() {
            empty_list()
        } else {
            Rc::new(AstNode::Text(TextNode { length }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{StrTokenizer, PAREN, SQUARE};

    fn parse(input: &str) -> Rc<AstNode> {
        let tokenizer = StrTokenizer::new(input);
        Parser::new(tokenizer).parse_document()
    }

    fn collect_leaf_kinds(node: &Rc<AstNode>, out: &mut Vec<&'static str>) {
        match &**node {
            AstNode::List(l) => {
                for item in &l.items {
                    collect_leaf_kinds(item, out);
                }
            }
            AstNode::Text(_) => out.push("text"),
            AstNode::Bracket(_) => out.push("bracket"),
            AstNode::InvalidBracket(_) => out.push("invalid"),
            AstNode::Pair(p) => {
                out.push(if p.closing.is_some() { "pair" } else { "unclosed" });
                if let Some(c) = &p.child {
                    collect_leaf_kinds(c, out);
                }
            }
        }
    }

    #[test]
    fn parses_flat_text() {
        let root = parse("hello world");
        assert_eq!(root.length(), Length::new(0, 11));
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        assert_eq!(kinds, vec!["text"]);
    }

    #[test]
    fn parses_balanced_pair() {
        let root = parse("a(b)c");
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        assert_eq!(kinds, vec!["text", "pair", "text", "text"]);
    }

    #[test]
    fn parses_nested_pairs() {
        let root = parse("([{}])");
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        assert_eq!(kinds, vec!["pair", "pair", "pair"]);
    }

    #[test]
    fn unmatched_opening_bracket_becomes_unclosed_pair() {
        let root = parse("(abc");
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        assert_eq!(kinds, vec!["unclosed", "text"]);
    }

    #[test]
    fn stray_closing_bracket_becomes_invalid() {
        let root = parse("a)b");
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        assert_eq!(kinds, vec!["text", "invalid", "text"]);
    }

    #[test]
    fn mismatched_closer_is_invalid_and_outer_pair_stays_unclosed() {
        let root = parse("(a}b)");
        let mut kinds = Vec::new();
        collect_leaf_kinds(&root, &mut kinds);
        // `}` doesn't match the open `(`, so it's an InvalidBracket inside
        // the pair's content, and the pair keeps scanning for its own `)`.
        assert_eq!(kinds, vec!["pair", "text", "invalid", "text"]);
    }

    #[test]
    fn scenario_s3_open_paren_then_wrong_closer_is_unclosed_with_invalid_child() {
        // spec.md scenario S3: `(]` -> root `Pair(cat=2, closing=null)` whose
        // child is `InvalidBracket`, total length (0,2).
        let root = parse("(]");
        assert_eq!(root.length(), Length::new(0, 2));
        match &*root {
            AstNode::Pair(p) => {
                assert!(p.closing.is_none());
                match p.child.as_deref() {
                    Some(AstNode::InvalidBracket(_)) => {}
                    other => panic!("expected InvalidBracket child, got {other:?}"),
                }
            }
            other => panic!("expected root Pair, got {other:?}"),
        }
    }

    #[test]
    fn interleaved_closers_match_by_set_not_by_stack() {
        // `([)]`: `)` closes the enclosing `(` even though `[` opened more
        // recently, because the matching policy is set-based rather than
        // stack-based. `[` is left unclosed, and the trailing `]` is a
        // stray invalid bracket at the top level.
        let root = parse("([)]");
        assert_eq!(root.length(), Length::new(0, 4));
        let list = root.as_list().expect("two top-level items");
        assert_eq!(list.items.len(), 2);

        match &*list.items[0] {
            AstNode::Pair(outer) => {
                assert_eq!(outer.category, PAREN);
                assert!(outer.closing.is_some());
                match outer.child.as_deref() {
                    Some(AstNode::Pair(inner)) => {
                        assert_eq!(inner.category, SQUARE);
                        assert!(inner.closing.is_none());
                        assert!(inner.child.is_none());
                    }
                    other => panic!("expected unclosed `[` child, got {other:?}"),
                }
            }
            other => panic!("expected outer Pair, got {other:?}"),
        }

        match &*list.items[1] {
            AstNode::InvalidBracket(b) => assert_eq!(b.category, SQUARE),
            other => panic!("expected trailing stray `]`, got {other:?}"),
        }
    }

    #[test]
    fn deeply_nested_input_bails_out_past_recursion_limit() {
        let input = "(".repeat(10);
        let tokenizer = StrTokenizer::new(&input);
        let root = Parser::new(tokenizer).recursion_limit(3).parse_document();
        assert_eq!(root.length(), Length::new(0, 10));
    }
}
