//! Token and `Tokenizer` contract (spec component B).
//!
//! The tokenizer itself — built atop a text buffer and a lexical classifier
//! that knows about strings and comments — lives outside this crate. This
//! module only defines the interface the parser consumes.

use crate::length::Length;

/// Identifies a bracket family. Only meaningful when [`TokenKind`] is not
/// [`TokenKind::Text`]. Opaque to the parser.
pub type Category = i32;

/// `category` used for `Text` tokens, which have no bracket family.
pub const TEXT_CATEGORY: Category = -1;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Text,
    OpeningBracket,
    ClosingBracket,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Token {
    pub length: Length,
    pub kind: TokenKind,
    pub category: Category,
}

impl Token {
    pub fn text(length: Length) -> Self {
        Token {
            length,
            kind: TokenKind::Text,
            category: TEXT_CATEGORY,
        }
    }

    pub fn opening(length: Length, category: Category) -> Self {
        Token {
            length,
            kind: TokenKind::OpeningBracket,
            category,
        }
    }

    pub fn closing(length: Length, category: Category) -> Self {
        Token {
            length,
            kind: TokenKind::ClosingBracket,
            category,
        }
    }
}

/// A peekable stream of [`Token`]s over some document.
///
/// `offset` tracks how much of the stream has been consumed; `length` is the
/// immutable total document length. Implementations must rebuild any
/// per-line caches on [`Tokenizer::skip`], since it can jump past content
/// that was never `read`.
pub trait Tokenizer {
    /// Current position in the document.
    fn offset(&self) -> Length;

    /// Total length of the document this tokenizer streams.
    fn length(&self) -> Length;

    /// Returns the next token without consuming it. Idempotent.
    fn peek(&mut self) -> Option<Token>;

    /// Returns and consumes the next token.
    fn read(&mut self) -> Option<Token>;

    /// Advances `offset` by `amount`, invalidating any pending peek.
    fn skip(&mut self, amount: Length);

    /// Debugging aid; not used by the parser.
    fn get_text(&self) -> String;
}
