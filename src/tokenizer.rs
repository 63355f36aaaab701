//! Reference [`Tokenizer`] over a plain `&str` (spec component K,
//! supplementing the interface-only spec component B).
//!
//! A production tokenizer lives alongside a real text buffer and a lexer
//! that understands strings/comments well enough to avoid matching
//! brackets inside them. This one only classifies `[`, `(`, `{` and their
//! closers by category and coalesces everything else into `Text` runs, but
//! implements the same [`Tokenizer`] contract the parser consumes either
//! way.

use crate::length::Length;
use crate::token::{Category, Token, TokenKind, Tokenizer};

/// `[` / `]`
pub const SQUARE: Category = 1;
/// `(` / `)`
pub const PAREN: Category = 2;
/// `{` / `}`
pub const CURLY: Category = 3;

/// Caps how much text a single coalesced `Text` token run may cover, so a
/// pathologically long bracket-free stretch doesn't force the whole
/// remainder into one token.
pub const TEXT_RUN_CAP: usize = 1000;

fn bracket_category(ch: char) -> Option<(Category, bool /* is_opening */)> {
    match ch {
        '[' => Some((SQUARE, true)),
        ']' => Some((SQUARE, false)),
        '(' => Some((PAREN, true)),
        ')' => Some((PAREN, false)),
        '{' => Some((CURLY, true)),
        '}' => Some((CURLY, false)),
        _ => None,
    }
}

pub struct StrTokenizer<'a> {
    chars: Vec<char>,
    text: &'a str,
    pos: usize,
    offset: Length,
    total_length: Length,
    peeked: Option<(Token, usize)>,
    /// Optional classifier a caller can supply so characters other than
    /// the built-in bracket set can still be excluded from `Text` runs
    /// (e.g. to carve out string-literal delimiters). Defaults to
    /// treating everything non-bracket as ordinary text.
    is_other: Option<Box<dyn Fn(char) -> bool>>,
}

impl<'a> StrTokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let total_length = Length::of_str(text);
        Self {
            chars,
            text,
            pos: 0,
            offset: Length::ZERO,
            total_length,
            peeked: None,
            is_other: None,
        }
    }

    pub fn with_classifier(mut self, is_other: impl Fn(char) -> bool + 'static) -> Self {
        self.is_other = Some(Box::new(is_other));
        self
    }

    fn scan_from(&self, start: usize) -> Option<(Token, usize)> {
        let ch = *self.chars.get(start)?;
        if let Some((category, is_opening)) = bracket_category(ch) {
            let length = Length::of_str(&ch.to_string());
            let tok = if is_opening {
                Token::opening(length, category)
            } else {
                Token::closing(length, category)
            };
            return Some((tok, start + 1));
        }

        let mut end = start;
        let mut run = String::new();
        while end < self.chars.len() && end - start < TEXT_RUN_CAP {
            let c = self.chars[end];
            if bracket_category(c).is_some() {
                break;
            }
            // A classified-"other" char never joins an existing run, but
            // always takes up at least one position itself so progress is
            // guaranteed even when every remaining char is "other".
            if let Some(classifier) = &self.is_other {
                if classifier(c) {
                    if run.is_empty() {
                        run.push(c);
                        end += 1;
                    }
                    break;
                }
            }
            run.push(c);
            end += 1;
        }
        Some((Token::text(Length::of_str(&run)), end))
    }
}

impl<'a> Tokenizer for StrTokenizer<'a> {
    fn offset(&self) -> Length {
        self.offset
    }

    fn length(&self) -> Length {
        self.total_length
    }

    fn peek(&mut self) -> Option<Token> {
        if self.peeked.is_none() {
            self.peeked = self.scan_from(self.pos);
        }
        self.peeked.map(|(tok, _)| tok)
    }

    fn read(&mut self) -> Option<Token> {
        let (tok, next_pos) = match self.peeked.take() {
            Some(pair) => pair,
            None => self.scan_from(self.pos)?,
        };
        self.pos = next_pos;
        self.offset = self.offset.add(tok.length);
        Some(tok)
    }

    fn skip(&mut self, amount: Length) {
        self.peeked = None;
        let target = self.offset.add(amount);
        while self.offset < target {
            match self.scan_from(self.pos) {
                Some((tok, next_pos)) => {
                    self.pos = next_pos;
                    self.offset = self.offset.add(tok.length);
                }
                None => break,
            }
        }
    }

    fn get_text(&self) -> String {
        self.text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_brackets_and_text() {
        let mut t = StrTokenizer::new("ab(cd)");
        assert_eq!(t.read().unwrap().kind, TokenKind::Text);
        let open = t.read().unwrap();
        assert_eq!(open.kind, TokenKind::OpeningBracket);
        assert_eq!(open.category, PAREN);
        assert_eq!(t.read().unwrap().kind, TokenKind::Text);
        let close = t.read().unwrap();
        assert_eq!(close.kind, TokenKind::ClosingBracket);
        assert_eq!(close.category, PAREN);
        assert!(t.read().is_none());
    }

    #[test]
    fn skip_advances_past_unread_tokens() {
        let mut t = StrTokenizer::new("abcdef(");
        t.skip(Length::new(0, 6));
        assert_eq!(t.offset(), Length::new(0, 6));
        let tok = t.read().unwrap();
        assert_eq!(tok.kind, TokenKind::OpeningBracket);
    }

    #[test]
    fn peek_is_idempotent() {
        let mut t = StrTokenizer::new("xyz");
        let a = t.peek().unwrap();
        let b = t.peek().unwrap();
        assert_eq!(a, b);
        assert_eq!(t.offset(), Length::ZERO);
    }
}
