//! Incremental bracket-pair structure recognition for text editors.
//!
//! A [`colorizer::BracketColorizer`] holds a balanced [`ast::AstNode`] tree
//! over a document's bracket structure. On each edit it reparses only the
//! parts of the document an [`edits::EditOffsetMapper`] says actually
//! changed, splicing in whatever of the previous tree a [`reader::NodeReader`]
//! finds still reusable — rather than re-lexing and re-parsing the whole
//! document on every keystroke.
//!
//! ```
//! use bracket_pairs::colorizer::BracketColorizer;
//! use bracket_pairs::tokenizer::StrTokenizer;
//!
//! let mut colorizer = BracketColorizer::new();
//! colorizer.parse_full(StrTokenizer::new("foo(bar) [baz]"));
//! let brackets = colorizer.get_brackets_in_range(
//!     Default::default(),
//!     colorizer.document_length(),
//! );
//! assert_eq!(brackets.len(), 4); // 2 bracket leaves per pair, 2 pairs
//! ```

pub mod ast;
pub mod colorizer;
pub mod edits;
pub mod error;
pub mod length;
pub mod limit;
pub mod parser;
pub mod range;
pub mod reader;
pub mod token;
pub mod tokenizer;

pub use ast::AstNode;
pub use colorizer::BracketColorizer;
pub use edits::{EditOffsetMapper, TextEdit};
pub use error::MapperError;
pub use length::Length;
pub use parser::Parser;
pub use range::{collect_brackets, BracketInRange};
pub use reader::NodeReader;
pub use token::{Token, TokenKind, Tokenizer};
