//! mdc Lexer
//!
//! Turns markdown source into a lazy stream of typed tokens. Header and
//! ordered-list markers are context-sensitive (legal only at the start of a
//! line); everything no matcher claims falls back to literal text, so
//! tokenization never fails and token spans tile the whole input.
//!
//! Also home to the shared stream plumbing: the random-access [`Cursor`] the
//! tokenizer reads from, and the generic [`Lookahead`] iterator the later
//! pipeline stages peek through.
//!
//! # Example
//!
//! ```
//! use mdc_lexer::{Tokenizer, TokenKind};
//!
//! let tokens = Tokenizer::tokenize("# Hi");
//! assert_eq!(tokens[0].kind, TokenKind::Header);
//! ```

pub mod cursor;
pub mod lookahead;
pub mod token;
pub mod tokenizer;

pub use cursor::Cursor;
pub use lookahead::Lookahead;
pub use token::{Span, Token, TokenKind};
pub use tokenizer::Tokenizer;
