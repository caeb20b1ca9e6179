//! mdc Parser
//!
//! Parses the lexer's token stream into a lazy sequence of AST block nodes
//! using recursive descent over per-node "starts here" predicates. One
//! syntax error aborts the rest of the document; a diagnostics mode prints
//! the error and ends the sequence early instead, for inspecting partial
//! output.

pub mod ast;
pub mod parser;

pub use ast::Node;
pub use parser::{parse, Parser};

/// Parser error with the offset of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Syntax error at offset {offset}: {message}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}
