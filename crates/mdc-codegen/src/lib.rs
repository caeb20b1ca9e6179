//! mdc Code Generator
//!
//! Renders the parsed node sequence to an HTML fragment and hosts the
//! whole-pipeline entry point:
//!
//! ```text
//! source text → Tokenizer → Parser → generate() → HTML string
//! ```
//!
//! Every stage pulls from the previous one, so a document is tokenized,
//! parsed, and rendered in a single pass with no intermediate collections.

pub mod html;

use mdc_lexer::Tokenizer;
use mdc_parser::{ParseError, Parser};

/// Code generation error with the offset of the offending node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Semantic error at offset {offset}: {message}")]
pub struct CodegenError {
    pub message: String,
    pub offset: usize,
}

impl CodegenError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Any error the pipeline can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Compile markdown source to an HTML fragment.
///
/// With `diagnostics` set, stages print the first error to stderr and hand
/// whatever partial output they produced to the next stage instead of
/// failing; never use it where correctness matters.
pub fn compile(source: &str, diagnostics: bool) -> Result<String, CompileError> {
    let tokens = Tokenizer::new(source);
    let nodes = Parser::with_diagnostics(tokens, diagnostics);
    html::generate(nodes, diagnostics)
}
