//! Recursive-descent parser for the markdown token stream.
//!
//! The grammar is driven by per-node "starts here" predicates consulted in a
//! fixed priority order, at two levels: a block table (blank lines, header,
//! paragraph, list) and inline tables (text-only contexts vs. paragraph
//! bodies, which also allow images and links, image tried first).
//!
//! Parsing is lazy: the parser pulls tokens through a [`Lookahead`] wrapper
//! exactly as far as needed to yield one block node.

use crate::ast::{Header, Link, List, ListItem, Node, Paragraph, Text};
use crate::ParseError;
use mdc_lexer::{Lookahead, Span, Token, TokenKind, Tokenizer};

/// Token stream with one-token backward peek, used by the header rule to
/// check that the marker sits right after a newline (or at the very start).
pub(crate) struct TokenStream<I: Iterator<Item = Token>> {
    tokens: Lookahead<I>,
}

impl<I: Iterator<Item = Token>> TokenStream<I> {
    fn new(tokens: I) -> Self {
        Self {
            tokens: Lookahead::new(tokens),
        }
    }

    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek(0)
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_back(&self) -> Option<&Token> {
        self.tokens.peek_back(1)
    }

    fn advance(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    fn next_if_kind(&mut self, kind: TokenKind) -> Option<Token> {
        if self.peek_kind() == Some(kind) {
            self.advance()
        } else {
            None
        }
    }

    fn eof(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Offset of the current token, or of the end of the last consumed token
    /// once the stream is exhausted.
    fn tell(&mut self) -> usize {
        match self.peek() {
            Some(token) => token.span.start,
            None => self.tokens.peek_back(1).map(|t| t.span.end).unwrap_or(0),
        }
    }

    fn error(&mut self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.tell())
    }
}

type StartsFn<I> = fn(&mut TokenStream<I>) -> bool;
type BlockReadFn<I> = fn(&mut TokenStream<I>) -> Result<Option<Node>, ParseError>;
type InlineReadFn<I> = fn(&mut TokenStream<I>) -> Result<Node, ParseError>;

/// Markdown parser over a lazy token stream.
///
/// Yields one block node per `next` call. The first syntax error ends the
/// sequence: it is yielded as an `Err`, or, with diagnostics on, printed to
/// stderr so the nodes produced so far can still be inspected.
pub struct Parser<I: Iterator<Item = Token>> {
    stream: TokenStream<I>,
    diagnostics: bool,
    done: bool,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: I) -> Self {
        Self::with_diagnostics(tokens, false)
    }

    pub fn with_diagnostics(tokens: I, diagnostics: bool) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            diagnostics,
            done: false,
        }
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<Node, ParseError>> {
        self.done = true;
        if self.diagnostics {
            eprintln!("{error}");
            None
        } else {
            Some(Err(error))
        }
    }
}

impl<I: Iterator<Item = Token>> Iterator for Parser<I> {
    type Item = Result<Node, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let rules = block_rules::<I>();
        loop {
            if self.stream.eof() {
                self.done = true;
                return None;
            }

            let Some((_, read)) = rules.iter().find(|(starts, _)| starts(&mut self.stream))
            else {
                let message = match self.stream.peek_kind() {
                    Some(kind) => format!("Unexpected {kind:?} token"),
                    None => "Unexpected end of input".to_string(),
                };
                let error = self.stream.error(message);
                return self.fail(error);
            };

            match read(&mut self.stream) {
                Ok(Some(node)) => return Some(Ok(node)),
                Ok(None) => continue,
                Err(error) => return self.fail(error),
            }
        }
    }
}

/// Parse a whole source string eagerly.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new(Tokenizer::new(source)).collect()
}

// =========================================================================
// Block rules, in priority order
// =========================================================================

fn block_rules<I: Iterator<Item = Token>>() -> [(StartsFn<I>, BlockReadFn<I>); 4] {
    [
        (blank_lines_start, read_blank_lines),
        (header_starts, read_header),
        (paragraph_starts, read_paragraph),
        (list_starts, read_list),
    ]
}

fn blank_lines_start<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    s.peek_kind() == Some(TokenKind::Newline)
}

/// Blank lines between blocks produce no node.
fn read_blank_lines<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    while s.next_if_kind(TokenKind::Newline).is_some() {}
    Ok(None)
}

/// Headers are only legal right after a newline (or at the start of input);
/// the token before the cursor decides.
fn header_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    let at_block_start = match s.peek_back() {
        None => true,
        Some(token) => token.kind == TokenKind::Newline,
    };
    at_block_start && s.peek_kind() == Some(TokenKind::Header)
}

fn read_header<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    let Some(marker) = s.advance() else {
        return Err(s.error("Unexpected end of input"));
    };
    let start = marker.span.start;
    let level = marker.text.chars().count();

    let mut inline = Vec::new();
    let mut end = marker.span.end;
    while let Some(node) = read_text_node(s)? {
        end = node.span().end;
        inline.push(node);
    }
    if inline.is_empty() {
        return Err(s.error("Expected text"));
    }

    Ok(Some(Node::Header(Header {
        level,
        inline,
        span: Span::new(start, end),
    })))
}

fn paragraph_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    text_rules::<I>().iter().any(|(starts, _)| starts(s))
        || paragraph_only_rules::<I>().iter().any(|(starts, _)| starts(s))
}

/// Greedy: reads paragraph-capable runs until a token no inline rule claims,
/// leaving that token for the next block dispatch.
fn read_paragraph<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    let start = s.tell();
    let mut inline = Vec::new();
    let mut end = start;
    while let Some(node) = read_paragraph_node(s)? {
        end = node.span().end;
        inline.push(node);
    }

    Ok(Some(Node::Paragraph(Paragraph {
        inline,
        span: Span::new(start, end),
    })))
}

fn list_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    s.peek_kind() == Some(TokenKind::ListMarker)
}

/// Reads items while the next token is a list marker; a single newline run
/// between items is consumed and ignored.
fn read_list<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    let start = s.tell();
    let mut items = Vec::new();
    let mut end = start;

    while list_starts(s) {
        let item = read_list_item(s)?;
        end = item.span.end;
        items.push(item);
        if let Some(newline) = s.next_if_kind(TokenKind::Newline) {
            end = newline.span.end;
        }
    }

    Ok(Some(Node::List(List {
        items,
        span: Span::new(start, end),
    })))
}

fn read_list_item<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<ListItem, ParseError> {
    let Some(marker) = s.advance() else {
        return Err(s.error("Unexpected end of input"));
    };
    let start = marker.span.start;
    let index: u32 = marker
        .text
        .trim_end_matches('.')
        .parse()
        .map_err(|_| ParseError::new("Invalid list index", start))?;

    let mut inline = Vec::new();
    let mut end = marker.span.end;
    while let Some(node) = read_text_node(s)? {
        end = node.span().end;
        inline.push(node);
    }
    if inline.is_empty() {
        return Err(s.error("List index must be followed by text"));
    }

    Ok(ListItem {
        index,
        inline,
        span: Span::new(start, end),
    })
}

// =========================================================================
// Inline rules
// =========================================================================

/// Inline kinds legal in headers, list items, and link alt text.
fn text_rules<I: Iterator<Item = Token>>() -> [(StartsFn<I>, InlineReadFn<I>); 4] {
    [
        (plain_starts, read_plain),
        (italic_bold_starts, read_italic_bold),
        (bold_starts, read_bold),
        (italic_starts, read_italic),
    ]
}

/// Extra inline kinds legal only in paragraph bodies. Image sits before link
/// so `![..](..)` is never read as a bare link.
fn paragraph_only_rules<I: Iterator<Item = Token>>() -> [(StartsFn<I>, InlineReadFn<I>); 2] {
    [(image_starts, read_image), (link_starts, read_link)]
}

/// Dispatch over the text-context rules; `Ok(None)` when nothing matches.
fn read_text_node<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    for (starts, read) in text_rules::<I>() {
        if starts(s) {
            return read(s).map(Some);
        }
    }
    Ok(None)
}

/// Dispatch over the full paragraph-context rules.
fn read_paragraph_node<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Option<Node>, ParseError> {
    if let Some(node) = read_text_node(s)? {
        return Ok(Some(node));
    }
    for (starts, read) in paragraph_only_rules::<I>() {
        if starts(s) {
            return read(s).map(Some);
        }
    }
    Ok(None)
}

fn plain_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    s.peek_kind() == Some(TokenKind::Literal)
}

/// A maximal run of adjoining literal tokens, concatenated and trimmed.
fn read_plain<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> Result<Node, ParseError> {
    let Some(first) = s.advance() else {
        return Err(s.error("Expected text"));
    };
    let start = first.span.start;
    let mut end = first.span.end;
    let mut value = first.text;
    while let Some(token) = s.next_if_kind(TokenKind::Literal) {
        end = token.span.end;
        value.push_str(&token.text);
    }

    Ok(Node::Plain(Text {
        value: value.trim().to_string(),
        span: Span::new(start, end),
    }))
}

fn emphasis_starts_with<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
    marker: &str,
) -> bool {
    s.peek()
        .is_some_and(|t| t.kind == TokenKind::Emphasis && t.text == marker)
}

fn italic_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    emphasis_starts_with(s, "*")
}

fn bold_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    emphasis_starts_with(s, "**")
}

fn italic_bold_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    emphasis_starts_with(s, "***")
}

fn read_italic<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> Result<Node, ParseError> {
    read_emphasis(s, "*", "italic", Node::Italic)
}

fn read_bold<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> Result<Node, ParseError> {
    read_emphasis(s, "**", "bold", Node::Bold)
}

fn read_italic_bold<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Node, ParseError> {
    read_emphasis(s, "***", "italic bold", Node::ItalicBold)
}

/// Opening marker, a maximal literal run, then a closing marker with the
/// identical star count.
fn read_emphasis<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
    marker: &str,
    label: &str,
    wrap: fn(Text) -> Node,
) -> Result<Node, ParseError> {
    let Some(open) = s.advance() else {
        return Err(s.error(format!("Expected {label} marker")));
    };
    let start = open.span.start;

    let mut value = String::new();
    while let Some(token) = s.next_if_kind(TokenKind::Literal) {
        value.push_str(&token.text);
    }

    let closing = match s.advance() {
        Some(token) if token.kind == TokenKind::Emphasis && token.text == marker => token,
        Some(token) => {
            return Err(ParseError::new(
                format!("Expected closing {label} marker '{marker}'"),
                token.span.start,
            ))
        }
        None => return Err(s.error(format!("Expected closing {label} marker '{marker}'"))),
    };

    Ok(wrap(Text {
        value: value.trim().to_string(),
        span: Span::new(start, closing.span.end),
    }))
}

fn link_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    s.peek_kind() == Some(TokenKind::LinkAltStart)
}

fn read_link<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> Result<Node, ParseError> {
    Ok(Node::Link(read_link_body(s)?))
}

fn image_starts<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> bool {
    s.peek_kind() == Some(TokenKind::ImageMarker)
}

/// `!` then a full link; the result is retagged as an image, keeping the
/// link's alt, href, and extending the span back to the `!`.
fn read_image<I: Iterator<Item = Token>>(s: &mut TokenStream<I>) -> Result<Node, ParseError> {
    let Some(bang) = s.advance() else {
        return Err(s.error("Expected image marker"));
    };
    let start = bang.span.start;

    if !link_starts(s) {
        return Err(s.error("Expected link"));
    }
    let mut body = read_link_body(s)?;
    body.span.start = start;

    Ok(Node::Image(body))
}

/// `[` alt-text `]` `(` href `)` with a named error for each missing piece.
fn read_link_body<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
) -> Result<Link, ParseError> {
    let Some(open) = s.advance() else {
        return Err(s.error("Expected link alt start marker"));
    };
    let start = open.span.start;

    let mut alt = Vec::new();
    while let Some(node) = read_text_node(s)? {
        alt.push(node);
    }

    expect_kind(s, TokenKind::LinkAltEnd, "Expected link alt end marker")?;
    expect_kind(s, TokenKind::LinkHrefStart, "Expected link target start marker")?;

    let Some(href) = s.next_if_kind(TokenKind::Literal) else {
        return Err(s.error("Invalid href"));
    };

    let close = expect_kind(s, TokenKind::LinkHrefEnd, "Expected link target end marker")?;

    Ok(Link {
        alt,
        href: href.text,
        span: Span::new(start, close.span.end),
    })
}

fn expect_kind<I: Iterator<Item = Token>>(
    s: &mut TokenStream<I>,
    kind: TokenKind,
    message: &str,
) -> Result<Token, ParseError> {
    match s.advance() {
        Some(token) if token.kind == kind => Ok(token),
        Some(token) => Err(ParseError::new(message, token.span.start)),
        None => Err(s.error(message)),
    }
}
