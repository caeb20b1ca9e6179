use crate::cursor::Cursor;
use crate::token::{Span, Token, TokenKind};

/// What happens to whitespace right after a matched token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trailing {
    /// Leave it for the next match (it usually lands in a literal run).
    Keep,
    /// Consume non-newline whitespace and fold it into the token's span.
    SkipSpaces,
}

/// One entry in the priority-ordered matcher table.
struct Matcher {
    starts: fn(&Tokenizer) -> bool,
    read: fn(&mut Tokenizer) -> Token,
    trailing: Trailing,
}

/// Matchers are tried in order; the first whose predicate accepts wins.
/// Header and ListMarker are context-sensitive: they only fire at the start
/// of a line (last token none or a newline run, and no pending literal), so
/// a `#` or `1.` appearing mid-line stays literal text.
const MATCHERS: &[Matcher] = &[
    Matcher {
        starts: newline_starts,
        read: read_newline,
        trailing: Trailing::Keep,
    },
    Matcher {
        starts: header_starts,
        read: read_header,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: list_marker_starts,
        read: read_list_marker,
        trailing: Trailing::Keep,
    },
    Matcher {
        starts: emphasis_starts,
        read: read_emphasis,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: link_alt_start_starts,
        read: read_link_alt_start,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: link_alt_end_starts,
        read: read_link_alt_end,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: link_href_start_starts,
        read: read_link_href_start,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: link_href_end_starts,
        read: read_link_href_end,
        trailing: Trailing::SkipSpaces,
    },
    Matcher {
        starts: image_marker_starts,
        read: read_image_marker,
        trailing: Trailing::SkipSpaces,
    },
];

/// Markdown tokenizer.
///
/// Produces tokens lazily, one per `next` call. Characters no matcher claims
/// accumulate in a pending literal buffer, flushed as a `Literal` token when
/// the next marker matches or the input ends; every input character belongs
/// to exactly one token, so token spans tile the input with no gaps.
///
/// Tokenization cannot fail.
pub struct Tokenizer {
    cursor: Cursor,
    last: Option<TokenKind>,
    buf: String,
    buf_start: usize,
    pending: Option<Token>,
}

impl Tokenizer {
    pub fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            last: None,
            buf: String::new(),
            buf_start: 0,
            pending: None,
        }
    }

    /// Tokenize the entire source eagerly.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Self::new(source).collect()
    }

    /// True when the next character sits at the start of a line with nothing
    /// buffered: the position where Header and ListMarker are legal.
    fn at_line_start(&self) -> bool {
        self.buf.is_empty() && matches!(self.last, None | Some(TokenKind::Newline))
    }

    fn flush_literal(&mut self) -> Option<Token> {
        if self.buf.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.buf);
        let span = Span::new(self.buf_start, self.cursor.tell());
        self.last = Some(TokenKind::Literal);
        Some(Token::new(TokenKind::Literal, text, span))
    }

    fn skip_inline_whitespace(&mut self) -> usize {
        while self
            .cursor
            .peek()
            .is_some_and(|ch| ch.is_whitespace() && ch != '\n')
        {
            self.cursor.read();
        }
        self.cursor.tell()
    }
}

impl Iterator for Tokenizer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        loop {
            if self.cursor.is_at_end() {
                return self.flush_literal();
            }

            if let Some(matcher) = MATCHERS.iter().find(|m| (m.starts)(self)) {
                let flushed = self.flush_literal();
                let mut token = (matcher.read)(self);
                if matcher.trailing == Trailing::SkipSpaces {
                    token.span.end = self.skip_inline_whitespace();
                }
                self.last = Some(token.kind);
                return match flushed {
                    Some(literal) => {
                        self.pending = Some(token);
                        Some(literal)
                    }
                    None => Some(token),
                };
            }

            if self.buf.is_empty() {
                self.buf_start = self.cursor.tell();
            }
            if let Some(ch) = self.cursor.read() {
                self.buf.push(ch);
            }
        }
    }
}

// --- Matchers ---

fn newline_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some('\n')
}

/// Greedy: a run of consecutive `\n` collapses into one token.
fn read_newline(t: &mut Tokenizer) -> Token {
    let start = t.cursor.tell();
    let mut text = String::new();
    while t.cursor.peek() == Some('\n') {
        text.push('\n');
        t.cursor.read();
    }
    Token::new(TokenKind::Newline, text, Span::new(start, t.cursor.tell()))
}

fn header_starts(t: &Tokenizer) -> bool {
    t.at_line_start() && t.cursor.peek() == Some('#')
}

fn read_header(t: &mut Tokenizer) -> Token {
    let start = t.cursor.tell();
    let mut text = String::new();
    while t.cursor.peek() == Some('#') {
        text.push('#');
        t.cursor.read();
    }
    Token::new(TokenKind::Header, text, Span::new(start, t.cursor.tell()))
}

fn list_marker_starts(t: &Tokenizer) -> bool {
    if !t.at_line_start() || !t.cursor.peek().is_some_and(|ch| ch.is_ascii_digit()) {
        return false;
    }
    let mut offset = 1;
    while t.cursor.peek_at(offset).is_some_and(|ch| ch.is_ascii_digit()) {
        offset += 1;
    }
    t.cursor.peek_at(offset) == Some('.')
}

fn read_list_marker(t: &mut Tokenizer) -> Token {
    let start = t.cursor.tell();
    let mut text = String::new();
    while let Some(ch) = t.cursor.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        text.push(ch);
        t.cursor.read();
    }
    // The predicate guarantees the dot follows the digit run.
    if t.cursor.peek() == Some('.') {
        text.push('.');
        t.cursor.read();
    }
    Token::new(TokenKind::ListMarker, text, Span::new(start, t.cursor.tell()))
}

fn emphasis_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some('*')
}

/// Greedy up to three stars; longer star runs split into multiple tokens.
fn read_emphasis(t: &mut Tokenizer) -> Token {
    let start = t.cursor.tell();
    let mut text = String::new();
    while text.len() < 3 && t.cursor.peek() == Some('*') {
        text.push('*');
        t.cursor.read();
    }
    Token::new(TokenKind::Emphasis, text, Span::new(start, t.cursor.tell()))
}

fn read_single(t: &mut Tokenizer, kind: TokenKind) -> Token {
    let start = t.cursor.tell();
    let mut text = String::new();
    if let Some(ch) = t.cursor.read() {
        text.push(ch);
    }
    Token::new(kind, text, Span::new(start, t.cursor.tell()))
}

fn link_alt_start_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some('[')
}

fn read_link_alt_start(t: &mut Tokenizer) -> Token {
    read_single(t, TokenKind::LinkAltStart)
}

fn link_alt_end_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some(']')
}

fn read_link_alt_end(t: &mut Tokenizer) -> Token {
    read_single(t, TokenKind::LinkAltEnd)
}

fn link_href_start_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some('(')
}

fn read_link_href_start(t: &mut Tokenizer) -> Token {
    read_single(t, TokenKind::LinkHrefStart)
}

fn link_href_end_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some(')')
}

fn read_link_href_end(t: &mut Tokenizer) -> Token {
    read_single(t, TokenKind::LinkHrefEnd)
}

fn image_marker_starts(t: &Tokenizer) -> bool {
    t.cursor.peek() == Some('!')
}

fn read_image_marker(t: &mut Tokenizer) -> Token {
    read_single(t, TokenKind::ImageMarker)
}
