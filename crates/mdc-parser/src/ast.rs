//! Abstract syntax tree for markdown documents.
//!
//! Block constructs (header, paragraph, list) and inline constructs (text,
//! emphasis, link, image) share the one [`Node`] enum, since block content is
//! a sequence of inline nodes. Every node carries the span of the tokens it
//! was built from.

use mdc_lexer::Span;

/// A parsed node. Exclusively owns its children; immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `# title`; level is the number of `#` characters.
    Header(Header),

    /// A run of inline content up to the next blank line or block marker.
    Paragraph(Paragraph),

    /// `1. item` lines.
    List(List),

    /// Plain literal text.
    Plain(Text),

    /// `*text*`
    Italic(Text),

    /// `**text**`
    Bold(Text),

    /// `***text***`
    ItalicBold(Text),

    /// `[alt](href)`
    Link(Link),

    /// `![alt](href)`; same body as `Link`, distinct tag. The image reader
    /// delegates to the link reader and retags the result.
    Image(Link),
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Header(header) => header.span,
            Node::Paragraph(paragraph) => paragraph.span,
            Node::List(list) => list.span,
            Node::Plain(text)
            | Node::Italic(text)
            | Node::Bold(text)
            | Node::ItalicBold(text) => text.span,
            Node::Link(link) | Node::Image(link) => link.span,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Node::Header(_) => "header",
            Node::Paragraph(_) => "paragraph",
            Node::List(_) => "list",
            Node::Plain(_) => "plain text",
            Node::Italic(_) => "italic",
            Node::Bold(_) => "bold",
            Node::ItalicBold(_) => "italic bold",
            Node::Link(_) => "link",
            Node::Image(_) => "image",
        }
    }
}

/// A header block.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub level: usize,
    pub inline: Vec<Node>,
    pub span: Span,
}

/// A paragraph block.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub inline: Vec<Node>,
    pub span: Span,
}

/// An ordered list block.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub items: Vec<ListItem>,
    pub span: Span,
}

/// One list item: the parsed numeric index and its inline content.
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub index: u32,
    pub inline: Vec<Node>,
    pub span: Span,
}

/// Content of a text-bearing inline node.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub value: String,
    pub span: Span,
}

/// Body shared by `Link` and `Image` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub alt: Vec<Node>,
    pub href: String,
    pub span: Span,
}
