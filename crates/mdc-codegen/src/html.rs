//! HTML code generator.
//!
//! Walks the parsed node sequence once, dispatching on node kind, and
//! appends the HTML for each block to the output string.
//!
//! Joining: inline children of headers, paragraphs, and link/image alt text
//! are separated by exactly one space, collapsing whatever whitespace sat
//! between the source tokens. List item bodies concatenate their children
//! with no separator at all. The asymmetry is intentional.

use crate::{CodegenError, CompileError};
use mdc_lexer::Lookahead;
use mdc_parser::ast::{List, Node};
use mdc_parser::ParseError;

/// Node traversal stream; same contract the parser uses over tokens.
struct NodeStream<I: Iterator<Item = Result<Node, ParseError>>> {
    nodes: Lookahead<I>,
}

impl<I: Iterator<Item = Result<Node, ParseError>>> NodeStream<I> {
    fn new(nodes: I) -> Self {
        Self {
            nodes: Lookahead::new(nodes),
        }
    }

    fn advance(&mut self) -> Option<Result<Node, ParseError>> {
        self.nodes.next()
    }

    fn eof(&mut self) -> bool {
        self.nodes.peek(0).is_none()
    }
}

/// Generate HTML from a lazy sequence of parse results.
///
/// A parse error item propagates as-is. A generation error aborts with no
/// partial output, unless `diagnostics` is set, in which case the error is
/// printed and the output produced so far is returned.
pub fn generate<I>(nodes: I, diagnostics: bool) -> Result<String, CompileError>
where
    I: IntoIterator<Item = Result<Node, ParseError>>,
{
    let mut stream = NodeStream::new(nodes.into_iter());
    let mut out = String::new();

    while !stream.eof() {
        let node = match stream.advance() {
            Some(Ok(node)) => node,
            Some(Err(error)) => return Err(CompileError::Parse(error)),
            None => break,
        };
        if let Err(error) = render_block(&node, &mut out) {
            if diagnostics {
                eprintln!("{error}");
                return Ok(out);
            }
            return Err(CompileError::Codegen(error));
        }
    }

    Ok(out)
}

fn render_block(node: &Node, out: &mut String) -> Result<(), CodegenError> {
    match node {
        Node::Header(header) => {
            let inline = render_inline_list(&header.inline)?;
            out.push_str(&format!("<h{0}>{inline}</h{0}>\n", header.level));
        }
        Node::Paragraph(paragraph) => {
            let inline = render_inline_list(&paragraph.inline)?;
            out.push_str("<p>");
            out.push_str(&inline);
            out.push_str("</p>\n");
        }
        Node::List(list) => render_list(list, out)?,
        inline => out.push_str(&render_inline(inline)?),
    }
    Ok(())
}

/// Render one inline node. Image is dispatched before link: the two share a
/// body and only the tag tells them apart.
fn render_inline(node: &Node) -> Result<String, CodegenError> {
    Ok(match node {
        Node::Plain(text) => text.value.clone(),
        Node::Italic(text) => format!("<i>{}</i>", text.value),
        Node::Bold(text) => format!("<strong>{}</strong>", text.value),
        Node::ItalicBold(text) => format!("<i><strong>{}</strong></i>", text.value),
        Node::Image(link) => format!(
            "<img href='{}' alt='{}'></img>",
            link.href,
            render_inline_list(&link.alt)?
        ),
        Node::Link(link) => format!(
            "<a href='{}'>{}</a>",
            link.href,
            render_inline_list(&link.alt)?
        ),
        other => {
            return Err(CodegenError::new(
                format!("Unexpected {} node", other.name()),
                other.span().start,
            ))
        }
    })
}

/// Join inline siblings with a single space, none trailing.
fn render_inline_list(nodes: &[Node]) -> Result<String, CodegenError> {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&render_inline(node)?);
    }
    Ok(out)
}

/// List item bodies concatenate with no separator.
fn render_list(list: &List, out: &mut String) -> Result<(), CodegenError> {
    out.push_str("<ol>\n");
    for item in &list.items {
        out.push_str("    <li>");
        for node in &item.inline {
            out.push_str(&render_inline(node)?);
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ol>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use mdc_lexer::Span;
    use mdc_parser::ast::{Link, Text};
    use pretty_assertions::assert_eq;

    fn gen_nodes(nodes: Vec<Node>) -> Result<String, CompileError> {
        generate(nodes.into_iter().map(Ok), false)
    }

    fn text(value: &str) -> Text {
        Text {
            value: value.into(),
            span: Span::new(0, 0),
        }
    }

    // =========================================================================
    // Inline rendering
    // =========================================================================

    #[test]
    fn test_italic_node() {
        assert_eq!(gen_nodes(vec![Node::Italic(text("em"))]).unwrap(), "<i>em</i>");
    }

    #[test]
    fn test_bold_node() {
        assert_eq!(
            gen_nodes(vec![Node::Bold(text("b"))]).unwrap(),
            "<strong>b</strong>"
        );
    }

    #[test]
    fn test_italic_bold_node() {
        assert_eq!(
            gen_nodes(vec![Node::ItalicBold(text("ib"))]).unwrap(),
            "<i><strong>ib</strong></i>"
        );
    }

    #[test]
    fn test_plain_node_as_is() {
        assert_eq!(gen_nodes(vec![Node::Plain(text("raw"))]).unwrap(), "raw");
    }

    #[test]
    fn test_link_node() {
        let link = Node::Link(Link {
            alt: vec![Node::Plain(text("a"))],
            href: "http://x".into(),
            span: Span::new(0, 0),
        });
        assert_eq!(gen_nodes(vec![link]).unwrap(), "<a href='http://x'>a</a>");
    }

    #[test]
    fn test_image_node() {
        let image = Node::Image(Link {
            alt: vec![Node::Plain(text("a"))],
            href: "http://x".into(),
            span: Span::new(0, 0),
        });
        assert_eq!(
            gen_nodes(vec![image]).unwrap(),
            "<img href='http://x' alt='a'></img>"
        );
    }

    #[test]
    fn test_block_node_in_inline_position_is_rejected() {
        let bad = Node::Link(Link {
            alt: vec![Node::List(mdc_parser::ast::List {
                items: vec![],
                span: Span::new(4, 9),
            })],
            href: "h".into(),
            span: Span::new(0, 12),
        });
        let err = gen_nodes(vec![bad]).unwrap_err();
        match err {
            CompileError::Codegen(e) => {
                assert!(e.message.contains("Unexpected list node"));
                assert_eq!(e.offset, 4);
            }
            other => panic!("Expected codegen error, got {other:?}"),
        }
    }

    // =========================================================================
    // Full pipeline: blocks
    // =========================================================================

    #[test]
    fn test_header() {
        assert_eq!(compile("# Hello\n", false).unwrap(), "<h1>Hello</h1>\n");
    }

    #[test]
    fn test_header_deeper_level() {
        assert_eq!(compile("### t\n", false).unwrap(), "<h3>t</h3>\n");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(
            compile("1. foo\n2. bar\n", false).unwrap(),
            "<ol>\n    <li>foo</li>\n    <li>bar</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_paragraph_joins_siblings_with_one_space() {
        assert_eq!(
            compile("**b** *i*\n", false).unwrap(),
            "<p><strong>b</strong> <i>i</i></p>\n"
        );
    }

    #[test]
    fn test_paragraph_wraps_bare_emphasis() {
        assert_eq!(compile("*em*", false).unwrap(), "<p><i>em</i></p>\n");
    }

    #[test]
    fn test_paragraph_with_link() {
        assert_eq!(
            compile("[a](http://x)", false).unwrap(),
            "<p><a href='http://x'>a</a></p>\n"
        );
    }

    #[test]
    fn test_paragraph_with_image() {
        assert_eq!(
            compile("![a](http://x)", false).unwrap(),
            "<p><img href='http://x' alt='a'></img></p>\n"
        );
    }

    #[test]
    fn test_list_items_concatenate_without_separator() {
        assert_eq!(
            compile("1. a *b* c\n", false).unwrap(),
            "<ol>\n    <li>a<i>b</i>c</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_header_joins_with_spaces_unlike_list() {
        assert_eq!(
            compile("# a *b* c\n", false).unwrap(),
            "<h1>a <i>b</i> c</h1>\n"
        );
    }

    #[test]
    fn test_document_with_mixed_blocks() {
        let source = "# title\n\nintro text\n\n1. one\n2. two\n";
        assert_eq!(
            compile(source, false).unwrap(),
            "<h1>title</h1>\n<p>intro text</p>\n<ol>\n    <li>one</li>\n    <li>two</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(compile("", false).unwrap(), "");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let source = "# t\n\n1. a\n2. *b*\n\npara [l](h) ![i](h)\n";
        assert_eq!(
            compile(source, false).unwrap(),
            compile(source, false).unwrap()
        );
    }

    // =========================================================================
    // Errors and diagnostics
    // =========================================================================

    #[test]
    fn test_parse_error_propagates() {
        let err = compile("*a", false).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
    }

    #[test]
    fn test_diagnostics_returns_partial_output() {
        let paragraph = compile("ok\n", false).unwrap();
        let nodes = mdc_parser::parse("ok\n").unwrap();
        let bad = Node::Link(Link {
            alt: vec![Node::Paragraph(mdc_parser::ast::Paragraph {
                inline: vec![],
                span: Span::new(0, 0),
            })],
            href: "h".into(),
            span: Span::new(0, 0),
        });
        let items: Vec<_> = nodes.into_iter().chain([bad]).map(Ok).collect();
        assert_eq!(generate(items, true).unwrap(), paragraph);
    }

    #[test]
    fn test_diagnostics_parse_error_yields_clean_end() {
        // The parser prints and stops; the generator sees a short stream.
        assert_eq!(compile("ok\n*a", true).unwrap(), "<p>ok</p>\n");
    }
}
