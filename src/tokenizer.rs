mod block_tokenizer;
mod emphasis;
mod link;
mod list_item;

pub(crate) use self::block_tokenizer::block_tokenize;

use self::{
    emphasis::{tokenize_emphasis, tokenize_strong},
    link::{tokenize_bracket, tokenize_image},
};
use crate::ast::Node;

/// Characters a backslash turns into literal text.
const ESCAPABLE: &[u8] = b"\\`*_[]()!#>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InlineOptions {
    pub(crate) citations: bool,
}

/// Scans one line (or a joined blockquote) for inline constructs.
///
/// Never fails: anything that does not close properly is kept as text, and
/// adjacent text runs are merged before returning.
pub(crate) fn tokenize_inline(text: &str, options: InlineOptions) -> Vec<Node> {
    let bytes = text.as_bytes();
    let mut nodes = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;
    // index just past the last escaped character
    let mut escaped_end = None;

    // All markers are ASCII, so every index we slice at is a char boundary.
    while pos < bytes.len() {
        let matched = match bytes[pos] {
            b'!' if bytes.get(pos + 1) == Some(&b'[') => tokenize_image(text, pos),
            b'[' if pos == 0 || bytes[pos - 1] != b'!' || escaped_end == Some(pos) => {
                tokenize_bracket(text, pos, options)
            }
            b'*' | b'_' if bytes.get(pos + 1) == Some(&bytes[pos]) => {
                match tokenize_strong(text, pos, options) {
                    Some(matched) => Some(matched),
                    None => {
                        // unclosed double marker: both characters are text
                        pos += 2;
                        continue;
                    }
                }
            }
            b'*' | b'_' if pos == 0 || bytes[pos - 1] != bytes[pos] || escaped_end == Some(pos) => {
                tokenize_emphasis(text, pos, options)
            }
            b'`' => tokenize_code_span(text, pos),
            b'\\' if bytes.get(pos + 1).is_some_and(|b| ESCAPABLE.contains(b)) => {
                flush_text(&mut nodes, text, text_start, pos);
                text_start = pos + 1; // skip '\\'
                pos += 2;
                escaped_end = Some(pos);
                continue;
            }
            _ => None,
        };

        match matched {
            Some((node, end)) => {
                flush_text(&mut nodes, text, text_start, pos);
                nodes.push(node);
                pos = end;
                text_start = end;
            }
            None => pos += 1,
        }
    }
    flush_text(&mut nodes, text, text_start, bytes.len());

    merge_text(nodes)
}

fn tokenize_code_span(text: &str, pos: usize) -> Option<(Node, usize)> {
    let close = pos + 1 + text[pos + 1..].find('`')?;

    Some((
        Node::Code {
            value: text[pos + 1..close].to_string(),
        },
        close + 1,
    ))
}

fn flush_text(nodes: &mut Vec<Node>, text: &str, start: usize, end: usize) {
    if end > start {
        nodes.push(Node::text(&text[start..end]));
    }
}

/// Joins runs of adjacent text nodes and drops empty ones.
fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Node::Text { value } = &node {
            if value.is_empty() {
                continue;
            }
            if let Some(Node::Text { value: last }) = merged.last_mut() {
                last.push_str(value);
                continue;
            }
        }
        merged.push(node);
    }

    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{merge_text, tokenize_inline, InlineOptions};
    use crate::ast::{Image, Node};

    const OPTIONS: InlineOptions = InlineOptions { citations: true };

    fn inline(text: &str) -> Vec<Node> {
        tokenize_inline(text, OPTIONS)
    }

    #[test]
    fn tokenize_plain_text() {
        assert_eq!(inline("Hello, World!"), vec![Node::text("Hello, World!")]);
        assert_eq!(inline(""), vec![]);
    }

    #[test]
    fn tokenize_bold_and_italic() {
        assert_eq!(
            inline("**bold** and *italic*"),
            vec![
                Node::Bold {
                    children: vec![Node::text("bold")]
                },
                Node::text(" and "),
                Node::Italic {
                    children: vec![Node::text("italic")]
                },
            ]
        );

        assert_eq!(
            inline("__bold__ and _italic_"),
            vec![
                Node::Bold {
                    children: vec![Node::text("bold")]
                },
                Node::text(" and "),
                Node::Italic {
                    children: vec![Node::text("italic")]
                },
            ]
        );
    }

    #[test]
    fn tokenize_italic_inside_bold() {
        assert_eq!(
            inline("**very *nested* text**"),
            vec![Node::Bold {
                children: vec![
                    Node::text("very "),
                    Node::Italic {
                        children: vec![Node::text("nested")]
                    },
                    Node::text(" text"),
                ]
            }]
        );
    }

    #[rstest]
    #[case("**unclosed bold")]
    #[case("*unclosed italic")]
    #[case("`unclosed code")]
    #[case("[not a link")]
    #[case("[text] without destination")]
    #[case("![alt] without destination")]
    #[case("![alt](unclosed")]
    #[case("a lone ] bracket")]
    fn tokenize_malformed_as_text(#[case] input: &str) {
        assert_eq!(inline(input), vec![Node::text(input)]);
    }

    #[test]
    fn tokenize_single_marker_closes_at_next_marker() {
        assert_eq!(
            inline("2 * 3 * 4"),
            vec![
                Node::text("2 "),
                Node::Italic {
                    children: vec![Node::text(" 3 ")]
                },
                Node::text(" 4"),
            ]
        );
        assert_eq!(
            inline("snake_case_name"),
            vec![
                Node::text("snake"),
                Node::Italic {
                    children: vec![Node::text("case")]
                },
                Node::text("name"),
            ]
        );
    }

    #[test]
    fn tokenize_code_span() {
        assert_eq!(
            inline("run `cargo **build**` now"),
            vec![
                Node::text("run "),
                Node::Code {
                    value: "cargo **build**".to_string()
                },
                Node::text(" now"),
            ]
        );
    }

    #[test]
    fn tokenize_citation_and_link() {
        assert_eq!(
            inline("Reference [7] here"),
            vec![
                Node::text("Reference "),
                Node::Citation {
                    value: "7".to_string()
                },
                Node::text(" here"),
            ]
        );
        assert_eq!(
            inline("Reference [7](url) here"),
            vec![
                Node::text("Reference "),
                Node::Link {
                    url: "url".to_string(),
                    title: None,
                    children: vec![Node::text("7")],
                },
                Node::text(" here"),
            ]
        );
    }

    #[test]
    fn tokenize_citation_disabled() {
        let options = InlineOptions { citations: false };
        assert_eq!(
            tokenize_inline("Reference [7] here", options),
            vec![Node::text("Reference [7] here")]
        );
    }

    #[test]
    fn tokenize_link_with_title() {
        assert_eq!(
            inline(r#"Check out [this link](https://example.com "Example") and [another](https://test.com)"#),
            vec![
                Node::text("Check out "),
                Node::Link {
                    url: "https://example.com".to_string(),
                    title: Some("Example".to_string()),
                    children: vec![Node::text("this link")],
                },
                Node::text(" and "),
                Node::Link {
                    url: "https://test.com".to_string(),
                    title: None,
                    children: vec![Node::text("another")],
                },
            ]
        );
    }

    #[test]
    fn tokenize_broken_link_before_valid_one() {
        assert_eq!(
            inline("Text with [broken link and [valid](http://example.com)"),
            vec![
                Node::text("Text with [broken link and "),
                Node::Link {
                    url: "http://example.com".to_string(),
                    title: None,
                    children: vec![Node::text("valid")],
                },
            ]
        );
    }

    #[test]
    fn tokenize_image_with_nested_brackets() {
        assert_eq!(
            inline("![a [b] c](img.jpg)"),
            vec![Node::Image(Image {
                src: "img.jpg".to_string(),
                alt: "a [b] c".to_string(),
                title: None,
                position: None,
            })]
        );
        assert_eq!(
            inline("![](empty.png)"),
            vec![Node::Image(Image {
                src: "empty.png".to_string(),
                alt: String::new(),
                title: None,
                position: None,
            })]
        );
    }

    #[test]
    fn tokenize_escapes() {
        assert_eq!(
            inline(r"not \*italic\* and \[7\]"),
            vec![Node::text("not *italic* and [7]")]
        );
        assert_eq!(
            inline(r"a \d stays"),
            vec![Node::text(r"a \d stays")]
        );
    }

    #[test]
    fn tokenize_escaped_bang_before_bracket() {
        assert_eq!(
            inline(r"\![x](u)"),
            vec![
                Node::text("!"),
                Node::Link {
                    url: "u".to_string(),
                    title: None,
                    children: vec![Node::text("x")],
                },
            ]
        );
        assert_eq!(
            inline(r"wow\![7] ok"),
            vec![
                Node::text("wow!"),
                Node::Citation {
                    value: "7".to_string()
                },
                Node::text(" ok"),
            ]
        );
    }

    #[test]
    fn tokenize_multibyte_text() {
        assert_eq!(
            inline("こんにちは *世界* ！"),
            vec![
                Node::text("こんにちは "),
                Node::Italic {
                    children: vec![Node::text("世界")]
                },
                Node::text(" ！"),
            ]
        );
    }

    #[test]
    fn merge_adjacent_text() {
        let merged = merge_text(vec![
            Node::text("a"),
            Node::text(""),
            Node::text("b"),
            Node::Code {
                value: "c".to_string(),
            },
            Node::text("d"),
            Node::text("e"),
        ]);
        assert_eq!(
            merged,
            vec![
                Node::text("ab"),
                Node::Code {
                    value: "c".to_string()
                },
                Node::text("de"),
            ]
        );
    }
}
