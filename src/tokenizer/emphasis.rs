use super::{tokenize_inline, InlineOptions};
use crate::ast::Node;

/// `**text**` or `__text__`. The enclosed text is tokenized again, so
/// italics and links nest inside.
pub(super) fn tokenize_strong(
    text: &str,
    pos: usize,
    options: InlineOptions,
) -> Option<(Node, usize)> {
    let marker = &text[pos..pos + 2];
    let close = pos + 2 + text[pos + 2..].find(marker)?;
    let children = tokenize_inline(&text[pos + 2..close], options);

    Some((Node::Bold { children }, close + 2))
}

/// `*text*` or `_text_`. The closer is the next occurrence of the same
/// marker that is not escaped with a backslash.
pub(super) fn tokenize_emphasis(
    text: &str,
    pos: usize,
    options: InlineOptions,
) -> Option<(Node, usize)> {
    let bytes = text.as_bytes();
    let marker = bytes[pos];

    let mut search = pos + 1;
    loop {
        let close = search + bytes[search..].iter().position(|&b| b == marker)?;
        if bytes[close - 1] != b'\\' {
            let children = tokenize_inline(&text[pos + 1..close], options);

            return Some((Node::Italic { children }, close + 1));
        }
        search = close + 1;
    }
}
