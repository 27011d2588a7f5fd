use once_cell::sync::Lazy;
use regex::Regex;

use super::InlineOptions;
use crate::ast::{Image, Node};

static CITATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());
static LINK_DEST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(\S*?)(?:\s+"([^"]*)")?$"#).unwrap());

/// `![alt](src "title")`. The alt text may itself contain balanced
/// brackets.
pub(super) fn tokenize_image(text: &str, pos: usize) -> Option<(Node, usize)> {
    let bytes = text.as_bytes();

    let mut depth = 0;
    let mut alt_end = None;
    for (i, &b) in bytes.iter().enumerate().skip(pos + 1) {
        match b {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    alt_end = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let alt_end = alt_end?;

    let (dest, end) = tokenize_link_dest(text, alt_end + 1)?;
    let (src, title) = split_link_dest(dest);

    Some((
        Node::Image(Image {
            src,
            alt: text[pos + 2..alt_end].to_string(),
            title,
            position: None,
        }),
        end,
    ))
}

/// `[N]` citation or `[text](url "title")` link.
pub(super) fn tokenize_bracket(
    text: &str,
    pos: usize,
    options: InlineOptions,
) -> Option<(Node, usize)> {
    let close = pos + 1 + text[pos + 1..].find(']')?;
    let label = &text[pos + 1..close];
    let has_dest = text.as_bytes().get(close + 1) == Some(&b'(');

    if options.citations && !has_dest && CITATION_REGEX.is_match(label) {
        return Some((
            Node::Citation {
                value: label.to_string(),
            },
            close + 1,
        ));
    }

    // an inner '[' means this bracket never closes; let the inner one try
    if !has_dest || label.contains('[') {
        return None;
    }

    let (dest, end) = tokenize_link_dest(text, close + 1)?;
    let (url, title) = split_link_dest(dest);
    let children = if label.is_empty() {
        vec![]
    } else {
        vec![Node::text(label)]
    };

    Some((
        Node::Link {
            url,
            title,
            children,
        },
        end,
    ))
}

/// Reads `( ... )` starting at `open`, allowing balanced parentheses inside.
/// Returns the enclosed text and the index just past the closing paren.
fn tokenize_link_dest(text: &str, open: usize) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut parentheses = 0;
    for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
        match b {
            b'(' => parentheses += 1,
            b')' if parentheses == 0 => return Some((&text[open + 1..i], i + 1)),
            b')' => parentheses -= 1,
            b'\n' => return None,
            _ => {}
        }
    }

    None
}

fn split_link_dest(dest: &str) -> (String, Option<String>) {
    let dest = dest.trim();
    let (url, title) = match LINK_DEST_REGEX.captures(dest) {
        Some(caps) => (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map(|m| m.as_str()),
        ),
        None => (dest, None),
    };
    let url = url
        .strip_prefix('<')
        .and_then(|url| url.strip_suffix('>'))
        .unwrap_or(url);

    (
        url.to_string(),
        title.filter(|title| !title.is_empty()).map(str::to_string),
    )
}
