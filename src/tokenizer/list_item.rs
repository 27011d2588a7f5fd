use once_cell::sync::Lazy;
use regex::Regex;

use super::block_tokenizer::is_horizontal_rule;
use crate::token::ListLine;
use crate::util::indent_width;

static LIST_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:([-*+])|([0-9]+)\.)\s+").unwrap());

/// Recognizes a list item line. The returned indent is absolute; callers
/// rebase it on the first item of the list.
pub(super) fn tokenize_list_item_type(line: &str) -> Option<ListLine> {
    if is_horizontal_rule(line) {
        return None;
    }
    let caps = LIST_PREFIX_REGEX.captures(line)?;
    let prefix = caps.get(0)?;

    Some(ListLine {
        indent: indent_width(line),
        ordered: caps.get(2).is_some(),
        content: line[prefix.end()..].to_string(),
    })
}

/// Collects the contiguous list starting at `start`. Blank lines are
/// skipped as long as another list item follows them.
pub(super) fn tokenize_list(lines: &[&str], start: usize) -> Option<(Vec<ListLine>, usize)> {
    let first = tokenize_list_item_type(lines.get(start)?)?;
    let base_indent = first.indent;

    let mut items = vec![ListLine {
        indent: 0,
        ..first
    }];
    let mut cursor = start + 1;
    while cursor < lines.len() {
        let line = lines[cursor];
        if line.trim().is_empty() {
            let next = lines[cursor..]
                .iter()
                .position(|l| !l.trim().is_empty())
                .map(|offset| cursor + offset);
            match next {
                Some(next) if tokenize_list_item_type(lines[next]).is_some() => {
                    cursor = next;
                    continue;
                }
                _ => break,
            }
        }

        match tokenize_list_item_type(line) {
            Some(item) => {
                items.push(ListLine {
                    indent: item.indent.saturating_sub(base_indent),
                    ..item
                });
                cursor += 1;
            }
            None => break,
        }
    }

    Some((items, cursor))
}
