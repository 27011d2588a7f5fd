use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use super::list_item::tokenize_list;
use crate::token::{Block, BlockKind, HeadingLevel};

static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s(.+)$").unwrap());
static HORIZONTAL_RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ {0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});

const CODE_FENCE: &str = "```";
const BLOCK_QUOTE_PREFIX: &str = "> ";

pub(super) fn is_horizontal_rule(line: &str) -> bool {
    HORIZONTAL_RULE_REGEX.is_match(line)
}

/// Groups lines into blocks. Every branch reports the index of the first
/// line it did not consume; anything no branch claims is a paragraph.
pub(crate) fn block_tokenize(lines: &[&str]) -> Vec<Block> {
    let mut blocks = vec![];

    let mut cursor = 0;
    while cursor < lines.len() {
        let line = lines[cursor];

        // 空行
        if line.trim().is_empty() {
            cursor += 1;
            continue;
        }

        let (kind, next) = tokenize_fenced_code_block(lines, cursor)
            .or_else(|| tokenize_heading(line).map(|kind| (kind, cursor + 1)))
            .or_else(|| tokenize_block_quote(lines, cursor))
            .or_else(|| is_horizontal_rule(line).then_some((BlockKind::HorizontalRule, cursor + 1)))
            .or_else(|| {
                tokenize_list(lines, cursor).map(|(items, next)| (BlockKind::List(items), next))
            })
            // 段落
            .unwrap_or_else(|| (BlockKind::Paragraph(line.to_string()), cursor + 1));

        trace!("lines {}..{}: {:?}", cursor + 1, next, kind);
        blocks.push(Block {
            line: cursor + 1,
            kind,
        });
        cursor = next;
    }

    blocks
}

// 見出し
fn tokenize_heading(line: &str) -> Option<BlockKind> {
    let caps = HEADING_REGEX.captures(line)?;
    let level = HeadingLevel::new(u8::try_from(caps.get(1)?.len()).ok()?)?;

    Some(BlockKind::Heading {
        level,
        content: caps.get(2)?.as_str().trim().to_string(),
    })
}

// ブロック引用
fn tokenize_block_quote(lines: &[&str], start: usize) -> Option<(BlockKind, usize)> {
    if !lines.get(start)?.starts_with(BLOCK_QUOTE_PREFIX) {
        return None;
    }

    let quoted: Vec<&str> = lines[start..]
        .iter()
        .map_while(|line| line.strip_prefix(BLOCK_QUOTE_PREFIX))
        .collect();
    let next = start + quoted.len();

    Some((BlockKind::BlockQuote(quoted.join("\n")), next))
}

// コードブロック(フェンス)
fn tokenize_fenced_code_block(lines: &[&str], start: usize) -> Option<(BlockKind, usize)> {
    let opening = lines.get(start)?.strip_prefix(CODE_FENCE)?;
    let language = opening.trim_start_matches('`').trim();
    let language = (!language.is_empty()).then(|| language.to_string());

    let body = &lines[start + 1..];
    let closing = body.iter().position(|line| line.starts_with(CODE_FENCE));
    let (text, next, terminated) = match closing {
        Some(offset) => (body[..offset].join("\n"), start + 1 + offset + 1, true),
        None => {
            debug!(
                "code fence opened on line {} is never closed; consuming to end of input",
                start + 1
            );
            (body.join("\n"), lines.len(), false)
        }
    };

    Some((
        BlockKind::CodeBlock {
            language,
            text,
            terminated,
        },
        next,
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{block_tokenize, is_horizontal_rule};
    use crate::token::{Block, BlockKind, HeadingLevel, ListLine};

    fn kinds(input: &str) -> Vec<BlockKind> {
        let lines: Vec<&str> = input.lines().collect();
        block_tokenize(&lines)
            .into_iter()
            .map(|block| block.kind)
            .collect()
    }

    #[test]
    fn test_block_tokenize() {
        let heading = "# Heading\n###### Six\n####### Seven";
        let block_quote = "> hello\n> world\n\n> again";
        let fenced_code_block = "```rust\nfn main() {\n    println!(\"Hello, world!\");\n}\n```\nafter";
        let horizontal_rule = "---\n* * *\n___";
        let paragraph = "Hello, world!\nHello, world!\n\nHello, world!";

        assert_eq!(
            kinds(heading),
            vec![
                BlockKind::Heading {
                    level: HeadingLevel::H1,
                    content: "Heading".into()
                },
                BlockKind::Heading {
                    level: HeadingLevel::H6,
                    content: "Six".into()
                },
                BlockKind::Paragraph("####### Seven".into()),
            ]
        );
        assert_eq!(
            kinds(block_quote),
            vec![
                BlockKind::BlockQuote("hello\nworld".into()),
                BlockKind::BlockQuote("again".into()),
            ]
        );
        assert_eq!(
            kinds(fenced_code_block),
            vec![
                BlockKind::CodeBlock {
                    language: Some("rust".into()),
                    text: "fn main() {\n    println!(\"Hello, world!\");\n}".into(),
                    terminated: true,
                },
                BlockKind::Paragraph("after".into()),
            ]
        );
        assert_eq!(
            kinds(horizontal_rule),
            vec![
                BlockKind::HorizontalRule,
                BlockKind::HorizontalRule,
                BlockKind::HorizontalRule,
            ]
        );
        assert_eq!(
            kinds(paragraph),
            vec![
                BlockKind::Paragraph("Hello, world!".into()),
                BlockKind::Paragraph("Hello, world!".into()),
                BlockKind::Paragraph("Hello, world!".into()),
            ]
        );
    }

    #[test]
    fn test_unterminated_code_fence() {
        assert_eq!(
            kinds("```\nno closing\n\n# not a heading"),
            vec![BlockKind::CodeBlock {
                language: None,
                text: "no closing\n\n# not a heading".into(),
                terminated: false,
            }]
        );
    }

    #[test]
    fn test_block_lines() {
        let lines = vec!["# Title", "", "- a", "- b", "", "```", "x", "```", "tail"];
        let blocks = block_tokenize(&lines);
        assert_eq!(
            blocks.iter().map(|block| block.line).collect::<Vec<_>>(),
            vec![1, 3, 6, 9]
        );
        assert_eq!(
            blocks[1],
            Block {
                line: 3,
                kind: BlockKind::List(vec![
                    ListLine {
                        indent: 0,
                        ordered: false,
                        content: "a".into()
                    },
                    ListLine {
                        indent: 0,
                        ordered: false,
                        content: "b".into()
                    },
                ]),
            }
        );
    }

    #[test]
    fn test_horizontal_rule() {
        assert!(is_horizontal_rule("---"));
        assert!(is_horizontal_rule("   - - -"));
        assert!(is_horizontal_rule("*****"));
        assert!(!is_horizontal_rule("--"));
        assert!(!is_horizontal_rule("-*-"));
        assert!(!is_horizontal_rule("    ---"));
    }
}
