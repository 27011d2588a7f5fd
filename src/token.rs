use serde::Serialize;

/// One block-level unit produced by the block tokenizer, before inline
/// content is parsed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Block {
    /// 1-based line the block starts on.
    pub(crate) line: usize,
    pub(crate) kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BlockKind {
    Heading {
        level: HeadingLevel,
        content: String,
    },
    Paragraph(String),
    BlockQuote(String),
    CodeBlock {
        language: Option<String>,
        text: String,
        terminated: bool,
    },
    List(Vec<ListLine>),
    HorizontalRule,
}

/// A single list-like line, with its indent relative to the first item of
/// the list it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListLine {
    pub(crate) indent: usize,
    pub(crate) ordered: bool,
    pub(crate) content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Returns `None` for anything outside `1..=6`.
    pub fn new(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            5 => Some(HeadingLevel::H5),
            6 => Some(HeadingLevel::H6),
            _ => None,
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        match level {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
            HeadingLevel::H4 => 4,
            HeadingLevel::H5 => 5,
            HeadingLevel::H6 => 6,
        }
    }
}
