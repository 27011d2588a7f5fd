use log::debug;

use crate::ast::{Node, ParseResult};
use crate::config::{ConfigError, ParserConfig};
use crate::token::{BlockKind, HeadingLevel, ListLine};
use crate::tokenizer::{block_tokenize, tokenize_inline, InlineOptions};
use crate::track::TrackState;

/// A configured markdown parser. Construction validates the configuration;
/// parsing itself cannot fail.
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    track_level: HeadingLevel,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            track_level: HeadingLevel::H4,
        }
    }
}

impl Parser {
    pub fn new(config: ParserConfig) -> Result<Self, ConfigError> {
        let track_level = config.track_level()?;

        Ok(Self {
            config,
            track_level,
        })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses a whole document into nodes, the track list and any
    /// diagnostics.
    pub fn parse(&self, input: &str) -> ParseResult {
        let lines: Vec<&str> = input.lines().collect();
        let blocks = block_tokenize(&lines);
        let block_count = blocks.len();

        let result = blocks
            .into_iter()
            .fold(TrackState::default(), |state, block| state.accept(block, self))
            .finish();

        debug!(
            "parsed {} lines into {} blocks, {} nodes and {} tracks",
            lines.len(),
            block_count,
            result.nodes.len(),
            result.tracks.len()
        );

        result
    }

    /// Block structure only: no track markers are recognized and images are
    /// left where they are.
    pub fn parse_blocks(&self, lines: &[&str]) -> Vec<Node> {
        block_tokenize(lines)
            .into_iter()
            .map(|block| lower_block(block.kind, self))
            .collect()
    }

    pub fn parse_inline(&self, text: &str) -> Vec<Node> {
        tokenize_inline(text, self.inline_options())
    }

    pub(crate) fn track_level(&self) -> HeadingLevel {
        self.track_level
    }

    pub(crate) fn inline_options(&self) -> InlineOptions {
        InlineOptions {
            citations: self.config.citations,
        }
    }
}

/// Turns a block token into its node, parsing inline content.
pub(crate) fn lower_block(kind: BlockKind, parser: &Parser) -> Node {
    let options = parser.inline_options();
    match kind {
        BlockKind::Heading { level, content } => Node::Header {
            level,
            children: tokenize_inline(&content, options),
        },
        BlockKind::Paragraph(text) => Node::paragraph(tokenize_inline(&text, options)),
        BlockKind::BlockQuote(text) => Node::Blockquote {
            children: tokenize_inline(&text, options),
        },
        BlockKind::CodeBlock { language, text, .. } => Node::CodeBlock {
            value: text,
            language,
        },
        BlockKind::List(items) => group_list(&items, options),
        BlockKind::HorizontalRule => Node::HorizontalRule,
    }
}

/// Items at the first item's indent become siblings; a run of deeper items
/// becomes a nested list inside the item before it.
fn group_list(items: &[ListLine], options: InlineOptions) -> Node {
    let level = items.first().map_or(0, |item| item.indent);
    let ordered = items.first().is_some_and(|item| item.ordered);

    let mut children = vec![];
    let mut cursor = 0;
    while cursor < items.len() {
        let item = &items[cursor];
        let nested = items[cursor + 1..]
            .iter()
            .take_while(|next| next.indent > level)
            .count();

        let mut item_children = vec![Node::paragraph(tokenize_inline(&item.content, options))];
        if nested > 0 {
            item_children.push(group_list(&items[cursor + 1..cursor + 1 + nested], options));
        }
        children.push(Node::ListItem {
            children: item_children,
        });

        cursor += 1 + nested;
    }

    Node::List { ordered, children }
}
