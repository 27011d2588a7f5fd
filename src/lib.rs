//! Markdown parser for mix write-ups: ordinary markdown plus track marker
//! headers (`#### Title - Artist (Album) [seconds]`) that tie the following
//! paragraphs and cover images to a point in the mix.

mod ast;
mod config;
mod diagnostic;
mod parser;
mod token;
mod tokenizer;
mod track;
mod util;

pub use ast::{visit, visit_all, Image, Node, ParseResult, TrackMarker};
pub use config::{ConfigError, ParserConfig};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use parser::Parser;
pub use token::HeadingLevel;

/// Parses `input` with the default configuration.
pub fn parse(input: &str) -> ParseResult {
    Parser::default().parse(input)
}
