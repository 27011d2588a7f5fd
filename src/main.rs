use std::io::Read;
use std::path::PathBuf;
use std::{fs, io};

use anyhow::{Context, Result};
use clap::Parser as _;
use log::{info, warn, LevelFilter};
use trackdown::{Parser, ParserConfig};

/// Parse a mix write-up and print the document tree as JSON.
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Markdown file to read; stdin when omitted
    input: Option<PathBuf>,

    /// Header level that carries track markers
    #[arg(short = 'l', long = "track-level", default_value_t = 4)]
    track_level: u8,

    /// Treat `[N]` as plain text instead of a citation
    #[arg(long)]
    no_citations: bool,

    /// Keep image paragraphs that appear before the first track
    #[arg(long)]
    keep_untracked_images: bool,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> ParserConfig {
        ParserConfig {
            track_header_level: self.track_level,
            citations: !self.no_citations,
            keep_untracked_images: self.keep_untracked_images,
        }
    }

    fn read_input(&self) -> Result<String> {
        match &self.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => {
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .context("Failed to read from stdin")?;
                Ok(input)
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let parser = Parser::new(cli.config()).context("Invalid parser configuration")?;
    let input = cli.read_input()?;
    let result = parser.parse(&input);

    for diagnostic in &result.diagnostics {
        warn!("{}", diagnostic);
    }
    info!(
        "{} nodes, {} tracks, {} diagnostics",
        result.nodes.len(),
        result.tracks.len(),
        result.diagnostics.len()
    );

    let json = if cli.compact {
        serde_json::to_string(&result)
    } else {
        serde_json::to_string_pretty(&result)
    }
    .context("Failed to serialize parse result")?;
    println!("{}", json);

    Ok(())
}
