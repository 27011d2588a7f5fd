use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{visit, Image, Node, ParseResult, TrackMarker};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::parser::{lower_block, Parser};
use crate::token::{Block, BlockKind};
use crate::tokenizer::tokenize_inline;

static TRACK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+?)(?:\s*-\s*(.+?))?(?:\s*\((.+?)\))?\s*\[([0-9]+)\]$").unwrap()
});
// Anything ending in `[...]` was probably meant as a track marker.
static TRACK_SUFFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]$").unwrap());

/// Parses `Title - Artist (Album) [position]`. Artist and album are
/// optional; the position must fit in a `u32`.
pub(crate) fn parse_track_marker(content: &str) -> Option<TrackMarker> {
    let caps = TRACK_REGEX.captures(content.trim())?;
    let position = caps.get(4)?.as_str().parse().ok()?;
    let optional = |index| {
        caps.get(index)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(TrackMarker {
        title: caps.get(1)?.as_str().trim().to_string(),
        artist: optional(2),
        album: optional(3),
        position,
        images: vec![],
    })
}

#[derive(Debug, Clone, Copy)]
struct OpenTrack {
    /// Index of the marker in `TrackState::nodes`.
    index: usize,
    position: u32,
}

/// State threaded through the fold over blocks. The open track is only
/// ever reached through its index in `nodes`.
#[derive(Debug, Default)]
pub(crate) struct TrackState {
    nodes: Vec<Node>,
    tracks: Vec<TrackMarker>,
    diagnostics: Vec<Diagnostic>,
    open: Option<OpenTrack>,
}

impl TrackState {
    pub(crate) fn accept(mut self, block: Block, parser: &Parser) -> Self {
        let Block { line, kind } = block;
        match kind {
            BlockKind::Heading { level, content } if level == parser.track_level() => {
                match parse_track_marker(&content) {
                    Some(marker) => self.open_track(marker),
                    None => {
                        if TRACK_SUFFIX_REGEX.is_match(&content) {
                            debug!("line {}: malformed track marker {:?}", line, content);
                            self.diagnostics.push(Diagnostic::new(
                                line,
                                DiagnosticKind::MalformedTrackMarker {
                                    content: content.clone(),
                                },
                            ));
                        }
                        let node = lower_block(BlockKind::Heading { level, content }, parser);
                        self.emit(node, line);
                    }
                }
            }
            BlockKind::Paragraph(text) => self.accept_paragraph(&text, line, parser),
            BlockKind::CodeBlock {
                terminated: false, ..
            } => {
                self.diagnostics
                    .push(Diagnostic::new(line, DiagnosticKind::UnterminatedCodeFence));
                let node = lower_block(kind, parser);
                self.emit(node, line);
            }
            kind => {
                let node = lower_block(kind, parser);
                self.emit(node, line);
            }
        }

        self
    }

    pub(crate) fn finish(mut self) -> ParseResult {
        self.close_track();

        ParseResult {
            nodes: self.nodes,
            tracks: self.tracks,
            diagnostics: self.diagnostics,
        }
    }

    fn accept_paragraph(&mut self, text: &str, line: usize, parser: &Parser) {
        let children = tokenize_inline(text, parser.inline_options());

        if let Some(mut image) = standalone_image(&children) {
            match self.open {
                Some(open) => {
                    self.check_destinations(&children, line);
                    image.position = Some(open.position);
                    if let Some(Node::TrackMarker(marker)) = self.nodes.get_mut(open.index) {
                        marker.images.push(image);
                    }
                    return;
                }
                None if !parser.config().keep_untracked_images => {
                    debug!("line {}: dropping image {:?} outside any track", line, image.src);
                    self.diagnostics.push(Diagnostic::new(
                        line,
                        DiagnosticKind::UntrackedImage { src: image.src },
                    ));
                    return;
                }
                None => {}
            }
        }

        let node = match self.open {
            Some(open) => Node::Paragraph {
                children,
                position: Some(open.position),
                has_track: true,
            },
            None => Node::paragraph(children),
        };
        self.emit(node, line);
    }

    fn open_track(&mut self, marker: TrackMarker) {
        self.close_track();
        self.open = Some(OpenTrack {
            index: self.nodes.len(),
            position: marker.position,
        });
        self.nodes.push(Node::TrackMarker(marker));
    }

    fn close_track(&mut self) {
        if let Some(open) = self.open.take() {
            if let Some(Node::TrackMarker(marker)) = self.nodes.get(open.index) {
                self.tracks.push(marker.clone());
            }
        }
    }

    fn emit(&mut self, node: Node, line: usize) {
        self.check_destinations(std::slice::from_ref(&node), line);
        self.nodes.push(node);
    }

    fn check_destinations(&mut self, nodes: &[Node], line: usize) {
        let mut missing = 0;
        for node in nodes {
            visit(node, &mut |node: &Node| match node {
                Node::Link { url, .. } if url.is_empty() => missing += 1,
                Node::Image(image) if image.src.is_empty() => missing += 1,
                _ => {}
            });
        }
        for _ in 0..missing {
            self.diagnostics
                .push(Diagnostic::new(line, DiagnosticKind::MissingUrl));
        }
    }
}

/// The image of a paragraph that holds nothing else but whitespace.
fn standalone_image(children: &[Node]) -> Option<Image> {
    let mut image = None;
    for child in children {
        match child {
            Node::Image(found) if image.is_none() => image = Some(found),
            Node::Text { value } if value.trim().is_empty() => {}
            _ => return None,
        }
    }

    image.cloned()
}
