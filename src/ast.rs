use serde::Serialize;

use crate::diagnostic::Diagnostic;
use crate::token::HeadingLevel;

/// A node of the parsed document. Block and inline nodes share one enum so
/// that a single visitor can walk the whole tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Node {
    // Block
    Header {
        level: HeadingLevel,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<u32>,
        has_track: bool,
    },
    Blockquote {
        children: Vec<Node>,
    },
    CodeBlock {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    List {
        ordered: bool,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    HorizontalRule,
    TrackMarker(TrackMarker),

    // Inline
    Bold {
        children: Vec<Node>,
    },
    Italic {
        children: Vec<Node>,
    },
    Code {
        value: String,
    },
    Link {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },
    Image(Image),
    Citation {
        value: String,
    },

    // Text
    Text {
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Position of the track this image was attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Song metadata taken from a `#### Title - Artist (Album) [position]`
/// header, together with the images that follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackMarker {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Cue point, in seconds from the start of the mix.
    pub position: u32,
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    pub nodes: Vec<Node>,
    pub tracks: Vec<TrackMarker>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    /// An untagged paragraph.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph {
            children,
            position: None,
            has_track: false,
        }
    }

    /// The tag this node serializes under.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Node::Header { .. } => "header",
            Node::Paragraph { .. } => "paragraph",
            Node::Blockquote { .. } => "blockquote",
            Node::CodeBlock { .. } => "codeBlock",
            Node::List { .. } => "list",
            Node::ListItem { .. } => "listItem",
            Node::HorizontalRule => "horizontalRule",
            Node::TrackMarker(_) => "trackMarker",
            Node::Bold { .. } => "bold",
            Node::Italic { .. } => "italic",
            Node::Code { .. } => "code",
            Node::Link { .. } => "link",
            Node::Image(_) => "image",
            Node::Citation { .. } => "citation",
            Node::Text { .. } => "text",
        }
    }

    /// Child nodes in source order. Leaves return an empty slice. Track
    /// images are not children; reach them through the [`TrackMarker`].
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Header { children, .. }
            | Node::Paragraph { children, .. }
            | Node::Blockquote { children }
            | Node::List { children, .. }
            | Node::ListItem { children }
            | Node::Bold { children }
            | Node::Italic { children }
            | Node::Link { children, .. } => children,
            Node::CodeBlock { .. }
            | Node::HorizontalRule
            | Node::TrackMarker(_)
            | Node::Code { .. }
            | Node::Image(_)
            | Node::Citation { .. }
            | Node::Text { .. } => &[],
        }
    }
}

/// Pre-order traversal: `callback` sees `node`, then each of its children
/// in order.
pub fn visit<F>(node: &Node, callback: &mut F)
where
    F: FnMut(&Node),
{
    callback(node);
    for child in node.children() {
        visit(child, callback);
    }
}

/// [`visit`] over every top-level node of a document.
pub fn visit_all<F>(nodes: &[Node], callback: &mut F)
where
    F: FnMut(&Node),
{
    for node in nodes {
        visit(node, callback);
    }
}

impl ParseResult {
    /// Index of the latest track whose cue point is at or before `time`.
    pub fn track_index_at(&self, time: u32) -> Option<usize> {
        self.tracks.iter().rposition(|track| track.position <= time)
    }

    pub fn track_at(&self, time: u32) -> Option<&TrackMarker> {
        self.track_index_at(time).map(|index| &self.tracks[index])
    }

    /// Top-level paragraphs tagged with the track at `position`.
    pub fn paragraphs_at(&self, position: u32) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |node| {
            matches!(node, Node::Paragraph { position: Some(p), .. } if *p == position)
        })
    }
}
