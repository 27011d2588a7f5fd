use serde::Serialize;
use thiserror::Error;

/// A recoverable problem noticed while parsing. Diagnostics never stop the
/// parse; the offending input is still represented in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based source line.
    pub line: usize,
    pub kind: DiagnosticKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiagnosticKind {
    #[error("code fence is never closed; block runs to end of input")]
    UnterminatedCodeFence,
    #[error("header looks like a track marker but does not match the pattern: {content}")]
    MalformedTrackMarker { content: String },
    #[error("image {src} appears before any track marker and was dropped")]
    UntrackedImage { src: String },
    #[error("link or image has an empty destination")]
    MissingUrl,
}

impl Diagnostic {
    pub(crate) fn new(line: usize, kind: DiagnosticKind) -> Self {
        Self { line, kind }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}
