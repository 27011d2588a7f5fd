use serde::Deserialize;
use thiserror::Error;

use crate::token::HeadingLevel;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("track header level must be between 1 and 6, got {0}")]
    InvalidTrackLevel(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Header level whose content is matched against the track pattern.
    pub track_header_level: u8,
    /// Recognize `[N]` as a citation.
    pub citations: bool,
    /// Keep image-only paragraphs that appear before any track marker
    /// instead of dropping them.
    pub keep_untracked_images: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            track_header_level: 4,
            citations: true,
            keep_untracked_images: false,
        }
    }
}

impl ParserConfig {
    pub(crate) fn track_level(&self) -> Result<HeadingLevel, ConfigError> {
        HeadingLevel::new(self.track_header_level)
            .ok_or(ConfigError::InvalidTrackLevel(self.track_header_level))
    }
}
