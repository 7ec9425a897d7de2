// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for chord resolution and progression rendering.
//!
//! Errors come in two tiers:
//! - [`GenerateError`] aborts a whole generation or save call
//! - [`ChordError`] is scoped to one chord; the sequencer skips (or patches)
//!   that chord and reports a [`ChordWarning`] instead of failing

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors: the request as a whole cannot be honoured.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The key is not one of the supported major keys.
    #[error("Unsupported key: {0:?}")]
    InvalidKey(String),

    /// Tempo must be a finite, positive BPM value.
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    /// Writing the MIDI file failed; no file is left at `path`.
    #[error("Failed to write MIDI file {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Recoverable errors affecting a single chord.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChordError {
    /// The degree token could not be matched to I..VII, even after recovery.
    #[error("Invalid chord symbol: {0:?}")]
    InvalidChordSymbol(String),

    /// The quality name is not in the vocabulary; major triad was used instead.
    #[error("Unknown chord quality {0:?}, using major triad")]
    UnknownQuality(String),

    /// Duration must be a finite, positive fraction of a measure that fits
    /// in a MIDI delta.
    #[error("Invalid chord duration: {0}")]
    InvalidDuration(f64),

    /// The rhythm name is not a known style; the progression default was used.
    #[error("Unknown rhythm style {0:?}, using the default style")]
    UnknownRhythm(String),
}

impl ChordError {
    /// Whether the chord was dropped from the output (as opposed to patched).
    pub fn is_skip(&self) -> bool {
        !matches!(
            self,
            ChordError::UnknownQuality(_) | ChordError::UnknownRhythm(_)
        )
    }
}

/// A recoverable condition observed at a given progression position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordWarning {
    /// Zero-based section, when rendering an arrangement
    pub section: Option<usize>,
    /// Zero-based position of the chord in its progression
    pub index: usize,
    /// Degree token as written
    pub symbol: String,
    /// What went wrong
    pub error: ChordError,
}

impl fmt::Display for ChordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = if self.error.is_skip() { "skipped" } else { "patched" };
        if let Some(section) = self.section {
            write!(f, "section {}, ", section + 1)?;
        }
        write!(
            f,
            "chord {} ({}) {}: {}",
            self.index + 1,
            self.symbol,
            action,
            self.error
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ChordWarning {
            section: None,
            index: 1,
            symbol: "X".to_string(),
            error: ChordError::InvalidChordSymbol("X".to_string()),
        };
        assert_eq!(
            warning.to_string(),
            "chord 2 (X) skipped: Invalid chord symbol: \"X\""
        );

        let in_section = ChordWarning {
            section: Some(2),
            index: 0,
            symbol: "IV".to_string(),
            error: ChordError::UnknownRhythm("polka".to_string()),
        };
        assert_eq!(
            in_section.to_string(),
            "section 3, chord 1 (IV) patched: Unknown rhythm style \"polka\", using the default style"
        );
    }

    #[test]
    fn test_skip_classification() {
        assert!(ChordError::InvalidChordSymbol("Q".into()).is_skip());
        assert!(ChordError::InvalidDuration(0.0).is_skip());
        assert!(!ChordError::UnknownQuality("weird".into()).is_skip());
        assert!(!ChordError::UnknownRhythm("polka".into()).is_skip());
    }

    #[test]
    fn test_generate_error_messages() {
        assert_eq!(
            GenerateError::InvalidKey("H".into()).to_string(),
            "Unsupported key: \"H\""
        );
        assert_eq!(
            GenerateError::InvalidTempo(0.0).to_string(),
            "Invalid tempo: 0 BPM"
        );
    }
}
