// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song sections.
//!
//! A section carries its own chords, an optional tempo and rhythm, and an
//! optional length in bars. With a length set, the chords repeat until the
//! section is full and the last chord is shortened to fit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::music::ChordSymbol;
use crate::rhythm::RhythmStyle;

/// Measures below this are treated as already full
const FILL_EPSILON: f64 = 1e-9;

/// Role of a section within a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Intro,
    #[default]
    Verse,
    Chorus,
    Bridge,
    Outro,
}

impl SectionType {
    /// All section types, in song order
    pub const ALL: [SectionType; 5] = [
        SectionType::Intro,
        SectionType::Verse,
        SectionType::Chorus,
        SectionType::Bridge,
        SectionType::Outro,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SectionType::Intro => "intro",
            SectionType::Verse => "verse",
            SectionType::Chorus => "chorus",
            SectionType::Bridge => "bridge",
            SectionType::Outro => "outro",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A named section in the song arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section name
    pub name: String,
    /// Section role
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: SectionType,
    /// Preset used when `chords` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Chords for this section
    #[serde(default)]
    pub chords: Vec<ChordSymbol>,
    /// Length in bars (None = play the chords once)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    /// Tempo for this section (None = song tempo)
    #[serde(default, alias = "bpm", skip_serializing_if = "Option::is_none")]
    pub tempo: Option<f64>,
    /// Rhythm for chords that don't name one (None = song rhythm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhythm: Option<RhythmStyle>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>, kind: SectionType) -> Self {
        Self {
            name: name.into(),
            kind,
            preset: None,
            chords: Vec::new(),
            length: None,
            tempo: None,
            rhythm: None,
        }
    }

    /// Builder: set chords
    pub fn with_chords(mut self, chords: Vec<ChordSymbol>) -> Self {
        self.chords = chords;
        self
    }

    /// Builder: set length in bars
    pub fn with_length(mut self, bars: u32) -> Self {
        self.length = Some(bars);
        self
    }

    /// Builder: set tempo
    pub fn with_tempo(mut self, tempo: f64) -> Self {
        self.tempo = Some(tempo);
        self
    }

    /// Builder: set rhythm
    pub fn with_rhythm(mut self, rhythm: RhythmStyle) -> Self {
        self.rhythm = Some(rhythm);
        self
    }

    /// Measures the chords cover once, counting only usable durations
    pub fn chord_measures(&self) -> f64 {
        self.chords
            .iter()
            .map(|c| c.duration)
            .filter(|d| d.is_finite() && *d > 0.0)
            .sum()
    }

    /// Length in measures as rendered
    pub fn measures(&self) -> f64 {
        match self.length {
            Some(bars) if self.chord_measures() > 0.0 => bars as f64,
            _ => self.chord_measures(),
        }
    }

    /// Chords to render, each tagged with its index in `chords`.
    ///
    /// Without a length this is `chords` once. With a length the chords
    /// cycle until `length` measures are filled. Chords with unusable
    /// durations pass through so the sequencer can report them.
    pub fn fitted_chords(&self) -> Vec<(usize, ChordSymbol)> {
        let once = || -> Vec<(usize, ChordSymbol)> {
            self.chords.iter().cloned().enumerate().collect()
        };
        let Some(bars) = self.length else {
            return once();
        };
        if self.chord_measures() <= 0.0 {
            return once();
        }

        let target = bars as f64;
        let mut elapsed = 0.0;
        let mut fitted = Vec::new();

        'fill: loop {
            for (index, chord) in self.chords.iter().enumerate() {
                let remaining = target - elapsed;
                if remaining <= FILL_EPSILON {
                    break 'fill;
                }
                let mut chord = chord.clone();
                if chord.duration.is_finite() && chord.duration > 0.0 {
                    chord.duration = chord.duration.min(remaining);
                    elapsed += chord.duration;
                }
                fitted.push((index, chord));
            }
        }

        fitted
    }
}
