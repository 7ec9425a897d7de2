// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in progression presets.
//!
//! Numerals are written the way players say them: lowercase degrees are
//! minor chords, uppercase degrees are major.

use crate::music::ChordSymbol;

/// A named progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Lookup name
    pub name: &'static str,
    /// Genre group
    pub genre: &'static str,
    /// Human-readable title
    pub title: &'static str,
    /// Degree tokens in order
    pub numerals: &'static [&'static str],
}

static PRESETS: [Preset; 4] = [
    Preset {
        name: "acg_classic",
        genre: "acg",
        title: "Classic anime progression",
        numerals: &["I", "V", "vi", "IV"],
    },
    Preset {
        name: "acg_sad",
        genre: "acg",
        title: "Sad anime progression",
        numerals: &["vi", "IV", "I", "V"],
    },
    Preset {
        name: "canon",
        genre: "mandopop",
        title: "Canon progression",
        numerals: &["I", "V", "vi", "iii", "IV", "I", "IV", "V"],
    },
    Preset {
        name: "pop_4536",
        genre: "mandopop",
        title: "4-5-3-6 progression",
        numerals: &["IV", "V", "iii", "vi"],
    },
];

impl Preset {
    /// Chord symbols for this preset, each lasting `duration` measures
    pub fn progression(&self, duration: f64) -> Vec<ChordSymbol> {
        self.numerals
            .iter()
            .map(|numeral| {
                let quality = if numeral.chars().any(|c| c.is_ascii_lowercase()) {
                    "min"
                } else {
                    "maj"
                };
                ChordSymbol::new(*numeral, quality).with_duration(duration)
            })
            .collect()
    }

    /// Numerals joined with dashes, e.g. "I-V-vi-IV"
    pub fn summary(&self) -> String {
        self.numerals.join("-")
    }
}

/// All presets
pub fn all() -> &'static [Preset] {
    &PRESETS
}

/// Find a preset by name (case-insensitive, `-` and `_` interchangeable)
pub fn find(name: &str) -> Option<&'static Preset> {
    let wanted = name.trim().to_lowercase().replace('-', "_");
    PRESETS.iter().find(|p| p.name == wanted)
}

/// Presets belonging to `genre`
pub fn by_genre(genre: &str) -> impl Iterator<Item = &'static Preset> + '_ {
    PRESETS.iter().filter(move |p| p.genre.eq_ignore_ascii_case(genre))
}
