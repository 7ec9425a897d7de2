// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named rhythm styles.
//!
//! Each style is a fixed table of sub-beats that partitions a chord's
//! duration. Adding a style means adding a variant and a table; existing
//! names must keep their meaning.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One timed subdivision of a chord
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubBeat {
    /// Share of the chord's duration (the table sums to 1.0)
    pub fraction: f64,
    /// Velocity multiplier in (0, 1]
    pub velocity_scale: f64,
}

impl SubBeat {
    const fn new(fraction: f64, velocity_scale: f64) -> Self {
        Self {
            fraction,
            velocity_scale,
        }
    }

    /// Length of this sub-beat for a chord of `total_ticks`
    pub fn span(&self, total_ticks: u32) -> u32 {
        (total_ticks as f64 * self.fraction).round() as u32
    }

    /// Velocity of this sub-beat's hit (never below 1)
    pub fn velocity(&self, base: u8) -> u8 {
        ((base as f64 * self.velocity_scale).round() as u8).clamp(1, 127)
    }
}

const THIRD: f64 = 1.0 / 3.0;

static STRAIGHT: [SubBeat; 1] = [SubBeat::new(1.0, 1.0)];

static TRIPLET: [SubBeat; 3] = [
    SubBeat::new(THIRD, 1.0),
    SubBeat::new(THIRD, 1.0),
    SubBeat::new(THIRD, 1.0),
];

static SWING: [SubBeat; 2] = [SubBeat::new(0.6, 1.0), SubBeat::new(0.4, 0.9)];

static SHUFFLE: [SubBeat; 2] = [SubBeat::new(0.75, 1.0), SubBeat::new(0.25, 0.8)];

static ACG_8BEAT: [SubBeat; 2] = [SubBeat::new(0.5, 0.95), SubBeat::new(0.5, 0.95)];

// Syncopated: short pickup before the long accented hit
static ACG_16BEAT: [SubBeat; 3] = [
    SubBeat::new(0.3, 0.9),
    SubBeat::new(0.2, 0.8),
    SubBeat::new(0.5, 1.0),
];

static POP_BALLAD: [SubBeat; 2] = [SubBeat::new(0.7, 1.0), SubBeat::new(0.3, 0.7)];

static ROCK_4BEAT: [SubBeat; 4] = [
    SubBeat::new(0.25, 1.0),
    SubBeat::new(0.25, 0.85),
    SubBeat::new(0.25, 0.85),
    SubBeat::new(0.25, 0.85),
];

static JAZZ_WALTZ: [SubBeat; 3] = [
    SubBeat::new(THIRD, 1.0),
    SubBeat::new(THIRD, 0.8),
    SubBeat::new(THIRD, 0.7),
];

static CITYPOP: [SubBeat; 3] = [
    SubBeat::new(0.4, 0.9),
    SubBeat::new(0.2, 0.7),
    SubBeat::new(0.4, 0.95),
];

// Strong 1, softer 3
static ANIME_OP: [SubBeat; 4] = [
    SubBeat::new(0.4, 1.0),
    SubBeat::new(0.2, 0.6),
    SubBeat::new(0.3, 0.9),
    SubBeat::new(0.1, 0.5),
];

// Accent lands on the off-beat
static KPOP_SYNC: [SubBeat; 3] = [
    SubBeat::new(0.25, 0.7),
    SubBeat::new(0.25, 1.0),
    SubBeat::new(0.5, 0.9),
];

/// Rhythm styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RhythmStyle {
    /// One hit for the whole duration
    #[default]
    Straight,
    /// Three equal hits
    Triplet,
    /// 60/40 long-short pair
    Swing,
    /// 75/25 long-short pair
    Shuffle,
    /// Two even eighths
    #[serde(rename = "acg_8beat")]
    Acg8Beat,
    /// Syncopated sixteenths
    #[serde(rename = "acg_16beat")]
    Acg16Beat,
    /// Strong long hit, soft pickup
    PopBallad,
    /// Four on the floor
    #[serde(rename = "rock_4beat")]
    Rock4Beat,
    /// Accented triple
    JazzWaltz,
    /// Syncopated triple
    Citypop,
    /// Four-beat accent pattern
    AnimeOp,
    /// Off-beat accent
    KpopSync,
}

impl RhythmStyle {
    /// All styles, in picker order
    pub const ALL: [RhythmStyle; 12] = [
        RhythmStyle::Straight,
        RhythmStyle::Triplet,
        RhythmStyle::Swing,
        RhythmStyle::Shuffle,
        RhythmStyle::Acg8Beat,
        RhythmStyle::Acg16Beat,
        RhythmStyle::PopBallad,
        RhythmStyle::Rock4Beat,
        RhythmStyle::JazzWaltz,
        RhythmStyle::Citypop,
        RhythmStyle::AnimeOp,
        RhythmStyle::KpopSync,
    ];

    /// The sub-beat table for this style
    pub fn sub_beats(self) -> &'static [SubBeat] {
        match self {
            RhythmStyle::Straight => &STRAIGHT,
            RhythmStyle::Triplet => &TRIPLET,
            RhythmStyle::Swing => &SWING,
            RhythmStyle::Shuffle => &SHUFFLE,
            RhythmStyle::Acg8Beat => &ACG_8BEAT,
            RhythmStyle::Acg16Beat => &ACG_16BEAT,
            RhythmStyle::PopBallad => &POP_BALLAD,
            RhythmStyle::Rock4Beat => &ROCK_4BEAT,
            RhythmStyle::JazzWaltz => &JAZZ_WALTZ,
            RhythmStyle::Citypop => &CITYPOP,
            RhythmStyle::AnimeOp => &ANIME_OP,
            RhythmStyle::KpopSync => &KPOP_SYNC,
        }
    }

    /// Stable name used in documents and on the command line
    pub fn name(self) -> &'static str {
        match self {
            RhythmStyle::Straight => "straight",
            RhythmStyle::Triplet => "triplet",
            RhythmStyle::Swing => "swing",
            RhythmStyle::Shuffle => "shuffle",
            RhythmStyle::Acg8Beat => "acg_8beat",
            RhythmStyle::Acg16Beat => "acg_16beat",
            RhythmStyle::PopBallad => "pop_ballad",
            RhythmStyle::Rock4Beat => "rock_4beat",
            RhythmStyle::JazzWaltz => "jazz_waltz",
            RhythmStyle::Citypop => "citypop",
            RhythmStyle::AnimeOp => "anime_op",
            RhythmStyle::KpopSync => "kpop_sync",
        }
    }

    /// Parse a style name (case and `-`/`_` insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase().replace('-', "_");
        RhythmStyle::ALL.into_iter().find(|s| s.name() == wanted)
    }
}

impl fmt::Display for RhythmStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
