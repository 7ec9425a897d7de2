// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm styles and the pattern engine.
//!
//! This module provides:
//! - The twelve named [`RhythmStyle`] sub-beat tables
//! - [`apply`] for block chords and [`arpeggiate`] for broken chords

pub mod engine;
pub mod style;

pub use engine::{apply, arpeggiate, EventGroup, DEFAULT_ARPEGGIO_GAP};
pub use style::{RhythmStyle, SubBeat};
