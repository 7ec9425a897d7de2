// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory for chordseq.
//!
//! This module provides major keys, the chord-quality vocabulary, and the
//! resolver that turns roman-numeral chord symbols into MIDI pitches.

pub mod chord;
pub mod scale;

pub use chord::{resolve, ChordQuality, ChordSymbol, Degree, ResolvedChord, BASE_NOTE};
pub use scale::{note_name, Key, MidiNote, Note};
