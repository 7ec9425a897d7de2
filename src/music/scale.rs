// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes and major keys.
//!
//! A [`Key`] names a major scale and exposes its seven-degree table of
//! semitone offsets from C. Tables are ascending: degrees that pass the
//! octave keep counting up (F major is `[5, 7, 9, 10, 12, 14, 16]`) so
//! chords built on any degree stay in root-position order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// MIDI note number type (0-127)
pub type MidiNote = u8;

/// Major scale intervals from the tonic
pub const MAJOR_INTERVALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Chromatic name table, indexed by `pitch % 12`
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note names (pitch classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Note {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl Note {
    /// All notes in chromatic order
    pub const ALL: [Note; 12] = [
        Note::C,
        Note::Cs,
        Note::D,
        Note::Ds,
        Note::E,
        Note::F,
        Note::Fs,
        Note::G,
        Note::Gs,
        Note::A,
        Note::As,
        Note::B,
    ];

    /// Get the pitch class (0-11) for this note
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Parse note from string (e.g., "C", "C#", "Db", "F#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" => Some(Note::C),
            "C#" | "DB" => Some(Note::Cs),
            "D" => Some(Note::D),
            "D#" | "EB" => Some(Note::Ds),
            "E" | "FB" => Some(Note::E),
            "F" | "E#" => Some(Note::F),
            "F#" | "GB" => Some(Note::Fs),
            "G" => Some(Note::G),
            "G#" | "AB" => Some(Note::Gs),
            "A" => Some(Note::A),
            "A#" | "BB" => Some(Note::As),
            "B" | "CB" => Some(Note::B),
            _ => None,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(NOTE_NAMES[self.pitch_class() as usize])
    }
}

/// Name a MIDI pitch by its pitch class.
pub fn note_name(pitch: u8) -> &'static str {
    NOTE_NAMES[(pitch % 12) as usize]
}

/// A major key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    tonic: Note,
}

impl Key {
    /// Create the major key on `tonic`
    pub fn new(tonic: Note) -> Self {
        Self { tonic }
    }

    /// Parse a key name such as "C", "F#" or "Bb".
    ///
    /// Anything that does not name one of the twelve supported major keys
    /// fails with [`GenerateError::InvalidKey`].
    pub fn parse(name: &str) -> Result<Self, GenerateError> {
        Note::parse(name)
            .map(Key::new)
            .ok_or_else(|| GenerateError::InvalidKey(name.to_string()))
    }

    /// Every supported key, in chromatic order from C
    pub fn supported() -> impl Iterator<Item = Key> {
        Note::ALL.into_iter().map(Key::new)
    }

    /// Get the tonic
    pub fn tonic(&self) -> Note {
        self.tonic
    }

    /// Conventional spelling of the key name (flats for Db, Eb, Ab, Bb)
    pub fn name(&self) -> &'static str {
        match self.tonic {
            Note::C => "C",
            Note::Cs => "Db",
            Note::D => "D",
            Note::Ds => "Eb",
            Note::E => "E",
            Note::F => "F",
            Note::Fs => "F#",
            Note::G => "G",
            Note::Gs => "Ab",
            Note::A => "A",
            Note::As => "Bb",
            Note::B => "B",
        }
    }

    /// Semitone offsets from C for the seven scale degrees
    pub fn scale_table(&self) -> [u8; 7] {
        let tonic = self.tonic.pitch_class();
        MAJOR_INTERVALS.map(|interval| tonic + interval)
    }

    /// Offset from C of a zero-based scale degree (wraps past the seventh)
    pub fn degree_offset(&self, degree_index: usize) -> u8 {
        self.scale_table()[degree_index % 7]
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::new(Note::C)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} major", self.name())
    }
}
