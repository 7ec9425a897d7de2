// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! chordseq - roman-numeral chord progressions to Standard MIDI Files.
//!
//! A progression of [`ChordSymbol`]s is resolved against a major [`Key`],
//! rendered through a [`RhythmStyle`] (as block chords or arpeggios) into an
//! [`EventStream`], and written out by [`MidiExporter`]. Songs with several
//! sections are described by an [`Arrangement`].

pub mod arrangement;
pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod rhythm;
pub mod sequencer;

pub use arrangement::{Arrangement, Section, SectionType};
pub use config::{ProgressionFile, SongConfig};
pub use error::{ChordError, ChordWarning, GenerateError};
pub use midi::{EventKind, EventStream, MidiExporter, TrackEvent};
pub use music::{resolve, ChordQuality, ChordSymbol, Degree, Key, ResolvedChord};
pub use rhythm::RhythmStyle;
pub use sequencer::{Generation, RenderMode, Sequencer, SequencerConfig};
