// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI event model and file output.
//!
//! This module provides:
//! - Delta-timed [`TrackEvent`]s and the [`EventStream`] they form
//! - Standard MIDI file export with atomic saves

pub mod event;
pub mod export;

pub use event::{micros_per_quarter, EventKind, EventStream, TrackEvent, MAX_MICROS_PER_QUARTER};
pub use export::{unique_path, MidiExporter};

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const PROGRAM_CHANGE: u8 = 0xC0;

    // Meta events (file only)
    pub const META: u8 = 0xFF;
    pub const META_TEMPO: u8 = 0x51;
    pub const META_TIME_SIGNATURE: u8 = 0x58;
    pub const META_END_OF_TRACK: u8 = 0x2F;
}
