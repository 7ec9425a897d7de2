// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Delta-timed track events.

use super::messages::{
    META, META_TEMPO, META_TIME_SIGNATURE, NOTE_OFF, NOTE_ON, PROGRAM_CHANGE,
};
use crate::music::MidiNote;

/// Largest value the 24-bit tempo meta-event can carry
pub const MAX_MICROS_PER_QUARTER: u32 = 0x00FF_FFFF;

/// Microseconds per quarter note for `bpm`, if the tempo meta-event can
/// hold it (roughly 3.58 to 60 million BPM).
pub fn micros_per_quarter(bpm: f64) -> Option<u32> {
    let micros = (60_000_000.0 / bpm).round();
    (1.0..=MAX_MICROS_PER_QUARTER as f64)
        .contains(&micros)
        .then_some(micros as u32)
}

/// What a track event does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Start a note
    NoteOn { pitch: MidiNote, velocity: u8 },
    /// Release a note
    NoteOff { pitch: MidiNote, velocity: u8 },
    /// Select an instrument on channel 0
    ProgramChange { program: u8 },
    /// Tempo meta-event in microseconds per quarter note
    Tempo { micros_per_quarter: u32 },
    /// Time-signature meta-event (denominator as a plain value, e.g. 4)
    TimeSignature { numerator: u8, denominator: u8 },
}

/// An event tagged with ticks elapsed since the previous event on the track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackEvent {
    /// Ticks since the previous event
    pub delta: u32,
    /// Event payload
    pub kind: EventKind,
}

impl TrackEvent {
    /// Create a new track event
    pub fn new(delta: u32, kind: EventKind) -> Self {
        Self { delta, kind }
    }

    pub fn note_on(delta: u32, pitch: MidiNote, velocity: u8) -> Self {
        Self::new(delta, EventKind::NoteOn { pitch, velocity })
    }

    pub fn note_off(delta: u32, pitch: MidiNote, velocity: u8) -> Self {
        Self::new(delta, EventKind::NoteOff { pitch, velocity })
    }

    pub fn program_change(program: u8) -> Self {
        Self::new(0, EventKind::ProgramChange { program })
    }

    /// Tempo event from BPM, saturated to the 24-bit field
    pub fn tempo(bpm: f64) -> Self {
        let micros_per_quarter =
            ((60_000_000.0 / bpm).round() as u32).clamp(1, MAX_MICROS_PER_QUARTER);
        Self::new(0, EventKind::Tempo { micros_per_quarter })
    }

    pub fn time_signature(numerator: u8, denominator: u8) -> Self {
        Self::new(0, EventKind::TimeSignature { numerator, denominator })
    }

    /// Is this a note-on?
    pub fn is_note_on(&self) -> bool {
        matches!(self.kind, EventKind::NoteOn { .. })
    }

    /// Is this a note-off?
    pub fn is_note_off(&self) -> bool {
        matches!(self.kind, EventKind::NoteOff { .. })
    }

    /// Pitch of a note event
    pub fn pitch(&self) -> Option<MidiNote> {
        match self.kind {
            EventKind::NoteOn { pitch, .. } | EventKind::NoteOff { pitch, .. } => Some(pitch),
            _ => None,
        }
    }

    /// Raw MIDI bytes on channel 0 (meta-events use the 0xFF form)
    pub fn to_bytes(&self) -> Vec<u8> {
        match self.kind {
            EventKind::NoteOn { pitch, velocity } => vec![NOTE_ON, pitch & 0x7F, velocity & 0x7F],
            EventKind::NoteOff { pitch, velocity } => vec![NOTE_OFF, pitch & 0x7F, velocity & 0x7F],
            EventKind::ProgramChange { program } => vec![PROGRAM_CHANGE, program & 0x7F],
            EventKind::Tempo { micros_per_quarter } => vec![
                META,
                META_TEMPO,
                0x03,
                ((micros_per_quarter >> 16) & 0xFF) as u8,
                ((micros_per_quarter >> 8) & 0xFF) as u8,
                (micros_per_quarter & 0xFF) as u8,
            ],
            EventKind::TimeSignature {
                numerator,
                denominator,
            } => {
                // Denominator is expressed as power of 2
                let denom_power = denominator.max(1).trailing_zeros() as u8;
                vec![
                    META, META_TIME_SIGNATURE, 0x04,
                    numerator,
                    denom_power,
                    24, // MIDI clocks per metronome click
                    8,  // 32nd notes per MIDI quarter note
                ]
            }
        }
    }
}

/// One track's worth of delta-timed events
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventStream {
    /// Ticks per quarter note
    pub ppqn: u16,
    /// Events in playback order
    pub events: Vec<TrackEvent>,
}

impl EventStream {
    /// Create an empty stream
    pub fn new(ppqn: u16) -> Self {
        Self {
            ppqn,
            events: Vec::new(),
        }
    }

    /// Append one event
    pub fn push(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    /// Append a batch of events
    pub fn extend<I: IntoIterator<Item = TrackEvent>>(&mut self, events: I) {
        self.events.extend(events);
    }

    /// Total length in ticks
    pub fn total_ticks(&self) -> u64 {
        self.events.iter().map(|e| e.delta as u64).sum()
    }

    /// Only the note events, in order
    pub fn note_events(&self) -> impl Iterator<Item = &TrackEvent> {
        self.events.iter().filter(|e| e.pitch().is_some())
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_bytes() {
        assert_eq!(TrackEvent::note_on(0, 60, 100).to_bytes(), vec![0x90, 60, 100]);
        assert_eq!(TrackEvent::note_off(96, 60, 100).to_bytes(), vec![0x80, 60, 100]);
        assert_eq!(TrackEvent::program_change(0).to_bytes(), vec![0xC0, 0]);
    }

    #[test]
    fn test_tempo_event() {
        let event = TrackEvent::tempo(120.0);
        assert_eq!(
            event.kind,
            EventKind::Tempo {
                micros_per_quarter: 500_000
            }
        );
        // 500000 = 0x07A120
        assert_eq!(event.to_bytes(), vec![0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_tempo_range() {
        assert_eq!(micros_per_quarter(120.0), Some(500_000));
        assert_eq!(micros_per_quarter(3.6), Some(16_666_667));
        assert_eq!(micros_per_quarter(3.5), None);
        assert_eq!(micros_per_quarter(1.0), None);
        assert_eq!(micros_per_quarter(1e9), None);
        assert_eq!(micros_per_quarter(0.0), None);
        assert_eq!(micros_per_quarter(f64::NAN), None);

        // Out-of-range tempos never wrap around in the written bytes
        let slow = TrackEvent::tempo(1.0).to_bytes();
        assert_eq!(&slow[3..], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_time_signature_bytes() {
        let bytes = TrackEvent::time_signature(4, 4).to_bytes();
        assert_eq!(bytes, vec![META, META_TIME_SIGNATURE, 0x04, 4, 2, 24, 8]);
    }

    #[test]
    fn test_stream_totals() {
        let mut stream = EventStream::new(480);
        stream.push(TrackEvent::tempo(90.0));
        stream.push(TrackEvent::note_on(0, 60, 100));
        stream.push(TrackEvent::note_off(480, 60, 100));
        stream.push(TrackEvent::note_on(10, 62, 100));
        stream.push(TrackEvent::note_off(470, 62, 100));

        assert_eq!(stream.total_ticks(), 960);
        assert_eq!(stream.note_events().count(), 4);
        assert_eq!(stream.len(), 5);
    }
}
