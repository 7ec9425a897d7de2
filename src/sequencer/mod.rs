// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Progression sequencer.
//!
//! Walks a progression chord by chord, resolves each symbol, renders it
//! through the rhythm engine and appends the result to a single track. The
//! stream opens with program, tempo and 4/4 time-signature events at delta 0.
//! Arrangements render their sections back to back, with a tempo event at
//! every section boundary.
//!
//! Chords that cannot be resolved contribute no events and no time; they are
//! reported in [`Generation::warnings`] with their position.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;
use crate::error::{ChordError, ChordWarning, GenerateError};
use crate::midi::{micros_per_quarter, EventKind, EventStream, TrackEvent};
use crate::music::{resolve, ChordSymbol, Key, ResolvedChord};
use crate::rhythm::{self, EventGroup, RhythmStyle, DEFAULT_ARPEGGIO_GAP};

/// Largest delta a MIDI variable-length quantity can hold
const MAX_TICKS: f64 = 0x0FFF_FFFF as f64;

/// How chord notes are laid out in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// All notes of each sub-beat together
    #[default]
    Block,
    /// One note at a time
    Arpeggio,
}

impl RenderMode {
    /// Parse a mode name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "block" => Some(RenderMode::Block),
            "arpeggio" | "broken" => Some(RenderMode::Arpeggio),
            _ => None,
        }
    }
}

/// Output settings for the sequencer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerConfig {
    /// Ticks per quarter note
    pub ppqn: u16,
    /// General MIDI program selected at the start of the file
    pub program: u8,
    /// Velocity of an unaccented block-chord hit
    pub velocity: u8,
    /// Velocity of an unaccented arpeggiated note
    pub arpeggio_velocity: u8,
    /// Silence between arpeggiated notes, in ticks
    pub arpeggio_gap: u32,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            ppqn: 480,
            program: 0,
            velocity: 100,
            arpeggio_velocity: 80,
            arpeggio_gap: DEFAULT_ARPEGGIO_GAP,
        }
    }
}

impl SequencerConfig {
    /// Get ticks per bar (always 4/4)
    pub fn ticks_per_measure(&self) -> u32 {
        self.ppqn as u32 * 4
    }

    /// Ticks for a chord lasting `duration` measures, if that is a usable
    /// length: finite, positive, and small enough for a MIDI delta.
    pub fn chord_ticks(&self, duration: f64) -> Option<u32> {
        if !duration.is_finite() || duration <= 0.0 {
            return None;
        }
        let ticks = (self.ticks_per_measure() as f64 * duration).round();
        (ticks <= MAX_TICKS).then_some(ticks as u32)
    }

    /// Base velocity for `mode`
    pub fn velocity_for(&self, mode: RenderMode) -> u8 {
        match mode {
            RenderMode::Block => self.velocity,
            RenderMode::Arpeggio => self.arpeggio_velocity,
        }
    }
}

/// Where a section starts in a generated stream
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMark {
    /// Section name
    pub name: String,
    /// Absolute tick of the section's first event
    pub start_tick: u64,
    /// Section tempo
    pub tempo: f64,
    /// Index into [`Generation::chords`] of the section's first chord
    pub first_chord: usize,
}

/// Result of a generation call
#[derive(Debug, Clone)]
pub struct Generation {
    /// The finished track
    pub stream: EventStream,
    /// Chords that were skipped or patched
    pub warnings: Vec<ChordWarning>,
    /// Rendered chords with their progression index
    pub chords: Vec<(usize, ResolvedChord)>,
    /// Opening tempo
    pub tempo: f64,
    /// Section boundaries (empty for a plain progression)
    pub sections: Vec<SectionMark>,
}

impl Generation {
    /// Playback length, following every tempo change in the stream
    pub fn duration(&self) -> Duration {
        let ppqn = self.stream.ppqn.max(1) as f64;
        let mut micros_per_tick = 60_000_000.0 / self.tempo / ppqn;
        let mut micros = 0.0;

        for event in &self.stream.events {
            micros += event.delta as f64 * micros_per_tick;
            if let EventKind::Tempo { micros_per_quarter } = event.kind {
                micros_per_tick = micros_per_quarter as f64 / ppqn;
            }
        }

        Duration::from_micros(micros.round() as u64)
    }

    /// Whether any chord was dropped
    pub fn has_skips(&self) -> bool {
        self.warnings.iter().any(|w| w.error.is_skip())
    }
}

/// A chord ready to append to the track
#[derive(Debug, Clone)]
pub struct RenderedChord {
    /// The resolved chord
    pub chord: ResolvedChord,
    /// Its events, one group per sub-beat
    pub groups: Vec<EventGroup>,
    /// Problems that were patched rather than skipped
    pub patches: Vec<ChordError>,
}

/// Progression sequencer
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    config: SequencerConfig,
}

impl Sequencer {
    /// Create a sequencer with the given output settings
    pub fn new(config: SequencerConfig) -> Self {
        Self { config }
    }

    /// Get the config
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Render a progression into one event stream.
    ///
    /// Fails only for an unsupported key or an unusable tempo; per-chord
    /// problems end up in [`Generation::warnings`].
    pub fn generate(
        &self,
        progression: &[ChordSymbol],
        key: &str,
        tempo: f64,
        mode: RenderMode,
        default_style: RhythmStyle,
    ) -> Result<Generation, GenerateError> {
        let key = Key::parse(key)?;
        check_tempo(tempo)?;

        let mut generation = self.open(tempo, progression.len());
        self.render_chords(
            &mut generation,
            &key,
            progression.iter().enumerate(),
            mode,
            default_style,
            None,
        );
        Ok(generation)
    }

    /// Render every section of `arrangement` in order into one stream.
    ///
    /// Each section plays at its own tempo (or `tempo`) and rhythm (or
    /// `default_style`). Any section tempo the file cannot hold fails the
    /// whole call before anything is rendered.
    pub fn generate_arrangement(
        &self,
        arrangement: &Arrangement,
        key: &str,
        tempo: f64,
        mode: RenderMode,
        default_style: RhythmStyle,
    ) -> Result<Generation, GenerateError> {
        let key = Key::parse(key)?;
        check_tempo(tempo)?;
        for section in arrangement.sections() {
            if let Some(section_tempo) = section.tempo {
                check_tempo(section_tempo)?;
            }
        }

        let opening = arrangement
            .get_section(0)
            .and_then(|s| s.tempo)
            .unwrap_or(tempo);
        let mut generation = self.open(opening, 0);

        for (index, section) in arrangement.sections().iter().enumerate() {
            let section_tempo = section.tempo.unwrap_or(tempo);
            if index > 0 {
                generation.stream.push(TrackEvent::tempo(section_tempo));
            }
            generation.sections.push(SectionMark {
                name: section.name.clone(),
                start_tick: generation.stream.total_ticks(),
                tempo: section_tempo,
                first_chord: generation.chords.len(),
            });
            tracing::debug!("Section {} ({}) at {} BPM", index + 1, section.name, section_tempo);

            let fitted = section.fitted_chords();
            self.render_chords(
                &mut generation,
                &key,
                fitted.iter().map(|(i, chord)| (*i, chord)),
                mode,
                section.rhythm.unwrap_or(default_style),
                Some(index),
            );
        }

        Ok(generation)
    }

    /// Resolve and render a single chord.
    pub fn render_chord(
        &self,
        key: &Key,
        symbol: &ChordSymbol,
        mode: RenderMode,
        default_style: RhythmStyle,
    ) -> Result<RenderedChord, ChordError> {
        let ticks = self
            .config
            .chord_ticks(symbol.duration)
            .ok_or(ChordError::InvalidDuration(symbol.duration))?;

        let chord = resolve(key, symbol)?;
        let mut patches = Vec::new();
        if let Some(quality) = &chord.fallback_from {
            patches.push(ChordError::UnknownQuality(quality.clone()));
        }
        let style = match symbol.rhythm_style() {
            Ok(style) => style.unwrap_or(default_style),
            Err(error) => {
                patches.push(error);
                default_style
            }
        };
        let velocity = self.config.velocity_for(mode);

        let groups = match mode {
            RenderMode::Block => rhythm::apply(&chord.notes, ticks, style, velocity),
            RenderMode::Arpeggio => {
                rhythm::arpeggiate(&chord.notes, ticks, style, velocity, self.config.arpeggio_gap)
            }
        };

        Ok(RenderedChord {
            chord,
            groups,
            patches,
        })
    }

    /// Empty generation holding the setup events
    fn open(&self, tempo: f64, capacity: usize) -> Generation {
        let mut stream = EventStream::new(self.config.ppqn);
        stream.push(TrackEvent::program_change(self.config.program));
        stream.push(TrackEvent::tempo(tempo));
        stream.push(TrackEvent::time_signature(4, 4));

        Generation {
            stream,
            warnings: Vec::new(),
            chords: Vec::with_capacity(capacity),
            tempo,
            sections: Vec::new(),
        }
    }

    fn render_chords<'a>(
        &self,
        generation: &mut Generation,
        key: &Key,
        chords: impl Iterator<Item = (usize, &'a ChordSymbol)>,
        mode: RenderMode,
        default_style: RhythmStyle,
        section: Option<usize>,
    ) {
        for (index, symbol) in chords {
            let mut warn = |error: ChordError| {
                tracing::warn!("Chord {} ({}): {}", index + 1, symbol.degree, error);
                generation.warnings.push(ChordWarning {
                    section,
                    index,
                    symbol: symbol.degree.clone(),
                    error,
                });
            };

            let rendered = match self.render_chord(key, symbol, mode, default_style) {
                Ok(rendered) => rendered,
                Err(error) => {
                    warn(error);
                    continue;
                }
            };
            for patch in rendered.patches {
                warn(patch);
            }

            let chord = rendered.chord;
            tracing::debug!("Chord {}: {} {:?}", index + 1, chord.name, chord.notes);
            generation.stream.extend(rendered.groups.into_iter().flatten());
            generation.chords.push((index, chord));
        }
    }
}

/// Tempo must fit the file's 24-bit tempo field
fn check_tempo(tempo: f64) -> Result<(), GenerateError> {
    match micros_per_quarter(tempo) {
        Some(_) => Ok(()),
        None => Err(GenerateError::InvalidTempo(tempo)),
    }
}
