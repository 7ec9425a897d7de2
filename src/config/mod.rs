// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Progression documents.
//!
//! This module provides the serde model for progression files (YAML or TOML,
//! chosen by extension) and the built-in preset library. A document holds
//! either a flat chord list or a list of song sections.

pub mod presets;

pub use presets::Preset;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::Arrangement;
use crate::music::ChordSymbol;
use crate::rhythm::{RhythmStyle, DEFAULT_ARPEGGIO_GAP};
use crate::sequencer::{Generation, RenderMode, Sequencer, SequencerConfig};

/// Root of a progression document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProgressionFile {
    /// Song metadata and output settings
    #[serde(default)]
    pub song: SongConfig,
    /// Preset used when `chords` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Explicit chord list
    #[serde(default)]
    pub chords: Vec<ChordSymbol>,
    /// Song sections, rendered in order instead of `chords`
    #[serde(default, skip_serializing_if = "Arrangement::is_empty")]
    pub sections: Arrangement,
}

impl ProgressionFile {
    /// Load a document, picking the format from the file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read progression file: {:?}", path))?;
        if is_toml(path) {
            Self::from_toml(&contents)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse a document from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML progression")
    }

    /// Parse a document from TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML progression")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize progression to YAML")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Failed to serialize progression to TOML")
    }

    /// Save the document, picking the format from the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = if is_toml(path) {
            self.to_toml()?
        } else {
            self.to_yaml()?
        };
        fs::write(path, text)
            .with_context(|| format!("Failed to write progression file: {:?}", path))
    }

    /// The chords to render: the explicit list, else the preset's chords
    pub fn progression(&self) -> Result<Vec<ChordSymbol>> {
        if !self.chords.is_empty() {
            return Ok(self.chords.clone());
        }
        match &self.preset {
            Some(name) => presets::find(name)
                .map(|preset| preset.progression(1.0))
                .ok_or_else(|| anyhow!("Unknown preset: {:?}", name)),
            None => Ok(Vec::new()),
        }
    }

    /// The sections to render, with section presets expanded
    pub fn arrangement(&self) -> Result<Arrangement> {
        let mut arrangement = self.sections.clone();
        for section in arrangement.sections_mut() {
            if !section.chords.is_empty() {
                continue;
            }
            if let Some(name) = &section.preset {
                let preset = presets::find(name).ok_or_else(|| {
                    anyhow!("Unknown preset {:?} in section {:?}", name, section.name)
                })?;
                section.chords = preset.progression(1.0);
            }
        }
        Ok(arrangement)
    }

    /// Sequencer settings from the `song` section
    pub fn sequencer_config(&self) -> SequencerConfig {
        SequencerConfig {
            ppqn: self.song.ppqn.max(1),
            program: self.song.program.min(127),
            velocity: self.song.velocity.clamp(1, 127),
            arpeggio_velocity: self.song.arpeggio_velocity.clamp(1, 127),
            arpeggio_gap: self.song.arpeggio_gap,
        }
    }

    /// Render the document. Sections, when present, replace `chords`.
    pub fn generate(&self) -> Result<Generation> {
        let sequencer = Sequencer::new(self.sequencer_config());
        let song = &self.song;
        let generation = if self.sections.is_empty() {
            let progression = self.progression()?;
            sequencer.generate(&progression, &song.key, song.tempo, song.mode, song.rhythm)
        } else {
            let arrangement = self.arrangement()?;
            sequencer.generate_arrangement(
                &arrangement,
                &song.key,
                song.tempo,
                song.mode,
                song.rhythm,
            )
        };
        generation.with_context(|| format!("Failed to render {:?}", song.name))
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

/// Song-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongConfig {
    /// Song name
    #[serde(default = "default_name")]
    pub name: String,
    /// Major key tonic (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Tempo in BPM
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Block chords or arpeggios
    #[serde(default)]
    pub mode: RenderMode,
    /// Rhythm for chords that don't name one
    #[serde(default)]
    pub rhythm: RhythmStyle,
    /// General MIDI program
    #[serde(default)]
    pub program: u8,
    /// Base velocity (1-127)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    /// Base velocity for arpeggio mode (1-127)
    #[serde(default = "default_arpeggio_velocity")]
    pub arpeggio_velocity: u8,
    /// Ticks per quarter note
    #[serde(default = "default_ppqn")]
    pub ppqn: u16,
    /// Ticks of silence between arpeggiated notes
    #[serde(default = "default_arpeggio_gap")]
    pub arpeggio_gap: u32,
}

fn default_name() -> String {
    "Untitled".to_string()
}
fn default_key() -> String {
    "C".to_string()
}
fn default_tempo() -> f64 {
    120.0
}
fn default_velocity() -> u8 {
    100
}
fn default_arpeggio_velocity() -> u8 {
    80
}
fn default_ppqn() -> u16 {
    480
}
fn default_arpeggio_gap() -> u32 {
    DEFAULT_ARPEGGIO_GAP
}

impl Default for SongConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            key: default_key(),
            tempo: default_tempo(),
            mode: RenderMode::default(),
            rhythm: RhythmStyle::default(),
            program: 0,
            velocity: default_velocity(),
            arpeggio_velocity: default_arpeggio_velocity(),
            ppqn: default_ppqn(),
            arpeggio_gap: default_arpeggio_gap(),
        }
    }
}
