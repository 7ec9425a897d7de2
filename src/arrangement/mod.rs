// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song arrangement.
//!
//! This module provides:
//! - Sections: named intro/verse/chorus/bridge/outro blocks with their own
//!   chords, tempo and length
//! - The ordered [`Arrangement`] the sequencer renders into one track

pub mod section;

pub use section::{Section, SectionType};

use serde::{Deserialize, Serialize};

/// Sections in playback order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arrangement {
    sections: Vec<Section>,
}

impl Arrangement {
    /// Create an empty arrangement
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a section at the end
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Insert section at index
    pub fn insert_section(&mut self, index: usize, section: Section) {
        if index <= self.sections.len() {
            self.sections.insert(index, section);
        } else {
            self.sections.push(section);
        }
    }

    /// Remove section at index
    pub fn remove_section(&mut self, index: usize) -> Option<Section> {
        if index < self.sections.len() {
            Some(self.sections.remove(index))
        } else {
            None
        }
    }

    /// Get section at index
    pub fn get_section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Get mutable section at index
    pub fn get_section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Find the first section called `name`
    pub fn find(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Copy the section called `source` under `new_name`, placing the copy
    /// right after the original. Returns the copy's index.
    pub fn duplicate_section(&mut self, source: &str, new_name: impl Into<String>) -> Option<usize> {
        let index = self.sections.iter().position(|s| s.name == source)?;
        let mut copy = self.sections[index].clone();
        copy.name = new_name.into();
        self.sections.insert(index + 1, copy);
        Some(index + 1)
    }

    /// Get all sections
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Mutable access to all sections
    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Number of sections
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total length in measures
    pub fn total_measures(&self) -> f64 {
        self.sections.iter().map(|s| s.measures()).sum()
    }

    /// Builder: add section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::ChordSymbol;

    fn song() -> Arrangement {
        let chords = vec![ChordSymbol::new("I", "maj"), ChordSymbol::new("V", "maj")];
        Arrangement::new()
            .with_section(Section::new("Intro", SectionType::Intro).with_chords(chords.clone()))
            .with_section(
                Section::new("Verse", SectionType::Verse)
                    .with_chords(chords.clone())
                    .with_length(8),
            )
            .with_section(Section::new("Chorus", SectionType::Chorus).with_chords(chords))
    }

    #[test]
    fn test_arrangement_creation() {
        let arrangement = Arrangement::new();
        assert!(arrangement.is_empty());

        let song = song();
        assert_eq!(song.section_count(), 3);
        assert_eq!(song.total_measures(), 12.0);
        assert_eq!(song.get_section(1).unwrap().name, "Verse");
    }

    #[test]
    fn test_duplicate_section() {
        let mut song = song();
        assert_eq!(song.duplicate_section("Verse", "Verse 2"), Some(2));
        assert_eq!(song.section_count(), 4);

        let copy = song.find("Verse 2").unwrap();
        assert_eq!(copy.kind, SectionType::Verse);
        assert_eq!(copy.length, Some(8));
        assert_eq!(copy.chords, song.find("Verse").unwrap().chords);
        assert_eq!(song.get_section(3).unwrap().name, "Chorus");

        // Editing the copy leaves the source alone
        song.get_section_mut(2).unwrap().chords.clear();
        assert_eq!(song.find("Verse").unwrap().chords.len(), 2);

        assert_eq!(song.duplicate_section("Missing", "Nope"), None);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut song = song();
        song.insert_section(0, Section::new("Pickup", SectionType::Intro));
        assert_eq!(song.get_section(0).unwrap().name, "Pickup");
        song.insert_section(99, Section::new("Tag", SectionType::Outro));
        assert_eq!(song.sections().last().unwrap().name, "Tag");

        let removed = song.remove_section(0).unwrap();
        assert_eq!(removed.name, "Pickup");
        assert!(song.remove_section(99).is_none());
    }

    #[test]
    fn test_arrangement_yaml_is_a_list() {
        let yaml = r#"
- name: A
  type: verse
- name: B
  type: chorus
  bpm: 140
"#;
        let song: Arrangement = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(song.section_count(), 2);
        assert_eq!(song.get_section(1).unwrap().tempo, Some(140.0));
    }
}
