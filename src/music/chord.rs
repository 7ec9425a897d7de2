// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Roman-numeral chord resolution.
//!
//! Turns a [`ChordSymbol`] such as `vi` / `min` / first inversion into
//! concrete MIDI pitches under a [`Key`]. The tonic octave is anchored at
//! middle C, so C major's I chord is `[60, 64, 67]`.
//!
//! Problems confined to one chord never abort: an unreadable degree token is
//! reported as [`ChordError::InvalidChordSymbol`] for the caller to skip, and
//! an unknown quality quietly becomes a major triad with `fallback_from` set.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::scale::{note_name, Key, MidiNote};
use crate::error::ChordError;
use crate::rhythm::RhythmStyle;

/// MIDI note of the tonic octave's C
pub const BASE_NOTE: MidiNote = 60;

/// Scale degrees I through VII
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Degree {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl Degree {
    /// All degrees in scale order
    pub const ALL: [Degree; 7] = [
        Degree::I,
        Degree::II,
        Degree::III,
        Degree::IV,
        Degree::V,
        Degree::VI,
        Degree::VII,
    ];

    /// Zero-based index into a key's scale table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical upper-case token
    pub fn token(self) -> &'static str {
        match self {
            Degree::I => "I",
            Degree::II => "II",
            Degree::III => "III",
            Degree::IV => "IV",
            Degree::V => "V",
            Degree::VI => "VI",
            Degree::VII => "VII",
        }
    }

    /// Match a token against the seven canonical numerals, ignoring case
    pub fn parse(token: &str) -> Option<Self> {
        Degree::ALL
            .into_iter()
            .find(|d| d.token().eq_ignore_ascii_case(token.trim()))
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.token())
    }
}

/// Chord qualities (interval stacks above the root)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChordQuality {
    Major,
    Minor,
    Dominant7,
    Major7,
    Sus4,
    Minor7,
    Minor7Flat5,
    Dominant7Flat9,
    Diminished,
    Augmented,
    Sus2,
}

/// Accepted spellings. Entries longer than two characters also match
/// case-insensitively; short ones are case-sensitive so `M7` != `m7`.
const QUALITY_NAMES: &[(&str, ChordQuality)] = &[
    ("maj", ChordQuality::Major),
    ("major", ChordQuality::Major),
    ("M", ChordQuality::Major),
    ("min", ChordQuality::Minor),
    ("minor", ChordQuality::Minor),
    ("m", ChordQuality::Minor),
    ("7", ChordQuality::Dominant7),
    ("dom7", ChordQuality::Dominant7),
    ("dominant7", ChordQuality::Dominant7),
    ("maj7", ChordQuality::Major7),
    ("major7", ChordQuality::Major7),
    ("M7", ChordQuality::Major7),
    ("sus4", ChordQuality::Sus4),
    ("sus", ChordQuality::Sus4),
    ("m7", ChordQuality::Minor7),
    ("min7", ChordQuality::Minor7),
    ("minor7", ChordQuality::Minor7),
    ("m7b5", ChordQuality::Minor7Flat5),
    ("min7b5", ChordQuality::Minor7Flat5),
    ("half-dim", ChordQuality::Minor7Flat5),
    ("7b9", ChordQuality::Dominant7Flat9),
    ("b9", ChordQuality::Dominant7Flat9),
    ("dom7b9", ChordQuality::Dominant7Flat9),
    ("dim", ChordQuality::Diminished),
    ("diminished", ChordQuality::Diminished),
    ("aug", ChordQuality::Augmented),
    ("augmented", ChordQuality::Augmented),
    ("+", ChordQuality::Augmented),
    ("sus2", ChordQuality::Sus2),
];

impl ChordQuality {
    /// All qualities, in picker order
    pub const ALL: [ChordQuality; 11] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Sus4,
        ChordQuality::Minor7,
        ChordQuality::Minor7Flat5,
        ChordQuality::Dominant7Flat9,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Sus2,
    ];

    /// Semitone offsets from the root; always starts at 0, at least 3 entries
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Minor7Flat5 => &[0, 3, 6, 10],
            ChordQuality::Dominant7Flat9 => &[0, 4, 7, 10, 13],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
        }
    }

    /// Canonical name used in progression documents
    pub fn name(self) -> &'static str {
        match self {
            ChordQuality::Major => "maj",
            ChordQuality::Minor => "min",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Minor7Flat5 => "m7b5",
            ChordQuality::Dominant7Flat9 => "7b9",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
        }
    }

    /// Suffix appended to the root name in chord display names
    pub fn display_suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            other => other.name(),
        }
    }

    /// Look up a quality by any accepted spelling
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        QUALITY_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .or_else(|| {
                QUALITY_NAMES
                    .iter()
                    .find(|(n, _)| n.len() > 2 && n.eq_ignore_ascii_case(name))
            })
            .map(|&(_, quality)| quality)
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a progression, as written by the editor or a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordSymbol {
    /// Degree token: "I".."VII" in any case, optionally with a
    /// parenthetical quality override such as "V(7b9)"
    #[serde(alias = "roman")]
    pub degree: String,
    /// Quality name
    #[serde(default = "default_quality", alias = "type")]
    pub quality: String,
    /// Inversion count (wraps modulo the chord size)
    #[serde(default)]
    pub inversion: u32,
    /// Length as a fraction of a 4/4 measure
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Rhythm style name; `None` uses the progression default. Kept as
    /// text so an unknown name only affects this chord.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhythm: Option<String>,
}

fn default_quality() -> String {
    "maj".to_string()
}
fn default_duration() -> f64 {
    1.0
}

impl ChordSymbol {
    /// A one-measure root-position chord
    pub fn new(degree: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            degree: degree.into(),
            quality: quality.into(),
            inversion: 0,
            duration: default_duration(),
            rhythm: None,
        }
    }

    /// Set the inversion
    pub fn with_inversion(mut self, inversion: u32) -> Self {
        self.inversion = inversion;
        self
    }

    /// Set the duration (fraction of a measure)
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Set the rhythm style
    pub fn with_rhythm(mut self, rhythm: RhythmStyle) -> Self {
        self.rhythm = Some(rhythm.name().to_string());
        self
    }

    /// The named rhythm style, `Ok(None)` when unset, or the unknown name
    pub fn rhythm_style(&self) -> Result<Option<RhythmStyle>, ChordError> {
        match self.rhythm.as_deref() {
            None => Ok(None),
            Some(name) => RhythmStyle::parse(name)
                .map(Some)
                .ok_or_else(|| ChordError::UnknownRhythm(name.to_string())),
        }
    }
}

/// A chord symbol resolved against a key
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChord {
    /// MIDI pitches, lowest voice first
    pub notes: Vec<MidiNote>,
    /// Display name, e.g. "Am" or "G7"
    pub name: String,
    /// Degree the chord was built on
    pub degree: Degree,
    /// Quality actually applied
    pub quality: ChordQuality,
    /// Unknown quality name that was replaced by a major triad
    pub fallback_from: Option<String>,
}

/// Split "V(7b9)" into ("V", Some("7b9")).
fn split_override(token: &str) -> (&str, Option<&str>) {
    let token = token.trim();
    match token.find('(') {
        Some(open) => {
            let rest = &token[open + 1..];
            let suffix = rest.find(')').map_or(rest, |close| &rest[..close]).trim();
            (token[..open].trim(), Some(suffix).filter(|s| !s.is_empty()))
        }
        None => (token, None),
    }
}

/// Match a degree token, falling back to its leading run of numeral letters.
fn parse_degree(head: &str) -> Option<Degree> {
    Degree::parse(head).or_else(|| {
        let run = head
            .find(|c: char| !matches!(c.to_ascii_uppercase(), 'I' | 'V'))
            .unwrap_or(head.len());
        let recovered = Degree::parse(&head[..run])?;
        tracing::debug!("Recovered degree {} from {:?}", recovered, head);
        Some(recovered)
    })
}

/// Rotate `notes` left by `inversion`, lifting each rotated note an octave.
pub fn invert(notes: &[MidiNote], inversion: u32) -> Vec<MidiNote> {
    if notes.is_empty() {
        return Vec::new();
    }
    let k = inversion as usize % notes.len();
    notes[k..]
        .iter()
        .copied()
        .chain(notes[..k].iter().map(|&n| n + 12))
        .collect()
}

/// Resolve a chord symbol under `key`.
pub fn resolve(key: &Key, symbol: &ChordSymbol) -> Result<ResolvedChord, ChordError> {
    let (head, suffix) = split_override(&symbol.degree);
    let degree = parse_degree(head)
        .ok_or_else(|| ChordError::InvalidChordSymbol(symbol.degree.clone()))?;

    let quality_name = suffix.unwrap_or(symbol.quality.trim());
    let (quality, fallback_from) = if quality_name.is_empty() {
        (ChordQuality::Major, None)
    } else {
        match ChordQuality::from_name(quality_name) {
            Some(quality) => (quality, None),
            None => {
                tracing::debug!(
                    "Unknown chord quality {:?} on {}, using major triad",
                    quality_name,
                    symbol.degree
                );
                (ChordQuality::Major, Some(quality_name.to_string()))
            }
        }
    };

    let root = BASE_NOTE + key.degree_offset(degree.index());
    let notes: Vec<MidiNote> = quality.intervals().iter().map(|&i| root + i).collect();

    Ok(ResolvedChord {
        notes: invert(&notes, symbol.inversion),
        name: format!("{}{}", note_name(root), quality.display_suffix()),
        degree,
        quality,
        fallback_from,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c_major() -> Key {
        Key::parse("C").unwrap()
    }

    #[test]
    fn test_degree_parse() {
        assert_eq!(Degree::parse("IV"), Some(Degree::IV));
        assert_eq!(Degree::parse("vi"), Some(Degree::VI));
        assert_eq!(Degree::parse("Vii"), Some(Degree::VII));
        assert_eq!(Degree::parse("VIII"), None);
        assert_eq!(Degree::parse(""), None);
    }

    #[test]
    fn test_quality_lookup() {
        assert_eq!(ChordQuality::from_name("maj"), Some(ChordQuality::Major));
        assert_eq!(ChordQuality::from_name("m7"), Some(ChordQuality::Minor7));
        assert_eq!(ChordQuality::from_name("M7"), Some(ChordQuality::Major7));
        assert_eq!(ChordQuality::from_name("MINOR"), Some(ChordQuality::Minor));
        assert_eq!(ChordQuality::from_name("b9"), Some(ChordQuality::Dominant7Flat9));
        assert_eq!(ChordQuality::from_name("mystery"), None);
    }

    #[test]
    fn test_quality_tables() {
        for quality in ChordQuality::ALL {
            let intervals = quality.intervals();
            assert!(intervals.len() >= 3, "{} too small", quality);
            assert_eq!(intervals[0], 0);
            assert_eq!(ChordQuality::from_name(quality.name()), Some(quality));
        }
    }

    #[test]
    fn test_resolve_tonic() {
        let chord = resolve(&c_major(), &ChordSymbol::new("I", "maj")).unwrap();
        assert_eq!(chord.notes, vec![60, 64, 67]);
        assert_eq!(chord.name, "C");
        assert_eq!(chord.fallback_from, None);
    }

    #[test]
    fn test_resolve_minor_and_sevenths() {
        let key = c_major();
        let am = resolve(&key, &ChordSymbol::new("vi", "min")).unwrap();
        assert_eq!(am.notes, vec![69, 72, 76]);
        assert_eq!(am.name, "Am");

        let g7 = resolve(&key, &ChordSymbol::new("V", "7")).unwrap();
        assert_eq!(g7.notes, vec![67, 71, 74, 77]);
        assert_eq!(g7.name, "G7");

        let bm7b5 = resolve(&key, &ChordSymbol::new("VII", "m7b5")).unwrap();
        assert_eq!(bm7b5.notes, vec![71, 74, 77, 81]);
        assert_eq!(bm7b5.name, "Bm7b5");
    }

    #[test]
    fn test_resolve_other_keys() {
        let f = Key::parse("F").unwrap();
        let bb = resolve(&f, &ChordSymbol::new("IV", "maj")).unwrap();
        assert_eq!(bb.notes, vec![70, 74, 77]);
        assert_eq!(bb.name, "A#");

        let g = Key::parse("G").unwrap();
        let d = resolve(&g, &ChordSymbol::new("V", "maj")).unwrap();
        assert_eq!(d.notes, vec![74, 78, 81]);
        assert_eq!(d.name, "D");
    }

    #[test]
    fn test_major_triad_shape_everywhere() {
        for key in Key::supported() {
            for degree in Degree::ALL {
                let chord = resolve(&key, &ChordSymbol::new(degree.token(), "maj")).unwrap();
                let root = chord.notes[0];
                assert_eq!(root, BASE_NOTE + key.scale_table()[degree.index()]);
                let offsets: Vec<u8> = chord.notes.iter().map(|n| n - root).collect();
                assert_eq!(offsets, vec![0, 4, 7], "{} {}", key, degree);
            }
        }
    }

    #[test]
    fn test_inversions() {
        let key = c_major();
        let first = resolve(&key, &ChordSymbol::new("I", "maj").with_inversion(1)).unwrap();
        assert_eq!(first.notes, vec![64, 67, 72]);

        let second = resolve(&key, &ChordSymbol::new("I", "maj").with_inversion(2)).unwrap();
        assert_eq!(second.notes, vec![67, 72, 76]);

        // Inversions wrap modulo chord size
        let wrapped = resolve(&key, &ChordSymbol::new("I", "maj").with_inversion(4)).unwrap();
        assert_eq!(wrapped.notes, first.notes);

        let seventh = resolve(&key, &ChordSymbol::new("V", "7").with_inversion(5)).unwrap();
        let seventh_1 = resolve(&key, &ChordSymbol::new("V", "7").with_inversion(1)).unwrap();
        assert_eq!(seventh.notes, seventh_1.notes);
    }

    #[test]
    fn test_invert_helper() {
        assert_eq!(invert(&[60, 64, 67], 0), vec![60, 64, 67]);
        assert_eq!(invert(&[60, 64, 67], 3), vec![60, 64, 67]);
        assert!(invert(&[], 2).is_empty());
    }

    #[test]
    fn test_suffix_override() {
        let key = c_major();
        let chord = resolve(&key, &ChordSymbol::new("ii(min7)", "maj")).unwrap();
        assert_eq!(chord.quality, ChordQuality::Minor7);
        assert_eq!(chord.notes, vec![62, 65, 69, 72]);
        assert_eq!(chord.name, "Dm7");

        let b9 = resolve(&key, &ChordSymbol::new("V(b9)", "maj")).unwrap();
        assert_eq!(b9.quality, ChordQuality::Dominant7Flat9);
        assert_eq!(b9.notes.len(), 5);
    }

    #[test]
    fn test_degree_recovery() {
        let key = c_major();
        let chord = resolve(&key, &ChordSymbol::new("V7", "7")).unwrap();
        assert_eq!(chord.degree, Degree::V);

        let chord = resolve(&key, &ChordSymbol::new("ivadd9", "maj")).unwrap();
        assert_eq!(chord.degree, Degree::IV);
    }

    #[test]
    fn test_invalid_symbol() {
        let key = c_major();
        let err = resolve(&key, &ChordSymbol::new("X", "maj")).unwrap_err();
        assert_eq!(err, ChordError::InvalidChordSymbol("X".to_string()));

        assert!(resolve(&key, &ChordSymbol::new("IIII", "maj")).is_err());
        assert!(resolve(&key, &ChordSymbol::new("(min)", "maj")).is_err());
    }

    #[test]
    fn test_unknown_quality_falls_back() {
        let key = c_major();
        let chord = resolve(&key, &ChordSymbol::new("IV", "lydian-dream")).unwrap();
        assert_eq!(chord.quality, ChordQuality::Major);
        assert_eq!(chord.notes, vec![65, 69, 72]);
        assert_eq!(chord.name, "F");
        assert_eq!(chord.fallback_from.as_deref(), Some("lydian-dream"));
    }

    #[test]
    fn test_symbol_from_yaml() {
        let yaml = r#"
roman: vi
type: m7
inversion: 1
duration: 0.5
rhythm: swing
"#;
        let symbol: ChordSymbol = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(symbol.degree, "vi");
        assert_eq!(symbol.quality, "m7");
        assert_eq!(symbol.inversion, 1);
        assert_eq!(symbol.duration, 0.5);
        assert_eq!(symbol.rhythm_style(), Ok(Some(RhythmStyle::Swing)));

        let minimal: ChordSymbol = serde_yaml::from_str("degree: I").unwrap();
        assert_eq!(minimal.quality, "maj");
        assert_eq!(minimal.duration, 1.0);
        assert_eq!(minimal.rhythm_style(), Ok(None));
    }

    #[test]
    fn test_unknown_rhythm_is_per_chord() {
        let chords: Vec<ChordSymbol> =
            serde_yaml::from_str("[{degree: I}, {degree: IV, rhythm: polka}, {degree: V}]")
                .unwrap();
        assert_eq!(chords.len(), 3);
        assert_eq!(
            chords[1].rhythm_style(),
            Err(ChordError::UnknownRhythm("polka".to_string()))
        );
        assert_eq!(
            ChordSymbol::new("I", "maj").with_rhythm(RhythmStyle::Rock4Beat).rhythm_style(),
            Ok(Some(RhythmStyle::Rock4Beat))
        );
    }
}
