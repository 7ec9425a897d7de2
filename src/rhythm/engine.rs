// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Rhythm pattern engine.
//!
//! Splits a chord's duration into the sub-beats of a [`RhythmStyle`]. Every
//! sub-beat becomes one group: note-ons for all notes at delta 0, then
//! note-offs where only the first carries the sub-beat span. Spans are
//! rounded independently, so a chord may end up to N-1 ticks away from its
//! nominal length for an N-beat style.

use super::style::RhythmStyle;
use crate::midi::TrackEvent;
use crate::music::MidiNote;

/// Default silence between arpeggiated notes, in ticks at 480 PPQN
pub const DEFAULT_ARPEGGIO_GAP: u32 = 50;

/// Events for one sub-beat
pub type EventGroup = Vec<TrackEvent>;

/// Render `notes` as simultaneous hits following `style`.
pub fn apply(
    notes: &[MidiNote],
    total_ticks: u32,
    style: RhythmStyle,
    velocity: u8,
) -> Vec<EventGroup> {
    if notes.is_empty() {
        return Vec::new();
    }

    style
        .sub_beats()
        .iter()
        .map(|beat| hit(notes, beat.span(total_ticks), beat.velocity(velocity)))
        .collect()
}

fn hit(notes: &[MidiNote], span: u32, velocity: u8) -> EventGroup {
    let mut group = Vec::with_capacity(notes.len() * 2);
    group.extend(notes.iter().map(|&pitch| TrackEvent::note_on(0, pitch, velocity)));
    group.extend(notes.iter().enumerate().map(|(i, &pitch)| {
        let delta = if i == 0 { span } else { 0 };
        TrackEvent::note_off(delta, pitch, velocity)
    }));
    group
}

/// Render `notes` as a broken chord.
///
/// Each note gets `total_ticks / notes.len()` and is played alone through
/// `style`. Every note but the last releases `gap` ticks early and the next
/// note's first onset waits out that gap, so voices never overlap and the
/// chord still fills its duration.
pub fn arpeggiate(
    notes: &[MidiNote],
    total_ticks: u32,
    style: RhythmStyle,
    velocity: u8,
    gap: u32,
) -> Vec<EventGroup> {
    if notes.is_empty() {
        return Vec::new();
    }

    let per_note = (total_ticks as f64 / notes.len() as f64).round() as u32;
    let mut groups: Vec<EventGroup> = Vec::with_capacity(notes.len() * style.sub_beats().len());

    for &note in notes {
        let mut note_groups = apply(&[note], per_note, style, velocity);
        if let (Some(previous), Some(next)) = (groups.last_mut(), note_groups.first_mut()) {
            stagger(previous, next, gap);
        }
        groups.extend(note_groups);
    }

    groups
}

/// Move up to `gap` ticks from the end of `previous` to the start of `next`.
/// Never takes more than half the sounding span.
fn stagger(previous: &mut EventGroup, next: &mut EventGroup, gap: u32) {
    let Some(release) = previous
        .iter_mut()
        .rev()
        .find(|e| e.is_note_off() && e.delta > 0)
    else {
        return;
    };
    let shift = gap.min(release.delta / 2);
    release.delta -= shift;
    if let Some(onset) = next.first_mut() {
        onset.delta += shift;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::EventKind;

    const TRIAD: [MidiNote; 3] = [60, 64, 67];

    fn group_delta(group: &EventGroup) -> u32 {
        group.iter().map(|e| e.delta).sum()
    }

    #[test]
    fn test_straight_block() {
        let groups = apply(&TRIAD, 1920, RhythmStyle::Straight, 100);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.len(), 6);

        for (event, &pitch) in group[..3].iter().zip(TRIAD.iter()) {
            assert_eq!(*event, TrackEvent::note_on(0, pitch, 100));
        }
        assert_eq!(group[3], TrackEvent::note_off(1920, 60, 100));
        assert_eq!(group[4], TrackEvent::note_off(0, 64, 100));
        assert_eq!(group[5], TrackEvent::note_off(0, 67, 100));
    }

    #[test]
    fn test_one_timed_release_per_group() {
        for style in RhythmStyle::ALL {
            for group in apply(&TRIAD, 1920, style, 100) {
                let timed = group.iter().filter(|e| e.delta > 0).count();
                assert_eq!(timed, 1, "{}", style);
                assert!(group.iter().filter(|e| e.delta > 0).all(|e| e.is_note_off()));
            }
        }
    }

    #[test]
    fn test_every_note_on_released_in_group() {
        for style in RhythmStyle::ALL {
            for group in apply(&TRIAD, 1000, style, 100) {
                let ons: Vec<_> = group.iter().filter(|e| e.is_note_on()).map(|e| e.pitch()).collect();
                let offs: Vec<_> = group.iter().filter(|e| e.is_note_off()).map(|e| e.pitch()).collect();
                assert_eq!(ons, offs);
                let first_off = group.iter().position(|e| e.is_note_off()).unwrap();
                assert!(group[..first_off].iter().all(|e| e.is_note_on()));
            }
        }
    }

    #[test]
    fn test_drift_is_bounded() {
        for style in RhythmStyle::ALL {
            let beats = style.sub_beats().len() as i64;
            for total in [1, 7, 100, 479, 1000, 1920, 1441] {
                let sum: i64 = apply(&TRIAD, total, style, 100)
                    .iter()
                    .map(|g| group_delta(g) as i64)
                    .sum();
                assert!(
                    (sum - total as i64).abs() <= beats - 1,
                    "{} at {} ticks summed to {}",
                    style,
                    total,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_accent_velocities() {
        let groups = apply(&TRIAD, 1920, RhythmStyle::Shuffle, 100);
        assert_eq!(groups[0][0].kind, EventKind::NoteOn { pitch: 60, velocity: 100 });
        assert_eq!(groups[1][0].kind, EventKind::NoteOn { pitch: 60, velocity: 80 });
        assert_eq!(group_delta(&groups[0]), 1440);
        assert_eq!(group_delta(&groups[1]), 480);

        let kpop = apply(&TRIAD, 1920, RhythmStyle::KpopSync, 100);
        let loudest = kpop
            .iter()
            .position(|g| matches!(g[0].kind, EventKind::NoteOn { velocity: 100, .. }))
            .unwrap();
        assert_eq!(loudest, 1);
    }

    #[test]
    fn test_empty_notes() {
        assert!(apply(&[], 1920, RhythmStyle::Swing, 100).is_empty());
        assert!(arpeggiate(&[], 1920, RhythmStyle::Swing, 100, 50).is_empty());
    }

    #[test]
    fn test_arpeggio_one_voice_at_a_time() {
        let groups = arpeggiate(&TRIAD, 1920, RhythmStyle::Straight, 100, 50);
        assert_eq!(groups.len(), 3);

        let events: Vec<TrackEvent> = groups.iter().flatten().copied().collect();
        let mut sounding = 0i32;
        for event in &events {
            if event.is_note_on() {
                sounding += 1;
            } else if event.is_note_off() {
                sounding -= 1;
            }
            assert!(sounding <= 1);
        }

        assert_eq!(events[0], TrackEvent::note_on(0, 60, 100));
        assert_eq!(events[1], TrackEvent::note_off(590, 60, 100));
        assert_eq!(events[2], TrackEvent::note_on(50, 64, 100));
        assert_eq!(events[3], TrackEvent::note_off(590, 64, 100));
        assert_eq!(events[4], TrackEvent::note_on(50, 67, 100));
        assert_eq!(events[5], TrackEvent::note_off(640, 67, 100));

        let total: u32 = events.iter().map(|e| e.delta).sum();
        assert_eq!(total, 1920);
    }

    #[test]
    fn test_arpeggio_gap_clamped() {
        let groups = arpeggiate(&TRIAD, 60, RhythmStyle::Straight, 100, 50);
        let events: Vec<TrackEvent> = groups.iter().flatten().copied().collect();
        // 20 ticks per note: the gap shrinks to half of that
        assert_eq!(events[1].delta, 10);
        assert_eq!(events[2].delta, 10);
        assert_eq!(events.iter().map(|e| e.delta).sum::<u32>(), 60);
    }

    #[test]
    fn test_arpeggio_with_style() {
        let groups = arpeggiate(&TRIAD, 1920, RhythmStyle::Swing, 100, 50);
        // Two sub-beats per note
        assert_eq!(groups.len(), 6);
        let total: u32 = groups.iter().map(group_delta).sum();
        assert_eq!(total, 1920);
    }
}
