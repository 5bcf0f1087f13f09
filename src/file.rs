use midly::{
    Smf, Header, Format, Timing,
    TrackEvent, TrackEventKind,
    MidiMessage, MetaMessage};
use midly::num::{u4, u7, u15, u24, u28};
use thiserror::Error;
use anyhow::Result;
use std::path::Path;
use crate::core::Chord;

/// Ticks per beat (quarter note)
const TICKS_PER_BEAT: u16 = 960;

/// Largest value of a tempo meta message
const MAX_TEMPO: u32 = 0xFF_FFFF;

#[derive(Error, Debug)]
pub enum MidiFileError {
    #[error("Pitch {0} is outside the MIDI note range")]
    PitchOutOfRange(isize),

    #[error("Invalid velocity {0}, must be at most 127")]
    InvalidVelocity(u8),

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),
}

/// How chords are laid out in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    // Beats per minute
    pub tempo: usize,

    // Beats per chord
    pub duration: usize,

    // Times each chord is struck within its duration
    pub subdivide: usize,

    pub velocity: u8,
}

impl Layout {
    fn validate(&self) -> Result<(), MidiFileError> {
        if self.tempo == 0 {
            return Err(MidiFileError::InvalidTiming("tempo must be positive".to_string()));
        }
        if self.subdivide == 0 {
            return Err(MidiFileError::InvalidTiming("subdivide must be positive".to_string()));
        }
        if self.ticks_per_strike() == 0 {
            return Err(MidiFileError::InvalidTiming(format!(
                "can't subdivide {} beats into {} strikes", self.duration, self.subdivide)));
        }
        if self.velocity > 127 {
            return Err(MidiFileError::InvalidVelocity(self.velocity));
        }
        Ok(())
    }

    fn ticks_per_chord(&self) -> u32 {
        (self.duration as u32) * TICKS_PER_BEAT as u32
    }

    fn ticks_per_strike(&self) -> u32 {
        self.ticks_per_chord() / self.subdivide as u32
    }
}

/// Convert bpm to microseconds per beat (quarter note)
/// Reference point: 60bpm is 1,000,000us/beat
fn bpm_to_us_per_beat(bpm: usize) -> u24 {
    let us = 60_000_000 / bpm.max(1) as u32;
    u24::from(us.min(MAX_TEMPO))
}

fn midi_key(note: isize) -> Result<u7, MidiFileError> {
    if (0..=127).contains(&note) {
        Ok(u7::from(note as u8))
    } else {
        Err(MidiFileError::PitchOutOfRange(note))
    }
}

/// Build the track events for a progression.
/// Each chord gets `duration` beats, rests are silent.
pub fn build_track(progression: &[Chord], layout: &Layout) -> Result<Vec<TrackEvent<'static>>, MidiFileError> {
    layout.validate()?;
    let channel = u4::new(0);
    let velocity = u7::from(layout.velocity);

    // (absolute tick, note on?, key)
    let mut events: Vec<(u32, bool, u7)> = vec![];
    for (i, chord) in progression.iter().enumerate() {
        // The same key can't sound twice at once on one channel
        let mut keys: Vec<u7> = vec![];
        for note in chord.notes() {
            let key = midi_key(note.semitones)?;
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let start = i as u32 * layout.ticks_per_chord();
        for strike in 0..layout.subdivide as u32 {
            let on = start + strike * layout.ticks_per_strike();
            let off = on + layout.ticks_per_strike();
            for key in &keys {
                events.push((on, true, *key));
                events.push((off, false, *key));
            }
        }
    }

    // Stable, so notes keep chord order;
    // note offs come before note ons at the same tick
    events.sort_by_key(|(tick, on, _)| (*tick, *on));

    let mut track: Vec<TrackEvent> = vec![];

    // Delta times are in ticks
    let start = u28::from(0);

    // Default MIDI time is 4/4 so we exclude that MetaMessage
    track.push(TrackEvent {
        delta: start,
        kind: TrackEventKind::Meta(MetaMessage::Tempo(bpm_to_us_per_beat(layout.tempo)))
    });
    track.push(TrackEvent {
        delta: start,
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Chords"))
    });

    let mut last = 0;
    for (tick, on, key) in events {
        let message = if on {
            MidiMessage::NoteOn { key, vel: velocity }
        } else {
            MidiMessage::NoteOff { key, vel: velocity }
        };
        track.push(TrackEvent {
            delta: u28::from(tick - last),
            kind: TrackEventKind::Midi { channel, message }
        });
        last = tick;
    }

    track.push(TrackEvent {
        delta: start,
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack)
    });
    Ok(track)
}

pub fn save_to_midi_file(progression: &[Chord], layout: &Layout, path: &Path) -> Result<()> {
    let track = build_track(progression, layout)?;
    let smf = Smf {
        header: Header {
            format: Format::SingleTrack,
            timing: Timing::Metrical(u15::from(TICKS_PER_BEAT))
        },
        tracks: vec![track],
    };
    smf.save(path)?;
    Ok(())
}

/// Name a file after its chords, e.g. "C-GslashB-Am.mid"
pub fn default_file_name<S: AsRef<str>>(tokens: &[S]) -> String {
    let names: Vec<String> = tokens.iter()
        .map(|t| t.as_ref().replace('/', "slash"))
        .collect();
    format!("{}.mid", names.join("-"))
}
