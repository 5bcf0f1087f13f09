use log::trace;
use super::chord::Chord;
use super::note::Note;

/// Bass leaps up to this many semitones are left alone.
const MAX_BASS_LEAP: isize = 7;

/// How far a voiced note may stray from the register center
/// when it closely matches a note of the previous chord.
const CENTER_RANGE: isize = 8;

/// Allowances up to this are close matches.
const CLOSE_ALLOWANCE: isize = 2;

/// Pitch-class distance between two notes, ignoring octaves (0 to 6).
fn allowance(a: Note, b: Note) -> isize {
    let dist = (a.semitones - b.semitones).abs() % 12;
    dist.min(12 - dist)
}

/// The first note in `neighbors` closest to `note` by pitch class,
/// with its allowance.
fn closest_neighbor(note: Note, neighbors: &[Note]) -> Option<(Note, isize)> {
    neighbors.iter()
        .map(|n| (*n, allowance(note, *n)))
        .min_by_key(|(_, allowance)| *allowance)
}

/// Move `note` by whole octaves to the octave nearest `target`.
fn nearest_octave(note: Note, target: Note) -> Note {
    let diff = target.semitones - note.semitones;
    let octaves = if diff >= 0 {
        (diff + 6).div_euclid(12)
    } else {
        // Round towards zero, i.e. up
        -(6 - diff).div_euclid(12)
    };
    note + octaves * 12
}

fn voice_bass(bass: Note, prev: Note) -> Note {
    let dist = (bass.semitones - prev.semitones).abs();
    if dist <= MAX_BASS_LEAP {
        return bass;
    }
    let shifted = if bass < prev { bass + 12 } else { Note::from(bass.semitones - 12) };
    if (shifted.semitones - prev.semitones).abs() < dist {
        shifted
    } else {
        bass
    }
}

fn voice_note(note: Note, neighbors: &[Note], center: isize) -> Note {
    match closest_neighbor(note, neighbors) {
        Some((neighbor, allowance)) => {
            let shifted = nearest_octave(note, neighbor);
            let strays = (shifted.semitones - center).abs() > CENTER_RANGE;
            let voiced = if strays && allowance <= CLOSE_ALLOWANCE {
                note
            } else {
                shifted
            };
            trace!("{} -> {} (neighbor {}, allowance {})", note, voiced, neighbor, allowance);
            voiced
        }
        None => note,
    }
}

/// Voice `chord` against the previously voiced chord.
fn voice_chord(chord: &Chord, prev: &Chord, center: isize) -> Chord {
    let (bass, upper) = match chord.notes().split_first() {
        Some(split) => split,
        None => return chord.clone(),
    };
    let (prev_bass, neighbors) = match prev.notes().split_first() {
        Some(split) => split,
        None => return chord.clone(),
    };

    let mut upper: Vec<Note> = upper.iter()
        .map(|note| voice_note(*note, neighbors, center))
        .collect();
    upper.sort();

    let mut notes = vec![voice_bass(*bass, *prev_bass)];
    notes.extend(upper);
    Chord::new(notes)
}

/// Register anchor for a progression: a little above
/// the root of its first chord.
fn register_center(chord: &Chord) -> Option<isize> {
    let notes = chord.notes();
    notes.get(1).or_else(|| notes.first())
        .map(|root| root.semitones + 3)
}

/// Re-octave each chord's notes to move as little as possible
/// from the chord before.
///
/// The first chord is kept as is. Rests are kept as is and
/// skipped over, so the chord after a rest is voiced against
/// the last chord that sounded.
pub fn voice_lead(chords: &[Chord]) -> Vec<Chord> {
    let mut voiced: Vec<Chord> = Vec::with_capacity(chords.len());
    let mut center: Option<isize> = None;
    let mut prev: Option<usize> = None;

    for chord in chords {
        let next = match (prev, center) {
            (Some(idx), Some(center)) => voice_chord(chord, &voiced[idx], center),
            _ => chord.clone(),
        };
        if !next.is_rest() {
            if center.is_none() {
                center = register_center(&next);
            }
            prev = Some(voiced.len());
        }
        voiced.push(next);
    }
    voiced
}
