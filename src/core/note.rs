use thiserror::Error;
use std::fmt;
use std::ops::Add;

/// Natural notes, anchored so that C in octave 0 is 12.
const NATURALS: [(char, isize); 7] = [
    ('a', 9), ('b', 11), ('c', 12), ('d', 14),
    ('e', 16), ('f', 17), ('g', 19)];

/// Roman numerals and their distance above the tonic.
/// Numerals that contain other numerals are listed first.
const NUMERALS: [(&str, isize); 7] = [
    ("vii", 11), ("iii", 4), ("vi", 9), ("iv", 5),
    ("ii", 2), ("i", 0), ("v", 7)];

/// Non-naturals are always spelled as the flatted note above.
const NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

#[derive(Error, Debug)]
pub enum NoteParseError {
    #[error("Invalid note name `{0}`")]
    InvalidName(String),
}

fn natural(c: char) -> Option<isize> {
    NATURALS.iter()
        .find(|(name, _)| *name == c)
        .map(|(_, pitch)| *pitch)
}

fn numeral(text: &str) -> Option<isize> {
    NUMERALS.iter()
        .find(|(numeral, _)| text.contains(numeral))
        .map(|(_, offset)| *offset)
}

fn accidental(c: char) -> isize {
    match c {
        '#' => 1,
        'b' => -1,
        _ => 0,
    }
}

/// Whether `text` is exactly a lower-case roman numeral, e.g. "ii" but not "II" or "iib".
pub fn is_minor_numeral(text: &str) -> bool {
    NUMERALS.iter().any(|(numeral, _)| *numeral == text)
}

/// Resolve a note letter or a roman numeral to a pitch number,
/// e.g. "Eb" or "#iv". Numerals are read relative to `tonic`.
///
/// Text starting with a note letter is always read as a letter,
/// so "bVII" is a B. Accidentals (`#`, `b`) after the letter
/// shift the pitch, digits are ignored.
pub fn pitch_of(text: &str, tonic: isize) -> Result<isize, NoteParseError> {
    let lower = text.to_lowercase();
    let mut chars = lower.chars();
    let letter = chars.next().and_then(natural);
    match (letter, numeral(&lower)) {
        (Some(pitch), _) => Ok(pitch + chars.map(accidental).sum::<isize>()),
        (None, Some(offset)) => Ok(tonic + offset + lower.chars().map(accidental).sum::<isize>()),
        (None, None) => Err(NoteParseError::InvalidName(text.to_string())),
    }
}

/// A chromatic pitch number: `semitones / 12` is the octave,
/// `semitones % 12` the pitch class with C = 0.
/// 60 is middle C, as in MIDI.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Note {
    pub semitones: isize,
}

impl Note {
    pub fn octave(&self) -> isize {
        self.semitones.div_euclid(12)
    }
}

impl From<isize> for Note {
    fn from(semitones: isize) -> Self {
        Note { semitones }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = NAMES[self.semitones.rem_euclid(12) as usize];
        write!(f, "{}{}", name, self.octave())
    }
}

/// Shift this note by a number of semitones.
impl Add<isize> for Note {
    type Output = Self;

    fn add(self, semitones: isize) -> Self {
        Self {
            semitones: self.semitones + semitones
        }
    }
}
