use regex::Regex;
use thiserror::Error;
use std::{fmt, str::FromStr};
use log::debug;
use lazy_static::lazy_static;
use super::note::{Note, NoteParseError, is_minor_numeral};
use super::degree::{Degree, MAX_DEGREE};
use super::mode::Mode;
use super::key::Key;

lazy_static! {
    static ref ROOT_RE: Regex = Regex::new(
        r"(?i)^([a-g][b#]*|[b#]*(vii|iii|vi|iv|ii|i|v)[b#]*)$")
        .unwrap();
}

/// Characters that can end a root, e.g. the "b" of "Bb" or the "v" of "IV".
fn ends_root(c: char) -> bool {
    matches!(c, 'a'..='g' | 'i' | 'v' | '#')
}

/// Characters that can continue a root.
fn continues_root(c: char) -> bool {
    matches!(c, 'i' | 'v' | 'b' | '#')
}

#[derive(Error, Debug)]
pub enum ChordParseError {
    #[error("No root note or numeral in chord `{symbol}` (at position {position})")]
    MissingRoot {
        symbol: String,
        position: usize,
    },

    #[error("Missing bass note after `/` in chord `{0}`")]
    MissingBass(String),

    #[error("Invalid degree `{section}` in chord `{symbol}`")]
    InvalidDegree {
        symbol: String,
        section: String,
    },
}

/// A parsed chord symbol, not yet placed in a key or octave.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ChordSpec {
    pub root: String,
    pub bass: String,
    pub mode: Mode,

    // Added or altered degrees, in the order
    // they first appeared in the symbol.
    degrees: Vec<Degree>,
}

impl ChordSpec {
    pub fn new(root: &str, mode: Mode) -> ChordSpec {
        ChordSpec {
            root: root.to_string(),
            bass: root.to_string(),
            mode,
            degrees: vec![],
        }
    }

    /// Add a note by scale degree and step adjustment.
    /// Adding a degree that is already present
    /// replaces its adjustment but keeps its position.
    pub fn add(mut self, degree: usize, adj: isize) -> ChordSpec {
        self.record(degree, adj);
        self
    }

    /// Set the bass note
    pub fn bass(mut self, bass: &str) -> ChordSpec {
        self.bass = bass.to_string();
        self
    }

    pub fn degrees(&self) -> &[Degree] {
        &self.degrees
    }

    pub fn degree(&self, degree: usize) -> Option<&Degree> {
        self.degrees.iter().find(|d| d.degree == degree)
    }

    fn record(&mut self, degree: usize, adj: isize) {
        match self.degrees.iter_mut().find(|d| d.degree == degree) {
            Some(existing) => existing.adj = adj,
            None => self.degrees.push(Degree { degree, adj }),
        }
    }

    /// Resolve the chord into pitches for the given key and octave.
    ///
    /// The bass comes first, an octave below the root,
    /// followed by the root, third, fifth and then
    /// any other degrees in the order they were added.
    pub fn chord_for_key(&self, key: &Key, octave: isize) -> Result<Chord, NoteParseError> {
        let root = key.pitch(&self.root)?;
        let bass = key.pitch(&self.bass)? - 12;

        // (degree, pitch), bass is slot 0
        let mut slots: Vec<(usize, isize)> = vec![
            (0, bass),
            (1, root),
            (3, root + Degree::semitones(3) + self.mode.shift(3)),
            (5, root + Degree::semitones(5) + self.mode.shift(5)),
        ];
        for deg in &self.degrees {
            let pitch = root.saturating_add(deg.to_interval());
            match slots.iter_mut().find(|(d, _)| *d == deg.degree) {
                Some(slot) => slot.1 = pitch,
                None => slots.push((deg.degree, pitch)),
            }
        }

        Ok(Chord::new(slots.into_iter()
            .map(|(_, pitch)| Note::from(pitch.saturating_add(octave.saturating_mul(12))))
            .collect()))
    }
}

/// Net accidental adjustment of a section, e.g. -1 for "b9".
fn adjustment(section: &str) -> isize {
    section.matches('#').count() as isize - section.matches('b').count() as isize
}

fn is_bare_number(section: &str) -> bool {
    !section.is_empty() && section.chars().all(|c| c.is_ascii_digit())
}

/// Try to parse a chord from a symbol, e.g. "Cmaj7", "F#m7b5", "G/B" or "V7".
///
/// The symbol is read left to right and split into sections:
/// the root, then quality keywords and degrees (each ending after a number),
/// and slash bass notes. Unrecognized text is skipped.
impl FromStr for ChordSpec {
    type Err = ChordParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let mut sections: Vec<String> = vec![];
        let mut section = String::new();
        let mut start = 0;

        let mut root: Option<String> = None;
        let mut bass: Option<String> = None;
        let mut mode: Option<Mode> = None;
        let mut minor_numeral = false;
        let mut unrooted: Option<usize> = None;
        let mut spec = ChordSpec::new("", Mode::Dom);

        for (i, &c) in chars.iter().enumerate() {
            section.push(c);
            let curr = c.to_ascii_lowercase();
            let next = chars.get(i + 1).map(|n| n.to_ascii_lowercase());

            let root_done = root.is_none() && ends_root(curr)
                && !next.map_or(false, continues_root);
            let number_done = curr.is_ascii_digit()
                && !next.map_or(false, |n| n.is_ascii_digit());
            if !(next.is_none() || root_done || number_done || next == Some('/') || curr == ')') {
                continue;
            }

            let sect = std::mem::take(&mut section);
            if root_done && ROOT_RE.is_match(&sect) {
                minor_numeral = is_minor_numeral(&sect);
                root = Some(sect.clone());
            } else {
                if root.is_none() {
                    unrooted.get_or_insert(start);
                }

                if let Some(slash) = sect.strip_prefix('/') {
                    // "6/9" chords
                    if slash == "9" {
                        spec.record(9, 0);
                    } else if slash.is_empty() {
                        return Err(ChordParseError::MissingBass(s.to_string()));
                    } else {
                        bass = Some(slash.to_string());
                    }
                } else {
                    let mut mode_found = false;
                    if mode.is_none() {
                        mode = Mode::from_prefix(&sect);
                        mode_found = mode.is_some();
                    }

                    // A plain number such as the "7" in "C7" implies a dominant chord,
                    // except after a minor numeral like "ii7".
                    if mode.is_none() && !minor_numeral && is_bare_number(&sect) {
                        mode = Some(Mode::Dom);
                        mode_found = true;
                    }

                    let digits: String = sect.chars().filter(|c| c.is_ascii_digit()).collect();
                    if !digits.is_empty() {
                        let degree = digits.parse::<usize>().ok()
                            .filter(|d| (1..=MAX_DEGREE).contains(d))
                            .ok_or(ChordParseError::InvalidDegree {
                                symbol: s.to_string(),
                                section: sect.clone(),
                            })?;
                        let adj = adjustment(&sect);

                        // A quality followed by an odd extension stacks up
                        // every odd degree from the seventh, e.g. "m11" is 7, 9, 11.
                        if !mode_found || degree % 2 == 0 {
                            spec.record(degree, adj);
                        } else if degree >= 7 {
                            for d in (7..=degree).step_by(2) {
                                spec.record(d, adj);
                            }
                        }
                    }
                }
            }
            sections.push(sect);
            start = i + 1;
        }

        let root = root.ok_or(ChordParseError::MissingRoot {
            symbol: s.to_string(),
            position: unrooted.unwrap_or(0),
        })?;

        let bass = bass.unwrap_or_else(|| root.clone());
        spec.mode = mode.unwrap_or(if minor_numeral { Mode::Min } else { Mode::Dom });
        spec.root = root;
        spec = spec.bass(&bass);

        // A seventh is flat unless the chord says "maj"
        let is_maj7 = sections.iter().any(|sect| sect.contains("maj"));
        if spec.degree(7).is_some() && !is_maj7 {
            spec = spec.add(7, -1);
        }

        debug!("Parsed `{}` from sections {:?} as {}", s, sections, spec);
        Ok(spec)
    }
}

impl TryFrom<&str> for ChordSpec {
    type Error = ChordParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_str(s)
    }
}

impl fmt::Display for ChordSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut name = format!("{} {}", self.root, self.mode);
        let degrees = self.degrees.iter()
            .map(|deg| deg.to_string())
            .collect::<Vec<String>>();
        if !degrees.is_empty() {
            name.push_str(&format!(" ({})", degrees.join(",")));
        }
        if self.bass != self.root {
            name.push('/');
            name.push_str(&self.bass);
        }
        write!(f, "{}", name)
    }
}


/// A chord resolved to pitches, bass first.
/// An empty chord is a rest.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Chord {
    notes: Vec<Note>
}

impl Chord {
    pub fn new(notes: Vec<Note>) -> Chord {
        Chord {
            notes
        }
    }

    pub fn rest() -> Chord {
        Chord::default()
    }

    pub fn is_rest(&self) -> bool {
        self.notes.is_empty()
    }

    /// Return the notes that make up this chord.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn pitches(&self) -> Vec<isize> {
        self.notes.iter().map(|n| n.semitones).collect()
    }
}

impl From<Vec<isize>> for Chord {
    fn from(pitches: Vec<isize>) -> Self {
        Chord::new(pitches.into_iter().map(Note::from).collect())
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: Vec<String> = self.notes
            .iter().map(|n| n.to_string()).collect();
        write!(f, "{}", notes.join("-"))
    }
}
