use thiserror::Error;
use log::debug;
use crate::core::{Key, Chord, ChordSpec, ChordParseError, NoteParseError, voice_lead};

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("Nothing to repeat at position {0}")]
    NothingToRepeat(usize),

    #[error("Couldn't parse chord `{0}`")]
    InvalidChord(String, #[source] ChordParseError),

    #[error("Couldn't resolve the notes of chord `{0}`")]
    InvalidNotes(String, #[source] NoteParseError),
}

/// A token of a progression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// "-", play the previous chord again
    Repeat,

    /// "nc", "n.c" or "n.c.", no chord
    Rest,

    Chord(ChordSpec),
}

impl Token {
    fn parse(s: &str) -> Result<Token, ChordParseError> {
        match s.to_lowercase().as_str() {
            "-" => Ok(Token::Repeat),
            "nc" | "n.c" | "n.c." => Ok(Token::Rest),
            _ => Ok(Token::Chord(s.parse()?)),
        }
    }
}

/// A sequence of chords, one per token.
/// Rests are empty chords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    chords: Vec<Chord>,
}

impl Progression {
    /// Resolve a sequence of tokens, e.g. `["C", "-", "nc", "G7"]`,
    /// in the given key and octave.
    pub fn parse<S: AsRef<str>>(tokens: &[S], key: &Key, octave: isize) -> Result<Progression, ProgressionError> {
        let mut chords: Vec<Chord> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let parsed = Token::parse(token)
                .map_err(|err| ProgressionError::InvalidChord(token.to_string(), err))?;
            let chord = match parsed {
                Token::Repeat => chords.last().cloned()
                    .ok_or(ProgressionError::NothingToRepeat(i))?,
                Token::Rest => Chord::rest(),
                Token::Chord(spec) => spec.chord_for_key(key, octave)
                    .map_err(|err| ProgressionError::InvalidNotes(token.to_string(), err))?,
            };
            debug!("{} -> {}", token, chord);
            chords.push(chord);
        }
        Ok(Progression { chords })
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// Revoice the progression so that each chord moves
    /// smoothly from the one before.
    pub fn voice_lead(&self) -> Progression {
        Progression {
            chords: voice_lead(&self.chords),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pitches(prog: &Progression) -> Vec<Vec<isize>> {
        prog.chords().iter().map(|c| c.pitches()).collect()
    }

    #[test]
    fn test_parse_progression() {
        let prog = Progression::parse(&["C", "-", "nc", "G7"], &Key::default(), 4).unwrap();
        assert_eq!(pitches(&prog), vec![
            vec![48, 60, 64, 67],
            vec![48, 60, 64, 67],
            vec![],
            vec![55, 67, 71, 74, 77],
        ]);
    }

    #[test]
    fn test_rest_tokens() {
        for token in ["nc", "NC", "n.c", "N.C."] {
            let prog = Progression::parse(&[token], &Key::default(), 4).unwrap();
            assert!(prog.chords()[0].is_rest());
        }
    }

    #[test]
    fn test_repeat_after_rest() {
        let prog = Progression::parse(&["C", "nc", "-"], &Key::default(), 4).unwrap();
        assert!(prog.chords()[2].is_rest());
    }

    #[test]
    fn test_numerals_in_key() {
        let key: Key = "G".try_into().unwrap();
        let prog = Progression::parse(&["I", "V7/V"], &key, 4).unwrap();
        assert_eq!(pitches(&prog), vec![
            vec![55, 67, 71, 74],
            vec![62, 74, 78, 81, 84],
        ]);
    }

    #[test]
    fn test_invalid_progressions() {
        let err = Progression::parse(&["-", "C"], &Key::default(), 4).unwrap_err();
        assert!(matches!(err, ProgressionError::NothingToRepeat(0)));

        let err = Progression::parse(&["C", "m7"], &Key::default(), 4).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidChord(ref token, _) if token == "m7"));

        let err = Progression::parse(&["C/x"], &Key::default(), 4).unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidNotes(..)));
    }

    #[test]
    fn test_voice_leading() {
        let prog = Progression::parse(&["C", "F", "nc", "G7", "C"], &Key::default(), 4).unwrap();
        let voiced = prog.voice_lead();
        assert_eq!(pitches(&voiced), vec![
            vec![48, 60, 64, 67],
            vec![53, 60, 65, 69],
            vec![],
            vec![55, 59, 62, 65, 67],
            vec![48, 60, 64, 67],
        ]);
    }

    #[test]
    fn test_voice_leading_same_chord() {
        let prog = Progression::parse(&["C", "C"], &Key::default(), 4).unwrap();
        let voiced = prog.voice_lead();
        assert_eq!(voiced.chords()[0], voiced.chords()[1]);
        assert_eq!(voiced, prog);
    }
}
