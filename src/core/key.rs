use std::str::FromStr;
use super::note::{pitch_of, NoteParseError};

/// Pitch of C, which roman numerals in a key's name are read against.
const C: isize = 12;

/// The key that roman-numeral chords are resolved in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Key {
    pub tonic: isize,
}

impl Key {
    /// Resolve a note letter or roman numeral in this key.
    pub fn pitch(&self, text: &str) -> Result<isize, NoteParseError> {
        pitch_of(text, self.tonic)
    }
}

/// Parse a key from a note name, e.g. "Eb".
/// A roman numeral names a key relative to C, so "V" is G.
impl FromStr for Key {
    type Err = NoteParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Key {
            tonic: pitch_of(s, C)?
        })
    }
}

impl TryFrom<&str> for Key {
    type Error = NoteParseError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::from_str(s)
    }
}

impl Default for Key {
    fn default() -> Self {
        Key {
            tonic: C
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key: Key = "c".try_into().unwrap();
        assert_eq!(key, Key::default());

        let key: Key = "Eb".try_into().unwrap();
        assert_eq!(key.tonic, 15);

        let key: Key = "V".try_into().unwrap();
        assert_eq!(key.tonic, 19);

        assert!(Key::from_str("x").is_err());
    }

    #[test]
    fn test_key_pitch() {
        let key: Key = "A".try_into().unwrap();
        assert_eq!(key.pitch("I").unwrap(), 9);
        assert_eq!(key.pitch("iv").unwrap(), 14);
        assert_eq!(key.pitch("V").unwrap(), 16);
        assert_eq!(key.pitch("F#").unwrap(), 18);
    }
}
