use std::{cmp::Reverse, fmt};
use lazy_static::lazy_static;

/// The quality of a chord.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    Dim,
    Min,
    Maj,
    Dom,
    Aug,
    Sus2,
    Sus,
    Five,
}

const KEYWORDS: [(&str, Mode); 12] = [
    ("maj", Mode::Maj),
    ("dim", Mode::Dim),
    ("o", Mode::Dim),
    ("min", Mode::Min),
    ("m", Mode::Min),
    ("-", Mode::Min),
    ("aug", Mode::Aug),
    ("+", Mode::Aug),
    ("sus2", Mode::Sus2),
    ("sus", Mode::Sus),
    ("5", Mode::Five),
    ("five", Mode::Five),
];

lazy_static! {
    /// Keywords ordered longest first, so "sus2" is tried before "sus"
    /// and "min" before "m".
    static ref BY_LENGTH: Vec<(&'static str, Mode)> = {
        let mut keywords = KEYWORDS.to_vec();
        keywords.sort_by_key(|(kw, _)| Reverse(kw.len()));
        keywords
    };
}

impl Mode {
    /// The mode named at the start of a chord section, if any,
    /// e.g. "sus2" for "sus2", "m7" or "maj9".
    /// Matching is case-sensitive: "M7" names no mode.
    pub fn from_prefix(section: &str) -> Option<Mode> {
        BY_LENGTH.iter()
            .find(|(kw, _)| section.starts_with(kw))
            .map(|(_, mode)| *mode)
    }

    /// Semitone shift this mode applies to a chord's
    /// third or fifth. Other degrees are never shifted.
    pub fn shift(&self, degree: usize) -> isize {
        match (self, degree) {
            (Mode::Dim, 3) | (Mode::Dim, 5) => -1,
            (Mode::Min, 3) => -1,
            (Mode::Aug, 5) => 1,
            (Mode::Sus2, 3) => -2,
            (Mode::Sus, 3) => 1,
            (Mode::Five, 3) => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Dim => "dim",
            Mode::Min => "min",
            Mode::Maj => "maj",
            Mode::Dom => "dom",
            Mode::Aug => "aug",
            Mode::Sus2 => "sus2",
            Mode::Sus => "sus",
            Mode::Five => "5",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mode_from_prefix() {
        assert_eq!(Mode::from_prefix("maj7"), Some(Mode::Maj));
        assert_eq!(Mode::from_prefix("m7"), Some(Mode::Min));
        assert_eq!(Mode::from_prefix("min"), Some(Mode::Min));
        assert_eq!(Mode::from_prefix("-7"), Some(Mode::Min));
        assert_eq!(Mode::from_prefix("dim7"), Some(Mode::Dim));
        assert_eq!(Mode::from_prefix("o7"), Some(Mode::Dim));
        assert_eq!(Mode::from_prefix("+"), Some(Mode::Aug));
        assert_eq!(Mode::from_prefix("five"), Some(Mode::Five));
        assert_eq!(Mode::from_prefix("5"), Some(Mode::Five));
        assert_eq!(Mode::from_prefix("7"), None);
        assert_eq!(Mode::from_prefix("add9"), None);
        assert_eq!(Mode::from_prefix("M7"), None);
    }

    #[test]
    fn test_sus2_not_shadowed() {
        assert_eq!(Mode::from_prefix("sus2"), Some(Mode::Sus2));
        assert_eq!(Mode::from_prefix("sus4"), Some(Mode::Sus));
        assert_eq!(Mode::from_prefix("sus"), Some(Mode::Sus));
    }

    #[test]
    fn test_mode_shifts() {
        assert_eq!(Mode::Maj.shift(3), 0);
        assert_eq!(Mode::Min.shift(3), -1);
        assert_eq!(Mode::Min.shift(5), 0);
        assert_eq!(Mode::Dim.shift(5), -1);
        assert_eq!(Mode::Aug.shift(5), 1);
        assert_eq!(Mode::Sus2.shift(3), -2);
        assert_eq!(Mode::Sus.shift(3), 1);
        assert_eq!(Mode::Five.shift(3), 3);
        assert_eq!(Mode::Dim.shift(7), 0);
    }
}
