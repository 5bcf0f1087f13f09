use std::fmt;

/// Semitones above the root for each degree of the major scale.
pub const MAJOR: [isize; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Highest degree a chord may name.
pub const MAX_DEGREE: usize = 127;

/// A scale degree of a chord with a semitone adjustment,
/// e.g. the "b9" of a C7b9 is `Degree { degree: 9, adj: -1 }`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Degree {
    pub degree: usize,
    pub adj: isize
}

impl Degree {
    /// Semitones above the root for an unaltered degree.
    /// Degrees past 7 wrap around into the next octave,
    /// e.g. 9 is 2 an octave up.
    pub fn semitones(degree: usize) -> isize {
        let octaves = isize::try_from(degree / 8).unwrap_or(isize::MAX);
        MAJOR[(degree % 7 + 6) % 7].saturating_add(octaves.saturating_mul(12))
    }

    /// Semitones above the root, including the adjustment.
    pub fn to_interval(&self) -> isize {
        Self::semitones(self.degree).saturating_add(self.adj)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = if self.adj < 0 { "b" } else { "#" };
        let adjustments = symbol.repeat(self.adj.unsigned_abs());
        write!(f, "{}{}", adjustments, self.degree)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_degree_semitones() {
        assert_eq!(Degree::semitones(1), 0);
        assert_eq!(Degree::semitones(3), 4);
        assert_eq!(Degree::semitones(5), 7);
        assert_eq!(Degree::semitones(7), 11);
        assert_eq!(Degree::semitones(8), 12);
        assert_eq!(Degree::semitones(9), 14);
        assert_eq!(Degree::semitones(11), 17);
        assert_eq!(Degree::semitones(13), 21);
        assert_eq!(Degree::semitones(16), 26);
    }

    #[test]
    fn test_huge_degrees_saturate() {
        assert_eq!(Degree::semitones(usize::MAX), isize::MAX);

        let deg = Degree { degree: usize::MAX - 1, adj: 1 };
        assert_eq!(deg.to_interval(), isize::MAX);
    }

    #[test]
    fn test_degree_interval() {
        let deg = Degree { degree: 7, adj: -1 };
        assert_eq!(deg.to_interval(), 10);

        let deg = Degree { degree: 9, adj: 1 };
        assert_eq!(deg.to_interval(), 15);
    }

    #[test]
    fn test_degree_names() {
        let deg = Degree { degree: 7, adj: 0 };
        assert_eq!(deg.to_string(), "7".to_string());

        let deg = Degree { degree: 9, adj: -1 };
        assert_eq!(deg.to_string(), "b9".to_string());

        let deg = Degree { degree: 11, adj: 2 };
        assert_eq!(deg.to_string(), "##11".to_string());
    }
}
