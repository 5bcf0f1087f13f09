use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::{fs::File, io::BufReader, path::Path};

/// Playback settings, from a sheet or the command line.
#[derive(Deserialize, PartialEq, Clone, Debug)]
#[serde(default)]
pub struct Settings {
    pub key: String,

    // Beats per minute
    pub tempo: usize,

    // Beats per chord
    pub duration: usize,

    // Times each chord is struck
    // within its duration
    pub subdivide: usize,

    pub velocity: u8,
    pub octave: isize,
    pub voice: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            key: "c".to_string(),
            tempo: 120,
            duration: 2,
            subdivide: 1,
            velocity: 100,
            octave: 4,
            voice: false,
        }
    }
}

/// A chord sheet, e.g.
///
/// ```yaml
/// chords: C Am7 - Fmaj7 G7sus4 G7
/// key: c
/// tempo: 90
/// voice: true
/// ```
#[derive(Deserialize, PartialEq, Clone, Debug, Default)]
pub struct Sheet {
    #[serde(default, deserialize_with = "from_progression")]
    pub chords: Vec<String>,

    #[serde(flatten)]
    pub settings: Settings,
}

impl Sheet {
    pub fn load(path: &Path) -> Result<Sheet> {
        let file = File::open(path)
            .with_context(|| format!("could not open sheet {}", path.display()))?;
        let reader = BufReader::new(file);
        let sheet = serde_yaml::from_reader(reader)
            .with_context(|| format!("error while reading sheet {}", path.display()))?;
        Ok(sheet)
    }
}

/// Lets us write progressions as space-separated strings in yaml,
/// e.g. "C Am F G" instead of "[C, Am, F, G]"
fn from_progression<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let chords: String = Deserialize::deserialize(deserializer)?;
    Ok(chords.split_whitespace().map(String::from).collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_sheet() {
        let yaml = "chords: C Am7  - G7/B\nkey: eb\ntempo: 90\nvoice: true\n";
        let sheet: Sheet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(sheet.chords, vec!["C", "Am7", "-", "G7/B"]);
        assert_eq!(sheet.settings, Settings {
            key: "eb".to_string(),
            tempo: 90,
            voice: true,
            ..Settings::default()
        });
    }

    #[test]
    fn test_sheet_defaults() {
        let sheet: Sheet = serde_yaml::from_str("octave: 3\n").unwrap();
        assert!(sheet.chords.is_empty());
        assert_eq!(sheet.settings.octave, 3);
        assert_eq!(sheet.settings.tempo, 120);
        assert_eq!(sheet.settings.key, "c".to_string());
    }

    #[test]
    fn test_missing_sheet() {
        assert!(Sheet::load(Path::new("/nonexistent/sheet.yaml")).is_err());
    }
}
