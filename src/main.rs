mod config;
mod core;
mod file;
mod progression;

use clap::{Parser, ValueHint};
use std::path::PathBuf;
use anyhow::{bail, Context, Result};
use log::info;
use config::{Settings, Sheet};
use crate::core::Key;
use file::{Layout, save_to_midi_file, default_file_name};
use progression::Progression;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Chord symbols, e.g. C Am7 - G7/B nc
    chords: Vec<String>,

    /// Key for roman numerals, e.g. eb
    #[clap(short, long)]
    key: Option<String>,

    /// Beats per minute
    #[clap(short, long)]
    tempo: Option<usize>,

    /// Beats per chord
    #[clap(short, long)]
    duration: Option<usize>,

    /// Times each chord is struck within its duration
    #[clap(short, long)]
    subdivide: Option<usize>,

    #[clap(short, long)]
    velocity: Option<u8>,

    #[clap(short = 'O', long, allow_hyphen_values = true)]
    octave: Option<isize>,

    #[clap(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Voice lead the progression
    #[clap(long)]
    voice: bool,

    /// Read chords and settings from a yaml sheet
    #[clap(long, value_hint = ValueHint::FilePath)]
    sheet: Option<PathBuf>,

    /// Print the notes of each chord
    #[clap(short, long)]
    print: bool,
}

impl Args {
    /// Command line settings win over the sheet's.
    fn settings(&self, sheet: Settings) -> Settings {
        Settings {
            key: self.key.clone().unwrap_or(sheet.key),
            tempo: self.tempo.unwrap_or(sheet.tempo),
            duration: self.duration.unwrap_or(sheet.duration),
            subdivide: self.subdivide.unwrap_or(sheet.subdivide),
            velocity: self.velocity.unwrap_or(sheet.velocity),
            octave: self.octave.unwrap_or(sheet.octave),
            voice: self.voice || sheet.voice,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let sheet = match &args.sheet {
        Some(path) => Sheet::load(path)?,
        None => Sheet::default(),
    };
    let settings = args.settings(sheet.settings);
    let tokens = if args.chords.is_empty() {
        sheet.chords
    } else {
        args.chords.clone()
    };
    if tokens.is_empty() {
        bail!("no chords given");
    }

    let key: Key = settings.key.as_str().try_into()
        .with_context(|| format!("invalid key `{}`", settings.key))?;
    let mut progression = Progression::parse(&tokens, &key, settings.octave)?;
    if settings.voice {
        progression = progression.voice_lead();
    }

    if args.print {
        for (token, chord) in tokens.iter().zip(progression.chords()) {
            if chord.is_rest() {
                println!("{}: rest", token);
            } else {
                println!("{}: {}", token, chord);
            }
        }
    }

    let layout = Layout {
        tempo: settings.tempo,
        duration: settings.duration,
        subdivide: settings.subdivide,
        velocity: settings.velocity,
    };
    let path = args.output.clone()
        .unwrap_or_else(|| PathBuf::from(default_file_name(&tokens)));
    save_to_midi_file(progression.chords(), &layout, &path)?;
    info!("wrote {} chords in {} to {}", tokens.len(), settings.key, path.display());
    println!("created {}", path.display());

    Ok(())
}
