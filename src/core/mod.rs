mod key;
mod mode;
mod note;
mod chord;
mod degree;
mod voicing;

pub use key::Key;
pub use note::NoteParseError;
pub use chord::{Chord, ChordSpec, ChordParseError};
pub use voicing::voice_lead;
