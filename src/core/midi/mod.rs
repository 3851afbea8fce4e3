mod input;

pub use input::{parse_midi_message, MidiInputHandler};
