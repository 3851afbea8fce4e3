pub mod engine;
pub mod error;
pub mod midi;
pub mod oscillator;
pub mod pedal;
pub mod pitch;
pub mod settings;
pub mod synth;
pub mod tone;
pub mod voice;

pub use engine::PianoEngine;
pub use synth::{SharedSynth, Synth};
