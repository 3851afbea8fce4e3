use crate::core::pitch::Semitone;
use crate::core::settings::ConfigChange;

/// Input events driving the piano, from the UI or a MIDI device
#[derive(Debug, Clone, PartialEq)]
pub enum PianoEvent {
    KeyDown(u8),
    KeyUp(u8),
    PedalDown,
    PedalUp,
    FocusLost,
    ConfigChanged(ConfigChange),
}

/// Notifications for the display adapters
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Ordered list of every audible key (held or sustained)
    NotesChanged(Vec<Semitone>),
    /// A fresh tone was struck
    NoteStarted(Semitone),
    SustainChanged(bool),
}
