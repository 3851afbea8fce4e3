use thiserror::Error;

/// Invalid input reaching the piano core
///
/// These never surface to the player; the event dispatcher logs and drops them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PianoError {
    #[error("semitone {0} is outside the keyboard range")]
    SemitoneOutOfRange(u8),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}
