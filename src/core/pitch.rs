use std::fmt;
use crate::core::error::PianoError;

/// Lowest key on the keyboard (A0)
pub const FIRST_SEMITONE: u8 = 21;
/// Highest key on the keyboard (C8)
pub const LAST_SEMITONE: u8 = 108;
/// Reference key for tuning (A4)
pub const REFERENCE_SEMITONE: u8 = 69;

pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F",
    "F#", "G", "G#", "A", "A#", "B",
];

/// A key number inside the fixed 88-key range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Semitone(u8);

impl Semitone {
    /// Validate a raw key number against the keyboard range
    pub fn new(value: u8) -> Result<Self, PianoError> {
        if (FIRST_SEMITONE..=LAST_SEMITONE).contains(&value) {
            Ok(Self(value))
        } else {
            Err(PianoError::SemitoneOutOfRange(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Pitch class, 0 = C
    pub fn pitch_class(self) -> u8 {
        self.0 % 12
    }

    pub fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    pub fn name(self) -> &'static str {
        NOTE_NAMES[self.pitch_class() as usize]
    }

    pub fn is_accidental(self) -> bool {
        self.name().ends_with('#')
    }

    /// Frequency relative to the A4 reference pitch
    pub fn frequency(self, base_freq: f32) -> f32 {
        base_freq * 2.0f32.powf((self.0 as f32 - REFERENCE_SEMITONE as f32) / 12.0)
    }

    /// Diatonic step counted from C0, sharps share the step of their natural
    pub fn diatonic_index(self) -> i32 {
        const STEPS: [i32; 12] = [0, 0, 1, 1, 2, 3, 3, 4, 4, 5, 5, 6];
        self.octave() as i32 * 7 + STEPS[self.pitch_class() as usize]
    }

    pub fn all() -> impl Iterator<Item = Semitone> {
        (FIRST_SEMITONE..=LAST_SEMITONE).map(Semitone)
    }
}

impl fmt::Display for Semitone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave())
    }
}

/// One key of the on-screen keyboard
#[derive(Debug, Clone, PartialEq)]
pub struct PianoKey {
    pub semitone: Semitone,
    /// Full note name, e.g. "C#4"
    pub note: String,
    /// Text painted on the key (only C keys carry one)
    pub label: Option<String>,
    pub is_accidental: bool,
    /// Index of the white key this key sits on or right after
    pub white_index: usize,
}

/// Build the ordered key list for the whole range
pub fn keyboard_layout() -> Vec<PianoKey> {
    let mut keys = Vec::with_capacity((LAST_SEMITONE - FIRST_SEMITONE + 1) as usize);
    let mut white_index = 0;

    for semitone in Semitone::all() {
        let is_accidental = semitone.is_accidental();
        if is_accidental {
            // Black keys hang off the previous white key
            keys.push(PianoKey {
                semitone,
                note: semitone.to_string(),
                label: None,
                is_accidental,
                white_index: white_index - 1,
            });
        } else {
            let label = if semitone.pitch_class() == 0 {
                Some(semitone.to_string())
            } else {
                None
            };
            keys.push(PianoKey {
                semitone,
                note: semitone.to_string(),
                label,
                is_accidental,
                white_index,
            });
            white_index += 1;
        }
    }

    keys
}

/// Number of white keys in the layout
pub fn white_key_count() -> usize {
    Semitone::all().filter(|s| !s.is_accidental()).count()
}
