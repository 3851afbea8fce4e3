mod keyboard;
mod mouse;
mod staff;

pub use keyboard::{KeyShade, KeyboardView};
pub use mouse::MouseKeys;
pub use staff::StaffView;

use crate::core::pitch::Semitone;

/// Text of the current-notes line
pub fn current_notes_text(notes: &[Semitone]) -> String {
    if notes.is_empty() {
        return "Current notes: -".to_string();
    }
    let names: Vec<String> = notes.iter().map(|n| n.to_string()).collect();
    format!("Current notes: {}", names.join(" , "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_notes_text() {
        assert_eq!(current_notes_text(&[]), "Current notes: -");
        let notes = [Semitone::new(60).unwrap(), Semitone::new(64).unwrap()];
        assert_eq!(current_notes_text(&notes), "Current notes: C4 , E4");
    }
}
