use crate::core::pitch::Semitone;
use crate::messaging::PianoEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MousePress {
    semitone: Semitone,
    /// False when another source (a MIDI device) already held the key
    owned: bool,
}

/// Turns pointer presses on the keyboard into key events.
///
/// Only one key is played with the mouse at a time. A key that was already
/// held elsewhere is re-struck by a click, but the mouse release leaves it
/// held.
#[derive(Debug, Default)]
pub struct MouseKeys {
    current: Option<MousePress>,
}

impl MouseKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Semitone> {
        self.current.map(|press| press.semitone)
    }

    /// Map one frame of pointer input to key events.
    ///
    /// `pressed` is the key hit by a primary press this frame, `button_down`
    /// the button state once every pointer event of the frame is applied.
    pub fn frame(
        &mut self,
        pressed: Option<Semitone>,
        button_down: bool,
        held_elsewhere: impl Fn(Semitone) -> bool,
    ) -> Vec<PianoEvent> {
        let mut events = Vec::new();

        if let Some(semitone) = pressed {
            let previous = self.current.take();
            if let Some(press) = previous {
                if press.owned {
                    events.push(PianoEvent::KeyUp(press.semitone.value()));
                }
            }

            // The key-up just queued has not reached the engine yet
            let owned = match previous {
                Some(press) if press.semitone == semitone => press.owned,
                _ => !held_elsewhere(semitone),
            };
            events.push(PianoEvent::KeyDown(semitone.value()));
            self.current = Some(MousePress { semitone, owned });
        }

        // Press and release can arrive in the same frame
        if !button_down {
            events.extend(self.release());
        }
        events
    }

    /// End the mouse key, if any
    pub fn release(&mut self) -> Option<PianoEvent> {
        self.current
            .take()
            .filter(|press| press.owned)
            .map(|press| PianoEvent::KeyUp(press.semitone.value()))
    }

    /// Forget the mouse key without emitting anything, e.g. after a panic
    pub fn clear(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: u8) -> Semitone {
        Semitone::new(value).unwrap()
    }

    fn nothing_held(_: Semitone) -> bool {
        false
    }

    #[test]
    fn test_press_then_release_over_two_frames() {
        let mut mouse = MouseKeys::new();
        assert_eq!(mouse.frame(Some(s(60)), true, nothing_held), vec![PianoEvent::KeyDown(60)]);
        assert_eq!(mouse.current(), Some(s(60)));

        assert!(mouse.frame(None, true, nothing_held).is_empty());
        assert_eq!(mouse.frame(None, false, nothing_held), vec![PianoEvent::KeyUp(60)]);
        assert_eq!(mouse.current(), None);
    }

    #[test]
    fn test_press_and_release_in_one_frame() {
        let mut mouse = MouseKeys::new();
        let events = mouse.frame(Some(s(60)), false, nothing_held);
        assert_eq!(events, vec![PianoEvent::KeyDown(60), PianoEvent::KeyUp(60)]);
        assert_eq!(mouse.current(), None);

        // Nothing left to release afterwards
        assert!(mouse.frame(None, false, nothing_held).is_empty());
    }

    #[test]
    fn test_new_press_ends_previous_key() {
        let mut mouse = MouseKeys::new();
        mouse.frame(Some(s(60)), true, nothing_held);
        let events = mouse.frame(Some(s(64)), true, nothing_held);
        assert_eq!(events, vec![PianoEvent::KeyUp(60), PianoEvent::KeyDown(64)]);
    }

    #[test]
    fn test_key_held_elsewhere_stays_held() {
        let mut mouse = MouseKeys::new();
        let midi_holds_62 = |semitone: Semitone| semitone == s(62);

        // Re-strike, but the release belongs to the device
        assert_eq!(mouse.frame(Some(s(62)), true, midi_holds_62), vec![PianoEvent::KeyDown(62)]);
        assert!(mouse.frame(None, false, midi_holds_62).is_empty());
    }

    #[test]
    fn test_fast_repeat_on_same_key_keeps_ownership() {
        let mut mouse = MouseKeys::new();
        mouse.frame(Some(s(60)), true, nothing_held);

        // The engine still reports 60 held because the key-up is in flight
        let still_held = |semitone: Semitone| semitone == s(60);
        let events = mouse.frame(Some(s(60)), true, still_held);
        assert_eq!(events, vec![PianoEvent::KeyUp(60), PianoEvent::KeyDown(60)]);
        assert_eq!(mouse.frame(None, false, still_held), vec![PianoEvent::KeyUp(60)]);
    }

    #[test]
    fn test_clear_forgets_silently() {
        let mut mouse = MouseKeys::new();
        mouse.frame(Some(s(70)), true, nothing_held);
        mouse.clear();
        assert!(mouse.frame(None, false, nothing_held).is_empty());
    }
}
