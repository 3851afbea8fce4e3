/// How pedal presses are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PedalMode {
    /// Sustain while the pedal is up
    pub invert: bool,
    /// Each press flips sustain, releases are ignored
    pub toggle: bool,
}

/// Outcome of feeding one pedal event through the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PedalTransition {
    pub sustain_active: bool,
    /// Notes ringing only because of sustain must be cut off
    pub release_sustained: bool,
}

/// Turns raw pedal down/up events into a single sustain flag.
///
/// `engaged` tracks the physical pedal so that keyboard auto-repeat and
/// duplicated MIDI messages do not re-run transitions.
#[derive(Debug, Clone, Default)]
pub struct PedalState {
    engaged: bool,
    sustain_active: bool,
}

impl PedalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sustain_active(&self) -> bool {
        self.sustain_active
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn pedal_down(&mut self, mode: PedalMode) -> PedalTransition {
        if self.engaged {
            return self.unchanged();
        }
        self.engaged = true;

        let release_sustained = if mode.toggle {
            self.sustain_active = !self.sustain_active;
            !self.sustain_active
        } else if mode.invert {
            self.sustain_active = false;
            true
        } else {
            self.sustain_active = true;
            false
        };

        PedalTransition {
            sustain_active: self.sustain_active,
            release_sustained,
        }
    }

    pub fn pedal_up(&mut self, mode: PedalMode) -> PedalTransition {
        if !self.engaged {
            return self.unchanged();
        }
        self.engaged = false;

        let release_sustained = if mode.toggle {
            false
        } else if mode.invert {
            self.sustain_active = true;
            false
        } else {
            self.sustain_active = false;
            true
        };

        PedalTransition {
            sustain_active: self.sustain_active,
            release_sustained,
        }
    }

    /// Drop sustain after a mode change. The physical pedal position is kept.
    pub fn reset(&mut self) -> PedalTransition {
        self.sustain_active = false;
        PedalTransition {
            sustain_active: false,
            release_sustained: true,
        }
    }

    /// Back to the startup state: pedal up, no sustain. Used when input is
    /// lost and the pedal release may never arrive.
    pub fn clear(&mut self) {
        self.engaged = false;
        self.sustain_active = false;
    }

    fn unchanged(&self) -> PedalTransition {
        PedalTransition {
            sustain_active: self.sustain_active,
            release_sustained: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NORMAL: PedalMode = PedalMode { invert: false, toggle: false };
    const INVERT: PedalMode = PedalMode { invert: true, toggle: false };
    const TOGGLE: PedalMode = PedalMode { invert: false, toggle: true };

    #[test]
    fn test_normal_press_and_release() {
        let mut pedal = PedalState::new();
        let down = pedal.pedal_down(NORMAL);
        assert_eq!(down, PedalTransition { sustain_active: true, release_sustained: false });

        let up = pedal.pedal_up(NORMAL);
        assert_eq!(up, PedalTransition { sustain_active: false, release_sustained: true });
    }

    #[test]
    fn test_repeated_down_is_absorbed() {
        let mut pedal = PedalState::new();
        pedal.pedal_down(NORMAL);
        for _ in 0..5 {
            let repeat = pedal.pedal_down(NORMAL);
            assert!(repeat.sustain_active);
            assert!(!repeat.release_sustained);
        }
        assert!(pedal.pedal_up(NORMAL).release_sustained);
        // Stray release without a press
        assert!(!pedal.pedal_up(NORMAL).release_sustained);
    }

    #[test]
    fn test_inverted_pedal() {
        let mut pedal = PedalState::new();
        let down = pedal.pedal_down(INVERT);
        assert_eq!(down, PedalTransition { sustain_active: false, release_sustained: true });

        let up = pedal.pedal_up(INVERT);
        assert_eq!(up, PedalTransition { sustain_active: true, release_sustained: false });
    }

    #[test]
    fn test_toggle_flips_on_press_only() {
        let mut pedal = PedalState::new();

        let first = pedal.pedal_down(TOGGLE);
        assert_eq!(first, PedalTransition { sustain_active: true, release_sustained: false });
        let up = pedal.pedal_up(TOGGLE);
        assert_eq!(up, PedalTransition { sustain_active: true, release_sustained: false });

        let second = pedal.pedal_down(TOGGLE);
        assert_eq!(second, PedalTransition { sustain_active: false, release_sustained: true });
        pedal.pedal_up(TOGGLE);
        assert!(!pedal.sustain_active());
    }

    #[test]
    fn test_toggle_ignores_inversion() {
        let mut pedal = PedalState::new();
        let both = PedalMode { invert: true, toggle: true };
        assert!(pedal.pedal_down(both).sustain_active);
        assert!(pedal.pedal_up(both).sustain_active);
    }

    #[test]
    fn test_clear_forgets_physical_pedal() {
        let mut pedal = PedalState::new();
        pedal.pedal_down(NORMAL);
        pedal.clear();
        assert!(!pedal.is_engaged());
        assert!(!pedal.sustain_active());

        // A stray release is ignored and the next press engages again
        assert!(!pedal.pedal_up(NORMAL).release_sustained);
        assert!(pedal.pedal_down(NORMAL).sustain_active);
    }

    #[test]
    fn test_reset_keeps_physical_state() {
        let mut pedal = PedalState::new();
        pedal.pedal_down(NORMAL);
        let reset = pedal.reset();
        assert!(!reset.sustain_active);
        assert!(reset.release_sustained);
        assert!(pedal.is_engaged());
        // The held pedal does not re-engage on auto-repeat
        assert!(!pedal.pedal_down(NORMAL).sustain_active);
    }
}
