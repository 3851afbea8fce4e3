/// Level treated as silent; exponential ramps cannot reach zero
pub const SILENCE: f32 = 0.0001;
/// Per-tone peak after the attack
pub const PEAK_LEVEL: f32 = 0.4;
/// Fade-in that keeps note starts click-free
pub const ATTACK_SECS: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeStage {
    Attack,
    Hold,
    Decay,
    Release,
    Idle,
}

/// Gain envelope of a single tone.
///
/// A tone rises to `PEAK_LEVEL`, then holds until a natural decay or a fast
/// release ramps it exponentially down to `SILENCE`, after which it is idle.
#[derive(Debug, Clone)]
pub struct Envelope {
    stage: EnvelopeStage,
    level: f32,
    time_in_stage: f32,
    ramp_start: f32,
    ramp_duration: f32,
    pending_decay: Option<f32>,
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            stage: EnvelopeStage::Attack,
            level: SILENCE,
            time_in_stage: 0.0,
            ramp_start: SILENCE,
            ramp_duration: 0.0,
            pending_decay: None,
        }
    }

    pub fn stage(&self) -> EnvelopeStage {
        self.stage
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn is_finished(&self) -> bool {
        self.stage == EnvelopeStage::Idle
    }

    /// Queue the natural decay. It starts once the attack completes; only the
    /// first schedule counts.
    pub fn schedule_decay(&mut self, duration: f32) {
        match self.stage {
            EnvelopeStage::Attack => {
                if self.pending_decay.is_none() {
                    self.pending_decay = Some(duration);
                }
            },
            EnvelopeStage::Hold => self.start_ramp(EnvelopeStage::Decay, duration),
            EnvelopeStage::Decay | EnvelopeStage::Release | EnvelopeStage::Idle => {},
        }
    }

    /// Cancel whatever is scheduled and fade out from the current level
    pub fn release(&mut self, duration: f32) {
        match self.stage {
            EnvelopeStage::Release | EnvelopeStage::Idle => {},
            _ => {
                self.pending_decay = None;
                self.start_ramp(EnvelopeStage::Release, duration);
            },
        }
    }

    fn start_ramp(&mut self, stage: EnvelopeStage, duration: f32) {
        self.stage = stage;
        self.time_in_stage = 0.0;
        self.ramp_start = self.level.max(SILENCE);
        self.ramp_duration = duration.max(0.0);
    }

    /// Advance by `dt` seconds and return the new level
    pub fn next(&mut self, dt: f32) -> f32 {
        match self.stage {
            EnvelopeStage::Attack => {
                self.time_in_stage += dt;
                let progress = (self.time_in_stage / ATTACK_SECS).min(1.0);
                self.level = SILENCE + (PEAK_LEVEL - SILENCE) * progress;
                if progress >= 1.0 {
                    self.level = PEAK_LEVEL;
                    match self.pending_decay.take() {
                        Some(duration) => self.start_ramp(EnvelopeStage::Decay, duration),
                        None => {
                            self.stage = EnvelopeStage::Hold;
                            self.time_in_stage = 0.0;
                        },
                    }
                }
            },
            EnvelopeStage::Hold => {},
            EnvelopeStage::Decay | EnvelopeStage::Release => {
                self.time_in_stage += dt;
                if self.time_in_stage >= self.ramp_duration {
                    self.stage = EnvelopeStage::Idle;
                    self.level = 0.0;
                } else {
                    let progress = self.time_in_stage / self.ramp_duration;
                    self.level = self.ramp_start * (SILENCE / self.ramp_start).powf(progress);
                }
            },
            EnvelopeStage::Idle => self.level = 0.0,
        }
        self.level
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 1000.0;

    fn run(envelope: &mut Envelope, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            envelope.next(DT);
        }
    }

    #[test]
    fn test_attack_reaches_peak_then_holds() {
        let mut envelope = Envelope::new();
        run(&mut envelope, ATTACK_SECS + 0.005);
        assert_eq!(envelope.stage(), EnvelopeStage::Hold);
        assert_eq!(envelope.level(), PEAK_LEVEL);

        run(&mut envelope, 1.0);
        assert_eq!(envelope.level(), PEAK_LEVEL);
    }

    #[test]
    fn test_decay_waits_for_attack() {
        let mut envelope = Envelope::new();
        envelope.schedule_decay(1.0);
        assert_eq!(envelope.stage(), EnvelopeStage::Attack);

        run(&mut envelope, 0.02);
        assert_eq!(envelope.stage(), EnvelopeStage::Decay);
        assert!(envelope.level() < PEAK_LEVEL);

        run(&mut envelope, 1.0);
        assert!(envelope.is_finished());
        assert_eq!(envelope.level(), 0.0);
    }

    #[test]
    fn test_first_decay_schedule_wins() {
        let mut envelope = Envelope::new();
        envelope.schedule_decay(0.5);
        envelope.schedule_decay(10.0);
        run(&mut envelope, 0.6);
        assert!(envelope.is_finished());
    }

    #[test]
    fn test_release_cancels_decay() {
        let mut envelope = Envelope::new();
        envelope.schedule_decay(6.0);
        run(&mut envelope, 0.5);
        let before = envelope.level();

        envelope.release(0.25);
        assert_eq!(envelope.stage(), EnvelopeStage::Release);
        let first = envelope.next(DT);
        // Ramp continues from the captured level rather than jumping
        assert!(first <= before && first > before * 0.9);

        run(&mut envelope, 0.25);
        assert!(envelope.is_finished());
    }

    #[test]
    fn test_release_during_attack() {
        let mut envelope = Envelope::new();
        envelope.next(DT);
        envelope.release(0.1);
        run(&mut envelope, 0.11);
        assert!(envelope.is_finished());
    }

    #[test]
    fn test_release_is_noop_when_idle() {
        let mut envelope = Envelope::new();
        envelope.release(0.01);
        run(&mut envelope, 0.02);
        assert!(envelope.is_finished());

        envelope.release(5.0);
        envelope.schedule_decay(5.0);
        assert!(envelope.is_finished());
    }
}
