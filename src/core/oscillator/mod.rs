mod envelope;
mod waveform;

pub use self::envelope::Envelope;
pub use self::waveform::Waveform;

/// Phase-accumulator oscillator for a single tone
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f32,
    phase: f32,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f32) -> Self {
        Self {
            waveform,
            frequency,
            phase: 0.0,
        }
    }

    /// Produce the next sample and advance the phase
    pub fn next(&mut self, sample_rate: f32) -> f32 {
        let value = self.waveform.sample(self.phase);
        self.phase = (self.phase + self.frequency / sample_rate) % 1.0;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_wraps_once_per_period() {
        let mut osc = Oscillator::new(Waveform::Sine, 100.0);
        let first = osc.next(1000.0);
        for _ in 0..9 {
            osc.next(1000.0);
        }
        // Ten samples at 100 Hz / 1 kHz is one full cycle
        assert!((osc.next(1000.0) - first).abs() < 1e-3);
    }
}
