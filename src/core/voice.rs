use crate::core::oscillator::{Envelope, Oscillator, Waveform};
use crate::core::tone::ToneHandle;

/// One sounding tone inside the synth
#[derive(Debug, Clone)]
pub struct Voice {
    pub handle: ToneHandle,
    pub oscillator: Oscillator,
    pub envelope: Envelope,
}

impl Voice {
    pub fn new(handle: ToneHandle, frequency: f32, waveform: Waveform) -> Self {
        Self {
            handle,
            oscillator: Oscillator::new(waveform, frequency),
            envelope: Envelope::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.envelope.is_finished()
    }

    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        let gain = self.envelope.next(1.0 / sample_rate);
        self.oscillator.next(sample_rate) * gain
    }
}
