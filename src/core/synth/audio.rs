impl super::Synth {
    /// Generate one audio sample
    pub fn get_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let mut mix = 0.0;

        for voice in self.voices.iter_mut() {
            mix += voice.next_sample(sample_rate);
        }

        // Drop voices whose envelope has run out
        self.voices.retain(|v| v.is_active());

        (mix * self.volume).clamp(-1.0, 1.0)
    }

    /// Fill an interleaved buffer, writing the same value to every channel
    pub fn fill_buffer(&mut self, data: &mut [f32], channels: usize) {
        for frame in data.chunks_mut(channels.max(1)) {
            let value = self.get_sample();
            for sample in frame.iter_mut() {
                *sample = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::oscillator::Waveform;
    use crate::core::synth::Synth;
    use crate::core::tone::ToneHandle;

    #[test]
    fn test_silent_without_voices() {
        let mut synth = Synth::new(44100.0);
        assert_eq!(synth.get_sample(), 0.0);
    }

    #[test]
    fn test_fill_buffer_duplicates_channels() {
        let mut synth = Synth::new(44100.0);
        synth.start_voice(ToneHandle(1), 440.0, Waveform::Sawtooth);
        let mut data = vec![0.0f32; 64];
        synth.fill_buffer(&mut data, 2);
        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(data.iter().any(|s| *s != 0.0));
    }
}
