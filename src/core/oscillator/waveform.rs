use serde::{Serialize, Deserialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 3] = [Waveform::Sine, Waveform::Triangle, Waveform::Sawtooth];

    /// Sample the waveform at a phase in [0, 1)
    pub fn sample(&self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    -4.0 + 4.0 * phase
                }
            },
            Waveform::Sawtooth => 2.0 * phase - 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Waveform::Sine => "Sine",
            Waveform::Triangle => "Triangle",
            Waveform::Sawtooth => "Sawtooth",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_at_key_phases() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.25) - 1.0).abs() < 1e-6);
        assert!((Waveform::Triangle.sample(0.75) + 1.0).abs() < 1e-6);
        assert_eq!(Waveform::Sawtooth.sample(0.0), -1.0);
        assert_eq!(Waveform::Sawtooth.sample(0.5), 0.0);
    }

    #[test]
    fn test_output_stays_in_range() {
        for waveform in Waveform::ALL {
            for i in 0..100 {
                let value = waveform.sample(i as f32 / 100.0);
                assert!((-1.0..=1.0).contains(&value), "{:?} out of range", waveform);
            }
        }
    }
}
