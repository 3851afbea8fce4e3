pub mod audio;

use std::sync::{Arc, RwLock};
use crate::core::oscillator::Waveform;
use crate::core::tone::{ToneEngine, ToneHandle, FAST_RELEASE_SECS};
use crate::core::voice::Voice;

/// Polyphonic tone generator driven by the audio callback
pub struct Synth {
    pub sample_rate: f32,
    pub volume: f32,
    pub voices: Vec<Voice>,
}

impl Synth {
    /// Create a new synthesizer instance
    pub fn new(sample_rate: f32) -> Self {
        Synth {
            sample_rate,
            volume: 0.5,
            voices: Vec::new(),
        }
    }

    pub fn start_voice(&mut self, handle: ToneHandle, frequency: f32, waveform: Waveform) {
        self.voices.push(Voice::new(handle, frequency, waveform));
    }

    fn voice_mut(&mut self, handle: ToneHandle) -> Option<&mut Voice> {
        self.voices.iter_mut().find(|v| v.handle == handle)
    }

    pub fn schedule_decay(&mut self, handle: ToneHandle, seconds: f32) {
        if let Some(voice) = self.voice_mut(handle) {
            voice.envelope.schedule_decay(seconds);
        }
    }

    pub fn release(&mut self, handle: ToneHandle, seconds: f32) {
        if let Some(voice) = self.voice_mut(handle) {
            voice.envelope.release(seconds);
        }
    }

    pub fn is_active(&self, handle: ToneHandle) -> bool {
        self.voices.iter().any(|v| v.handle == handle && v.is_active())
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

/// Synth shared between the UI thread (commands) and the audio callback (rendering)
pub struct SharedSynth {
    synth: Arc<RwLock<Synth>>,
    next_handle: u64,
}

impl SharedSynth {
    pub fn new(synth: Arc<RwLock<Synth>>) -> Self {
        Self {
            synth,
            next_handle: 0,
        }
    }
}

impl ToneEngine for SharedSynth {
    fn start_tone(&mut self, frequency: f32, waveform: Waveform) -> ToneHandle {
        self.next_handle += 1;
        let handle = ToneHandle(self.next_handle);
        match self.synth.write() {
            Ok(mut synth) => synth.start_voice(handle, frequency, waveform),
            Err(_) => log::error!("Synth lock poisoned; tone {:?} dropped", handle),
        }
        handle
    }

    fn schedule_natural_decay(&mut self, handle: ToneHandle, seconds: f32) {
        if let Ok(mut synth) = self.synth.write() {
            synth.schedule_decay(handle, seconds);
        }
    }

    fn fast_release(&mut self, handle: ToneHandle) {
        if let Ok(mut synth) = self.synth.write() {
            synth.release(handle, FAST_RELEASE_SECS);
        }
    }

    fn is_sounding(&self, handle: ToneHandle) -> bool {
        self.synth
            .read()
            .map(|synth| synth.is_active(handle))
            .unwrap_or(false)
    }

    fn set_master_volume(&mut self, volume: f32) {
        if let Ok(mut synth) = self.synth.write() {
            synth.set_volume(volume);
        }
    }
}
