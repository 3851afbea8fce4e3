//! Contract between the note lifecycle and whatever actually makes sound.

pub use crate::core::oscillator::Waveform;

/// Length of the natural fade every tone starts right after its attack
pub const NATURAL_DECAY_SECS: f32 = 6.0;
/// Length of the forced fade used on key release and sustain cut-off
pub const FAST_RELEASE_SECS: f32 = 0.25;

/// Opaque reference to a started tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToneHandle(pub u64);

/// Fire-and-forget tone commands. None of these block or report completion.
pub trait ToneEngine {
    /// Start a tone with a short click-free attack
    fn start_tone(&mut self, frequency: f32, waveform: Waveform) -> ToneHandle;

    /// Fade the tone to silence over `seconds`, then stop it
    fn schedule_natural_decay(&mut self, handle: ToneHandle, seconds: f32);

    /// Cancel scheduled fades and cut the tone off over `FAST_RELEASE_SECS`.
    /// Safe on a handle that already stopped.
    fn fast_release(&mut self, handle: ToneHandle);

    /// Whether the tone is still producing sound
    fn is_sounding(&self, handle: ToneHandle) -> bool;

    fn set_master_volume(&mut self, volume: f32);
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq)]
    pub enum ToneCall {
        Start(ToneHandle, f32, Waveform),
        Decay(ToneHandle, f32),
        Release(ToneHandle),
        Volume(f32),
    }

    /// Records every command and tracks which handles are still live
    #[derive(Debug, Default)]
    pub struct RecordingToneEngine {
        pub calls: Vec<ToneCall>,
        pub live: HashSet<ToneHandle>,
        next_handle: u64,
    }

    impl RecordingToneEngine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Simulate a natural decay running to completion
        pub fn finish(&mut self, handle: ToneHandle) {
            self.live.remove(&handle);
        }

        pub fn releases_of(&self, handle: ToneHandle) -> usize {
            self.calls
                .iter()
                .filter(|call| **call == ToneCall::Release(handle))
                .count()
        }

        pub fn started(&self) -> Vec<ToneHandle> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    ToneCall::Start(handle, _, _) => Some(*handle),
                    _ => None,
                })
                .collect()
        }
    }

    impl ToneEngine for RecordingToneEngine {
        fn start_tone(&mut self, frequency: f32, waveform: Waveform) -> ToneHandle {
            self.next_handle += 1;
            let handle = ToneHandle(self.next_handle);
            self.live.insert(handle);
            self.calls.push(ToneCall::Start(handle, frequency, waveform));
            handle
        }

        fn schedule_natural_decay(&mut self, handle: ToneHandle, seconds: f32) {
            self.calls.push(ToneCall::Decay(handle, seconds));
        }

        fn fast_release(&mut self, handle: ToneHandle) {
            self.live.remove(&handle);
            self.calls.push(ToneCall::Release(handle));
        }

        fn is_sounding(&self, handle: ToneHandle) -> bool {
            self.live.contains(&handle)
        }

        fn set_master_volume(&mut self, volume: f32) {
            self.calls.push(ToneCall::Volume(volume));
        }
    }
}
