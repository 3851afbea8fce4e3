use std::collections::{BTreeMap, BTreeSet};
use crossbeam_channel::Sender;
use crate::core::error::PianoError;
use crate::core::pedal::{PedalMode, PedalState, PedalTransition};
use crate::core::pitch::Semitone;
use crate::core::settings::{ConfigChange, Settings};
use crate::core::tone::{ToneEngine, ToneHandle, NATURAL_DECAY_SECS};
use crate::messaging::{LifecycleEvent, PianoEvent};

/// Why an audible note is still in the sounding map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    /// Key is down
    Ringing,
    /// Key is up, sustain keeps it going
    Sustained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundingNote {
    pub handle: ToneHandle,
    pub state: ReleaseState,
}

/// Note lifecycle: which keys are held, which notes are audible, and when
/// tones start, decay and get cut off.
///
/// Every held key always has a sounding entry, and each entry owns exactly
/// one tone handle. Entries leave the map at the moment their tone is
/// released, so a handle is never released twice by the engine.
pub struct PianoEngine<T: ToneEngine> {
    tones: T,
    settings: Settings,
    pedal: PedalState,
    held: BTreeSet<Semitone>,
    sounding: BTreeMap<Semitone, SoundingNote>,
    display: Sender<LifecycleEvent>,
}

impl<T: ToneEngine> PianoEngine<T> {
    pub fn new(mut tones: T, settings: Settings, display: Sender<LifecycleEvent>) -> Self {
        tones.set_master_volume(settings.volume);
        Self {
            tones,
            settings,
            pedal: PedalState::new(),
            held: BTreeSet::new(),
            sounding: BTreeMap::new(),
            display,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sustain_active(&self) -> bool {
        self.pedal.sustain_active()
    }

    pub fn is_held(&self, semitone: Semitone) -> bool {
        self.held.contains(&semitone)
    }

    pub fn held(&self) -> impl Iterator<Item = Semitone> + '_ {
        self.held.iter().copied()
    }

    pub fn sounding(&self, semitone: Semitone) -> Option<&SoundingNote> {
        self.sounding.get(&semitone)
    }

    pub fn sounding_count(&self) -> usize {
        self.sounding.len()
    }

    pub fn tones(&self) -> &T {
        &self.tones
    }

    /// Ordered union of held and sounding keys
    pub fn audible_notes(&self) -> Vec<Semitone> {
        let mut notes: BTreeSet<Semitone> = self.sounding.keys().copied().collect();
        notes.extend(self.held.iter().copied());
        notes.into_iter().collect()
    }

    fn pedal_mode(&self) -> PedalMode {
        PedalMode {
            invert: self.settings.invert_pedal,
            toggle: self.settings.toggle_pedal,
        }
    }

    fn notify(&self, event: LifecycleEvent) {
        // Nobody listening is fine, e.g. during shutdown
        self.display.send(event).ok();
    }

    fn notify_notes(&self) {
        self.notify(LifecycleEvent::NotesChanged(self.audible_notes()));
    }

    /// Cut a note off and forget it
    fn fast_release(&mut self, semitone: Semitone) {
        if let Some(note) = self.sounding.remove(&semitone) {
            self.tones.fast_release(note.handle);
        }
    }

    pub fn note_on(&mut self, value: u8) -> Result<(), PianoError> {
        let semitone = Semitone::new(value)?;

        // Re-striking a ringing note cuts the old tone first
        self.fast_release(semitone);

        let frequency = semitone.frequency(self.settings.base_freq);
        let handle = self.tones.start_tone(frequency, self.settings.waveform);
        self.tones.schedule_natural_decay(handle, NATURAL_DECAY_SECS);

        self.held.insert(semitone);
        self.sounding.insert(semitone, SoundingNote {
            handle,
            state: ReleaseState::Ringing,
        });
        log::debug!("note on {} ({:.2} Hz)", semitone, frequency);

        self.notify(LifecycleEvent::NoteStarted(semitone));
        self.notify_notes();
        Ok(())
    }

    pub fn note_off(&mut self, value: u8) -> Result<(), PianoError> {
        let semitone = Semitone::new(value)?;
        let was_held = self.held.remove(&semitone);

        if self.sounding.contains_key(&semitone) {
            if self.pedal.sustain_active() {
                if let Some(note) = self.sounding.get_mut(&semitone) {
                    note.state = ReleaseState::Sustained;
                }
            } else {
                self.fast_release(semitone);
            }
        } else if !was_held {
            return Ok(());
        }

        self.notify_notes();
        Ok(())
    }

    /// Cut off every note that rings only because of sustain
    pub fn release_sustained_notes(&mut self) {
        let sustained: Vec<Semitone> = self
            .sounding
            .keys()
            .filter(|s| !self.held.contains(s))
            .copied()
            .collect();

        for semitone in sustained {
            self.fast_release(semitone);
        }
        self.notify_notes();
    }

    /// Silence everything, e.g. when the window loses focus.
    /// The pedal is dropped too, since its release will not be delivered.
    pub fn panic(&mut self) {
        self.held.clear();
        let all: Vec<Semitone> = self.sounding.keys().copied().collect();
        for semitone in all {
            self.fast_release(semitone);
        }

        let was_sustaining = self.pedal.sustain_active();
        self.pedal.clear();
        if was_sustaining {
            self.notify(LifecycleEvent::SustainChanged(false));
        }
        self.notify_notes();
    }

    /// Forget released notes whose natural decay has finished
    pub fn reap_finished(&mut self) {
        let before = self.sounding.len();
        let held = &self.held;
        let tones = &self.tones;
        self.sounding
            .retain(|semitone, note| held.contains(semitone) || tones.is_sounding(note.handle));

        if self.sounding.len() != before {
            self.notify_notes();
        }
    }

    pub fn pedal_down(&mut self) {
        let transition = self.pedal.pedal_down(self.pedal_mode());
        self.apply_pedal(transition);
    }

    pub fn pedal_up(&mut self) {
        let transition = self.pedal.pedal_up(self.pedal_mode());
        self.apply_pedal(transition);
    }

    fn apply_pedal(&mut self, transition: PedalTransition) {
        self.notify(LifecycleEvent::SustainChanged(transition.sustain_active));
        if transition.release_sustained {
            self.release_sustained_notes();
        }
    }

    pub fn apply_config(&mut self, change: ConfigChange) -> Result<(), PianoError> {
        self.settings.apply(&change)?;

        if change.affects_pedal() {
            let transition = self.pedal.reset();
            self.apply_pedal(transition);
        }
        if let ConfigChange::Volume(_) = change {
            self.tones.set_master_volume(self.settings.volume);
        }
        log::info!("settings changed: {:?}", change);
        Ok(())
    }

    /// Dispatch one input event. Invalid input is logged and dropped.
    pub fn handle_event(&mut self, event: PianoEvent) {
        let result = match event {
            PianoEvent::KeyDown(note) => self.note_on(note),
            PianoEvent::KeyUp(note) => self.note_off(note),
            PianoEvent::PedalDown => {
                self.pedal_down();
                Ok(())
            },
            PianoEvent::PedalUp => {
                self.pedal_up();
                Ok(())
            },
            PianoEvent::FocusLost => {
                self.panic();
                Ok(())
            },
            PianoEvent::ConfigChanged(change) => self.apply_config(change),
        };

        if let Err(e) = result {
            log::warn!("ignored input: {}", e);
        }
    }
}
