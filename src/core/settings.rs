use std::fs::File;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use crate::core::error::PianoError;
use crate::core::tone::Waveform;

/// Player-facing configuration read by the piano core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tuning of A4 in Hz
    pub base_freq: f32,
    pub waveform: Waveform,
    /// Master volume, 0.0 to 1.0
    pub volume: f32,
    /// Sustain while the pedal is up
    pub invert_pedal: bool,
    /// Each pedal press flips sustain
    pub toggle_pedal: bool,
    pub show_note_names: bool,
    pub show_staff: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_freq: 440.0,
            waveform: Waveform::Triangle,
            volume: 0.5,
            invert_pedal: false,
            toggle_pedal: false,
            show_note_names: true,
            show_staff: true,
        }
    }
}

/// A single edit coming from the settings panel
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigChange {
    BaseFreq(f32),
    Waveform(Waveform),
    Volume(f32),
    InvertPedal(bool),
    TogglePedal(bool),
    ShowNoteNames(bool),
    ShowStaff(bool),
}

impl ConfigChange {
    /// Whether this change alters how the pedal is interpreted
    pub fn affects_pedal(&self) -> bool {
        matches!(self, ConfigChange::InvertPedal(_) | ConfigChange::TogglePedal(_))
    }
}

impl Settings {
    /// Validate and apply a change
    pub fn apply(&mut self, change: &ConfigChange) -> Result<(), PianoError> {
        match *change {
            ConfigChange::BaseFreq(freq) => {
                if !(freq.is_finite() && freq > 0.0) {
                    return Err(PianoError::InvalidSetting(format!("base frequency {}", freq)));
                }
                self.base_freq = freq;
            },
            ConfigChange::Waveform(waveform) => self.waveform = waveform,
            ConfigChange::Volume(volume) => {
                if !volume.is_finite() {
                    return Err(PianoError::InvalidSetting(format!("volume {}", volume)));
                }
                self.volume = volume.clamp(0.0, 1.0);
            },
            ConfigChange::InvertPedal(on) => self.invert_pedal = on,
            ConfigChange::TogglePedal(on) => self.toggle_pedal = on,
            ConfigChange::ShowNoteNames(on) => self.show_note_names = on,
            ConfigChange::ShowStaff(on) => self.show_staff = on,
        }
        Ok(())
    }

    /// Clamp out-of-range values from a hand-edited file back to defaults
    fn sanitized(mut self) -> Self {
        if !(self.base_freq.is_finite() && self.base_freq > 0.0) {
            self.base_freq = Settings::default().base_freq;
        }
        self.volume = if self.volume.is_finite() { self.volume.clamp(0.0, 1.0) } else { 0.5 };
        self
    }

    pub fn settings_dir() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push("virtual-piano");
        Ok(path)
    }

    /// Read startup settings from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let settings: Settings = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(settings.sanitized())
    }

    /// Startup settings from the user config directory, falling back to defaults.
    /// The file is only ever read.
    pub fn load() -> Self {
        let path = match Self::settings_dir() {
            Ok(dir) => dir.join("settings.json"),
            Err(e) => {
                log::warn!("{}; using default settings", e);
                return Self::default();
            }
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            },
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }
}
