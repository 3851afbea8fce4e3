mod settings;

pub use settings::{PanelAction, SettingsPanel};
