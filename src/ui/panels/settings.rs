use crossbeam_channel::Sender;
use egui::{Context, Pos2, Rect};
use crate::core::oscillator::Waveform;
use crate::core::settings::{ConfigChange, Settings};
use crate::messaging::PianoEvent;

/// Requests the panel cannot fulfil itself
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    RefreshMidiPorts,
    ConnectMidi(String),
    DisconnectMidi,
}

/// Floating settings window opened from the gear button
pub struct SettingsPanel {
    sender: Sender<PianoEvent>,
    open: bool,
    panel_rect: Option<Rect>,
}

impl SettingsPanel {
    pub fn new(sender: Sender<PianoEvent>) -> Self {
        Self {
            sender,
            open: false,
            panel_rect: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Close on a click that lands on neither the panel nor its button
    pub fn close_on_click_outside(&mut self, click: Pos2, button_rect: Rect) {
        if !self.open || button_rect.contains(click) {
            return;
        }
        if let Some(panel) = self.panel_rect {
            if panel.contains(click) {
                return;
            }
        }
        self.open = false;
    }

    fn send(&self, change: ConfigChange) {
        self.sender.send(PianoEvent::ConfigChanged(change)).ok();
    }

    pub fn show(
        &mut self,
        ctx: &Context,
        settings: &Settings,
        midi_ports: &[String],
        connected_port: Option<&str>,
    ) -> Option<PanelAction> {
        if !self.open {
            self.panel_rect = None;
            return None;
        }

        let mut action = None;
        let response = egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-12.0, 48.0))
            .show(ctx, |ui| {
                ui.heading("Sound");

                let mut volume = settings.volume;
                if ui.add(egui::Slider::new(&mut volume, 0.0..=1.0).text("Volume")).changed() {
                    self.send(ConfigChange::Volume(volume));
                }

                let mut base_freq = settings.base_freq;
                if ui.add(egui::Slider::new(&mut base_freq, 400.0..=480.0).text("A4 (Hz)")).changed() {
                    self.send(ConfigChange::BaseFreq(base_freq));
                }

                ui.horizontal(|ui| {
                    ui.label("Waveform:");
                    let mut waveform = settings.waveform;
                    egui::ComboBox::new("waveform_selector", "")
                        .selected_text(waveform.label())
                        .show_ui(ui, |ui| {
                            for option in Waveform::ALL {
                                ui.selectable_value(&mut waveform, option, option.label());
                            }
                        });
                    if waveform != settings.waveform {
                        self.send(ConfigChange::Waveform(waveform));
                    }
                });

                ui.separator();
                ui.heading("Pedal (Space)");

                let mut invert = settings.invert_pedal;
                if ui.checkbox(&mut invert, "Invert pedal").changed() {
                    self.send(ConfigChange::InvertPedal(invert));
                }
                let mut toggle = settings.toggle_pedal;
                if ui.checkbox(&mut toggle, "Toggle mode").changed() {
                    self.send(ConfigChange::TogglePedal(toggle));
                }

                ui.separator();
                ui.heading("Display");

                let mut show_names = settings.show_note_names;
                if ui.checkbox(&mut show_names, "Show note names").changed() {
                    self.send(ConfigChange::ShowNoteNames(show_names));
                }
                let mut show_staff = settings.show_staff;
                if ui.checkbox(&mut show_staff, "Show staff").changed() {
                    self.send(ConfigChange::ShowStaff(show_staff));
                }

                ui.separator();
                ui.heading("MIDI Input");

                ui.horizontal(|ui| {
                    if ui.button("Refresh Ports").clicked() {
                        action = Some(PanelAction::RefreshMidiPorts);
                    }
                    if connected_port.is_some() && ui.button("Disconnect").clicked() {
                        action = Some(PanelAction::DisconnectMidi);
                    }
                });

                if midi_ports.is_empty() {
                    ui.label("No MIDI inputs found");
                }
                for port in midi_ports {
                    let is_selected = connected_port == Some(port.as_str());
                    if ui.radio(is_selected, port).clicked() && !is_selected {
                        action = Some(PanelAction::ConnectMidi(port.clone()));
                    }
                }
            });

        self.panel_rect = response.map(|r| r.response.rect);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn panel() -> SettingsPanel {
        let (sender, _receiver) = unbounded();
        SettingsPanel::new(sender)
    }

    #[test]
    fn test_toggle_and_close() {
        let mut panel = panel();
        assert!(!panel.is_open());
        panel.toggle();
        assert!(panel.is_open());
        panel.toggle();
        assert!(!panel.is_open());
        panel.toggle();
        panel.close();
        assert!(!panel.is_open());
    }

    #[test]
    fn test_click_outside_closes() {
        let button = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(20.0, 20.0));
        let mut panel = panel();
        panel.toggle();
        panel.panel_rect = Some(Rect::from_min_max(Pos2::new(100.0, 0.0), Pos2::new(300.0, 300.0)));

        panel.close_on_click_outside(Pos2::new(150.0, 150.0), button);
        assert!(panel.is_open());
        panel.close_on_click_outside(Pos2::new(10.0, 10.0), button);
        assert!(panel.is_open());
        panel.close_on_click_outside(Pos2::new(50.0, 400.0), button);
        assert!(!panel.is_open());
    }

    #[test]
    fn test_changes_are_sent_as_events() {
        let (sender, receiver) = unbounded();
        let panel = SettingsPanel::new(sender);
        panel.send(ConfigChange::TogglePedal(true));
        assert_eq!(
            receiver.try_recv(),
            Ok(PianoEvent::ConfigChanged(ConfigChange::TogglePedal(true)))
        );
    }
}
