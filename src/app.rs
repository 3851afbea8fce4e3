use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;
use crate::audio::AudioOutput;
use crate::core::engine::ReleaseState;
use crate::core::midi::MidiInputHandler;
use crate::core::pitch::Semitone;
use crate::core::settings::Settings;
use crate::core::{PianoEngine, SharedSynth};
use crate::messaging::{LifecycleEvent, MessageBus, PianoEvent};
use crate::ui::components::{current_notes_text, KeyShade, KeyboardView, MouseKeys, StaffView};
use crate::ui::panels::{PanelAction, SettingsPanel};

/// Upper bound on input events handled per frame
const MAX_EVENTS_PER_FRAME: usize = 256;

// Main app state
pub struct PianoApp {
    engine: PianoEngine<SharedSynth>,
    message_bus: MessageBus,
    lifecycle: Receiver<LifecycleEvent>,
    _audio: AudioOutput,
    midi: MidiInputHandler,
    midi_ports: Vec<String>,
    keyboard: KeyboardView,
    staff: StaffView,
    settings_panel: SettingsPanel,
    current_notes: Vec<Semitone>,
    sustain_on: bool,
    mouse: MouseKeys,
    keyboard_centered: bool,
}

impl eframe::App for PianoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_input(ctx);
        self.process_messages();
        self.engine.reap_finished();
        self.process_lifecycle();

        let mut gear_rect = egui::Rect::NOTHING;
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Virtual Piano");
                ui.label("🎹");

                if self.sustain_on {
                    ui.colored_label(egui::Color32::from_rgb(100, 180, 255), "Sustain");
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let gear = ui.selectable_label(self.settings_panel.is_open(), "⚙");
                    if gear.clicked() {
                        self.settings_panel.toggle();
                    }
                    gear_rect = gear.rect;
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let settings = self.engine.settings().clone();

            if settings.show_note_names {
                ui.label(current_notes_text(&self.current_notes));
            } else {
                // Keep the layout steady while the text is hidden
                ui.label("");
            }
            ui.add_space(8.0);

            if settings.show_staff {
                ui.horizontal(|ui| {
                    ui.label("Staff");
                    if ui.small_button("Reset").clicked() {
                        self.staff.reset();
                    }
                });
                self.staff.show(ui);
                ui.add_space(8.0);
            }

            self.render_keyboard(ui);
        });

        let connected = self.midi.connected_port().map(str::to_string);
        let settings = self.engine.settings().clone();
        let action = self.settings_panel.show(ctx, &settings, &self.midi_ports, connected.as_deref());
        if let Some(action) = action {
            self.handle_panel_action(action);
        }

        let click = ctx.input(|i| if i.pointer.primary_clicked() { i.pointer.interact_pos() } else { None });
        if let Some(pos) = click {
            self.settings_panel.close_on_click_outside(pos, gear_rect);
        }

        // Keep polling for finished tones and incoming MIDI
        ctx.request_repaint();
    }
}

impl PianoApp {
    pub fn new() -> Result<Self> {
        log::info!("Creating PianoApp instance");

        let audio = AudioOutput::start()?;
        let settings = Settings::load();

        let message_bus = MessageBus::new();
        let (display_sender, lifecycle) = unbounded();
        let engine = PianoEngine::new(SharedSynth::new(audio.synth.clone()), settings, display_sender);

        let midi = MidiInputHandler::new(message_bus.sender());
        let midi_ports = midi.list_ports();
        log::info!("Found {} MIDI input ports", midi_ports.len());

        let settings_panel = SettingsPanel::new(message_bus.sender());

        Ok(PianoApp {
            engine,
            message_bus,
            lifecycle,
            _audio: audio,
            midi,
            midi_ports,
            keyboard: KeyboardView::new(),
            staff: StaffView::new(),
            settings_panel,
            current_notes: Vec::new(),
            sustain_on: false,
            mouse: MouseKeys::new(),
            keyboard_centered: false,
        })
    }

    /// Translate window-level input into piano events
    fn collect_input(&mut self, ctx: &egui::Context) {
        let events = ctx.input(|i| i.events.clone());

        for event in events {
            match event {
                egui::Event::Key { key: egui::Key::Space, pressed, .. } => {
                    // Auto-repeat presses are absorbed by the pedal state machine
                    let event = if pressed { PianoEvent::PedalDown } else { PianoEvent::PedalUp };
                    self.message_bus.send(event);
                },
                egui::Event::Key { key: egui::Key::Escape, pressed: true, .. } => {
                    self.settings_panel.close();
                },
                egui::Event::WindowFocused(false) => {
                    self.mouse.clear();
                    self.message_bus.send(PianoEvent::FocusLost);
                },
                _ => {},
            }
        }
    }

    fn process_messages(&mut self) {
        for event in self.message_bus.drain(MAX_EVENTS_PER_FRAME) {
            self.engine.handle_event(event);
        }
    }

    /// Feed lifecycle notifications to the display state
    fn process_lifecycle(&mut self) {
        while let Ok(event) = self.lifecycle.try_recv() {
            match event {
                LifecycleEvent::NotesChanged(notes) => self.current_notes = notes,
                LifecycleEvent::NoteStarted(semitone) => self.staff.push(semitone),
                LifecycleEvent::SustainChanged(on) => self.sustain_on = on,
            }
        }
    }

    fn render_keyboard(&mut self, ui: &mut egui::Ui) {
        let mut scroll = egui::ScrollArea::horizontal().id_salt("keyboard_scroll");
        if !self.keyboard_centered {
            let offset = (self.keyboard.width() - ui.available_width()).max(0.0) / 2.0;
            scroll = scroll.horizontal_scroll_offset(offset);
            self.keyboard_centered = true;
        }

        let engine = &self.engine;
        let keyboard = &self.keyboard;
        let pressed = scroll
            .show(ui, |ui| {
                keyboard.show(ui, |semitone| match engine.sounding(semitone) {
                    _ if engine.is_held(semitone) => KeyShade::Held,
                    Some(note) if note.state == ReleaseState::Sustained => KeyShade::Sustained,
                    _ => KeyShade::Idle,
                })
            })
            .inner;

        // Checked after the press so a tap within one frame still ends the key
        let button_down = ui.input(|i| i.pointer.primary_down());
        for event in self.mouse.frame(pressed, button_down, |s| engine.is_held(s)) {
            self.message_bus.send(event);
        }
    }

    fn handle_panel_action(&mut self, action: PanelAction) {
        match action {
            PanelAction::RefreshMidiPorts => {
                self.midi_ports = self.midi.list_ports();
            },
            PanelAction::ConnectMidi(port) => {
                if let Err(e) = self.midi.connect_to_port(&port) {
                    log::warn!("{}", e);
                }
            },
            PanelAction::DisconnectMidi => {
                self.midi.disconnect();
                // Notes held on the device would otherwise stay stuck
                self.message_bus.send(PianoEvent::FocusLost);
            },
        }
    }
}
