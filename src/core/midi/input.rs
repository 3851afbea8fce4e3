use crossbeam_channel::Sender;
use midir::{MidiInput, MidiInputConnection};
use crate::messaging::PianoEvent;

const CLIENT_NAME: &str = "Virtual Piano MIDI Input";
/// Sustain pedal controller number
const CC_SUSTAIN: u8 = 64;

/// Handles MIDI input from connected devices
pub struct MidiInputHandler {
    connection: Option<MidiInputConnection<()>>,
    connected_port: Option<String>,
    message_sender: Sender<PianoEvent>,
}

impl MidiInputHandler {
    /// Create a new MIDI input handler
    pub fn new(message_sender: Sender<PianoEvent>) -> Self {
        Self {
            connection: None,
            connected_port: None,
            message_sender,
        }
    }

    /// List all available MIDI input ports
    pub fn list_ports(&self) -> Vec<String> {
        match MidiInput::new(CLIENT_NAME) {
            Ok(midi_in) => midi_in
                .ports()
                .iter()
                .filter_map(|port| midi_in.port_name(port).ok())
                .collect(),
            Err(err) => {
                log::warn!("Error initializing MIDI input: {}", err);
                Vec::new()
            }
        }
    }

    pub fn connected_port(&self) -> Option<&str> {
        self.connected_port.as_deref()
    }

    /// Connect to a specific MIDI input port by name
    pub fn connect_to_port(&mut self, port_name: &str) -> anyhow::Result<()> {
        self.disconnect();

        let midi_in = MidiInput::new(CLIENT_NAME)
            .map_err(|err| anyhow::anyhow!("Failed to create MIDI input: {}", err))?;

        let ports = midi_in.ports();
        let port = ports
            .into_iter()
            .find(|port| midi_in.port_name(port).map(|name| name == port_name).unwrap_or(false))
            .ok_or_else(|| anyhow::anyhow!("MIDI port '{}' not found", port_name))?;

        let sender = self.message_sender.clone();
        let connection = midi_in
            .connect(&port, "virtual-piano-input", move |_stamp, message, _| {
                if let Some(event) = parse_midi_message(message) {
                    sender.send(event).ok();
                }
            }, ())
            .map_err(|err| anyhow::anyhow!("Failed to connect to MIDI port: {}", err))?;

        log::info!("Connected to MIDI device '{}'", port_name);
        self.connection = Some(connection);
        self.connected_port = Some(port_name.to_string());
        Ok(())
    }

    /// Disconnect from the currently connected MIDI port
    pub fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
        }
        self.connected_port = None;
    }
}

/// Translate a raw MIDI message into a piano event.
/// Only note on/off and the sustain pedal are understood; channel is ignored.
pub fn parse_midi_message(message: &[u8]) -> Option<PianoEvent> {
    if message.len() < 3 {
        return None;
    }

    let status = message[0] & 0xF0;
    let data1 = message[1];
    let data2 = message[2];

    match status {
        0x80 => Some(PianoEvent::KeyUp(data1)),
        0x90 => {
            // Note On with velocity 0 is equivalent to Note Off
            if data2 == 0 {
                Some(PianoEvent::KeyUp(data1))
            } else {
                Some(PianoEvent::KeyDown(data1))
            }
        },
        0xB0 if data1 == CC_SUSTAIN => {
            if data2 >= 64 {
                Some(PianoEvent::PedalDown)
            } else {
                Some(PianoEvent::PedalUp)
            }
        },
        _ => None,
    }
}
