use crossbeam_channel::{unbounded, Receiver, Sender};
use super::PianoEvent;

/// MessageBus carries input events from the UI and MIDI threads to the engine
pub struct MessageBus {
    pub(crate) sender: Sender<PianoEvent>,
    pub(crate) receiver: Receiver<PianoEvent>,
}

impl MessageBus {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();

        MessageBus {
            sender,
            receiver,
        }
    }

    /// Get a sender that can be cloned and passed to input sources
    pub fn sender(&self) -> Sender<PianoEvent> {
        self.sender.clone()
    }

    /// Drain up to `max_messages` pending events
    pub fn drain(&self, max_messages: usize) -> Vec<PianoEvent> {
        self.receiver.try_iter().take(max_messages).collect()
    }

    pub fn send(&self, msg: PianoEvent) {
        // The receiver lives as long as the bus, so this cannot fail
        self.sender.send(msg).ok();
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}
