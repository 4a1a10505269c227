use std::collections::VecDeque;

use log::{trace, warn};

use tandem_shared::{transport::PacketSender, ParticipantId, ServerMessage};

/// Outbound side of one participant's connection
pub(crate) struct Connection {
    participant: ParticipantId,
    sender: Box<dyn PacketSender<ServerMessage>>,
    outgoing: VecDeque<ServerMessage>,
}

impl Connection {
    pub fn new(participant: ParticipantId, sender: Box<dyn PacketSender<ServerMessage>>) -> Self {
        Self {
            participant,
            sender,
            outgoing: VecDeque::new(),
        }
    }

    pub fn queue(&mut self, message: ServerMessage) {
        self.outgoing.push_back(message);
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Hands every queued message to the transport, in queue order. Returns
    /// how many were sent.
    pub fn send_all(&mut self) -> usize {
        let mut sent = 0;
        while let Some(message) = self.outgoing.pop_front() {
            trace!("sending {} to {}", message.name(), self.participant);
            if let Err(error) = self.sender.send(message) {
                // the session layer surfaces the disconnect on its own
                warn!(
                    "dropping {} queued message(s) for {}: {}",
                    self.outgoing.len() + 1,
                    self.participant,
                    error
                );
                self.outgoing.clear();
                break;
            }
            sent += 1;
        }
        sent
    }
}
