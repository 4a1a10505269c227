//! Seam to the external session layer's per-participant message channel.
//!
//! The session layer owns connection setup; the core only needs something it
//! can hand a message to and something it can poll for the next message.

mod channel;
mod error;

pub use channel::PacketChannel;
pub use error::TransportError;

/// Sends messages of type `M` over an established connection
pub trait PacketSender<M>: Send + Sync {
    /// Hands a message to the transport. Never blocks.
    fn send(&self, message: M) -> Result<(), TransportError>;
}

/// Receives messages of type `M` from an established connection
pub trait PacketReceiver<M>: Send {
    /// Returns the next delivered message, or `None` if nothing is waiting
    fn receive(&mut self) -> Result<Option<M>, TransportError>;
}
