use thiserror::Error;

/// Errors that can occur while handing messages to or taking them from a
/// transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The other end of the channel has gone away
    #[error("Transport channel is closed. The remote end has been dropped")]
    ChannelClosed,
}
