use thiserror::Error;

use tandem_shared::ObjectKey;

/// Errors returned by the `try_*` methods of the [`Client`](crate::Client)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The client was disconnected, nothing can be sent anymore
    #[error("Client is not connected - operation '{operation}' requires a live session")]
    NotConnected { operation: &'static str },

    /// The server never announced this object, or it was cleared
    #[error("{object} is unknown to this client - operation '{operation}' requires a replicated object")]
    ObjectNotFound {
        object: ObjectKey,
        operation: &'static str,
    },
}
