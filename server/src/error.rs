use thiserror::Error;

use tandem_shared::{EntityKey, ObjectKey, ParticipantId};

/// Errors surfaced by the [`Server`](crate::Server).
///
/// Protocol traffic never produces these: unauthorized or stale requests are
/// dropped silently. They only report misuse by the session layer driving the
/// server, or are logged when a message names something that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    /// The session layer admitted the same participant twice
    #[error("{participant} is already connected. Each connection must be admitted with a unique ParticipantId")]
    ParticipantAlreadyConnected { participant: ParticipantId },

    /// Operation named a participant with no live connection
    #[error("{participant} is not connected - operation '{operation}' requires a live connection")]
    ParticipantNotConnected {
        participant: ParticipantId,
        operation: &'static str,
    },

    /// Message referenced a shared object that was never spawned
    #[error("{object} does not exist - operation '{operation}' requires a spawned object")]
    ObjectNotFound {
        object: ObjectKey,
        operation: &'static str,
    },

    /// Message referenced a replicated entity that does not exist (anymore)
    #[error("{entity} does not exist - operation '{operation}' requires a spawned entity")]
    EntityNotFound {
        entity: EntityKey,
        operation: &'static str,
    },
}
