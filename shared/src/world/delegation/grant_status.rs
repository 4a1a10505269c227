use crate::{GrantState, ParticipantId};

/// A participant's local reading of an object's grant.
///
/// Requests carry no reply, so this is derived purely from the replicated
/// [`GrantState`] plus whether the participant has a grab request in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantStatus {
    /// Object is free and no request has been sent
    Available,
    /// A grab request was sent and no grant has been observed yet
    Requested,
    /// This participant holds the object
    Granted,
    /// Someone else holds the object
    Denied,
}

impl GrantStatus {
    pub fn observe(grant: &GrantState, local: &ParticipantId, requested: bool) -> Self {
        match grant {
            GrantState::Held(holder) if holder == local => GrantStatus::Granted,
            GrantState::Held(_) => GrantStatus::Denied,
            GrantState::Free if requested => GrantStatus::Requested,
            GrantState::Free => GrantStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, GrantStatus::Available)
    }

    pub fn is_requested(&self) -> bool {
        matches!(self, GrantStatus::Requested)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, GrantStatus::Granted)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, GrantStatus::Denied)
    }
}
