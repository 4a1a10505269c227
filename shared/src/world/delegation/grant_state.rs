use crate::ParticipantId;

/// The single-writer token of a Shared Manipulable Object, as decided by
/// the server role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrantState {
    /// Nobody holds the object; ambient physics drives it
    #[default]
    Free,
    /// The given participant holds the object; only its pose submissions
    /// move it
    Held(ParticipantId),
}

impl GrantState {
    pub fn holder(&self) -> Option<ParticipantId> {
        match self {
            GrantState::Free => None,
            GrantState::Held(holder) => Some(*holder),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, GrantState::Free)
    }

    pub fn is_held_by(&self, participant: &ParticipantId) -> bool {
        self.holder().as_ref() == Some(participant)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GrantState::Free => "Free",
            GrantState::Held(_) => "Held",
        }
    }
}
