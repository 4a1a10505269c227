use crate::{GrantState, ParticipantId, Pose};

/// Replicated snapshot of a Shared Manipulable Object. Written only by the
/// server role.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectState {
    pub grant: GrantState,
    pub pose: Pose,
    /// Whether the pose is driven by submissions rather than ambient physics.
    /// Always equal to `grant != Free`.
    pub kinematic: bool,
    /// Number of grant transitions since the object was spawned, wrapping.
    /// Tells a reader that the server evaluated requests even when the grant
    /// it observes is unchanged.
    pub grant_epoch: u32,
}

impl ObjectState {
    pub fn new(pose: Pose) -> Self {
        Self {
            grant: GrantState::Free,
            pose,
            kinematic: false,
            grant_epoch: 0,
        }
    }

    pub fn holder(&self) -> Option<ParticipantId> {
        self.grant.holder()
    }
}
