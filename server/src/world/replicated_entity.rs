use tandem_shared::{EntityKey, HostType, ParticipantId, Pose, Property, PropertyError, Sequence, Writer};

/// Server-side record of a participant's avatar. The server never writes the
/// pose itself, it only accepts the owner's updates and forwards them.
pub struct ReplicatedEntity {
    key: EntityKey,
    owner: ParticipantId,
    pose: Property<Pose>,
}

impl ReplicatedEntity {
    pub fn new(key: EntityKey, owner: ParticipantId, host: HostType) -> Self {
        Self {
            key,
            owner,
            pose: Property::relayed(Pose::IDENTITY, Writer::Participant(owner), host),
        }
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    pub fn owner(&self) -> ParticipantId {
        self.owner
    }

    pub fn pose(&self) -> &Pose {
        self.pose.get()
    }

    pub fn sequence(&self) -> Sequence {
        self.pose.sequence()
    }

    /// Accept a pose published by `sender`. `Ok(false)` means the update was
    /// older than the one already held.
    pub fn try_receive_pose(
        &mut self,
        sender: &ParticipantId,
        sequence: Sequence,
        pose: Pose,
    ) -> Result<bool, PropertyError> {
        self.pose
            .try_relay(Writer::Participant(*sender), sequence, pose)
    }

    pub fn take_update(&mut self) -> Option<(Sequence, Pose)> {
        self.pose.take_update()
    }
}
