use tandem_shared::{EntityKey, HostType, ParticipantId, Pose, Property, PropertyError, Sequence, Writer};

use crate::TrackedPose;

/// This client's own avatar. The only entity it is allowed to write.
pub(crate) struct LocalAvatar {
    key: EntityKey,
    pose: Property<Pose>,
}

impl LocalAvatar {
    /// `sequence` and `pose` come from the server's announcement, so numbering
    /// continues past whatever the server already holds
    pub fn new(
        key: EntityKey,
        owner: ParticipantId,
        host: HostType,
        sequence: Sequence,
        pose: Pose,
    ) -> Self {
        Self {
            key,
            pose: Property::host_owned(pose, Writer::Participant(owner), host)
                .starting_at(sequence),
        }
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// The pose last published. The owner displays this directly.
    pub fn pose(&self) -> &Pose {
        self.pose.get()
    }

    /// Floor-lock `tracked` and write it as the next published pose
    pub fn publish(
        &mut self,
        writer: &ParticipantId,
        tracked: &TrackedPose,
    ) -> Result<Pose, PropertyError> {
        let pose = tracked.head.floor_locked(tracked.floor_height);
        self.pose.try_set(Writer::Participant(*writer), pose)?;
        Ok(pose)
    }

    pub fn take_update(&mut self) -> Option<(Sequence, Pose)> {
        self.pose.take_update()
    }
}
