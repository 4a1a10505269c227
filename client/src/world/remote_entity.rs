use tandem_shared::{HostType, ParticipantId, Pose, Property, PropertyError, Sequence, Writer};

/// Read-only view of another participant's avatar.
///
/// Holds two poses: the latest replicated `target`, and the `displayed` pose
/// that chases it a little every render step.
pub(crate) struct RemoteEntityView {
    owner: ParticipantId,
    target: Property<Pose>,
    displayed: Pose,
    // false until the owner has published at least once
    has_pose: bool,
}

impl RemoteEntityView {
    pub fn new(owner: ParticipantId, host: HostType, sequence: Sequence, pose: Pose) -> Self {
        Self {
            owner,
            target: Property::remote_owned(pose, Writer::Participant(owner), host, sequence),
            displayed: pose,
            has_pose: sequence != 0,
        }
    }

    pub fn owner(&self) -> ParticipantId {
        self.owner
    }

    pub fn target(&self) -> &Pose {
        self.target.get()
    }

    pub fn displayed(&self) -> &Pose {
        &self.displayed
    }

    /// Mirror a replicated pose. The first pose ever received is snapped to
    /// rather than interpolated toward.
    pub fn receive(&mut self, sequence: Sequence, pose: Pose) -> Result<bool, PropertyError> {
        let applied = self.target.try_mirror(sequence, pose)?;
        if applied && !self.has_pose {
            self.displayed = pose;
            self.has_pose = true;
        }
        Ok(applied)
    }

    /// One render step: cover `min(1, rate * dt)` of the remaining distance
    pub fn render(&mut self, dt: f32, rate: f32) {
        let t = (rate * dt).min(1.0);
        self.displayed = self.displayed.interpolate(self.target.get(), t);
    }
}
