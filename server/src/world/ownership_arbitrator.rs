use log::{debug, info, trace, warn};

use tandem_shared::{GrantState, HostType, ObjectKey, ObjectState, ParticipantId, Pose, Property, Sequence, Writer};

use crate::ObjectWorld;

/// Single-writer token of one Shared Manipulable Object.
///
/// The arbitrator is the only thing that ever changes who holds the object.
/// It is evaluated one request at a time by the server, so the order in which
/// requests are processed is the tie-break: whichever grab is processed first
/// while the object is free wins, and every other grab is ignored until the
/// holder lets go. Nothing here replies to the requester; the outcome is
/// visible to everyone through the replicated [`ObjectState`].
pub struct OwnershipArbitrator {
    object: ObjectKey,
    state: Property<ObjectState>,
}

impl OwnershipArbitrator {
    pub fn new(object: ObjectKey, pose: Pose, host: HostType) -> Self {
        Self {
            object,
            state: Property::host_owned(ObjectState::new(pose), Writer::Server, host),
        }
    }

    pub fn object(&self) -> ObjectKey {
        self.object
    }

    pub fn grant(&self) -> GrantState {
        self.state.grant
    }

    pub fn state(&self) -> &ObjectState {
        self.state.get()
    }

    pub fn sequence(&self) -> Sequence {
        self.state.sequence()
    }

    /// `Free -> Held(requester)`, switching the object to kinematic.
    /// Ignored if the object is held by anyone, including the requester.
    /// Returns whether the grant changed.
    pub fn request_grab<W: ObjectWorld>(&mut self, world: &mut W, requester: &ParticipantId) -> bool {
        if let GrantState::Held(holder) = self.grant() {
            debug!(
                "{} requested {} while it is held by {}, ignoring",
                requester, self.object, holder
            );
            return false;
        }

        world.set_kinematic(&self.object, true);
        self.write(|state| {
            state.grant = GrantState::Held(*requester);
            state.kinematic = true;
            state.grant_epoch = state.grant_epoch.wrapping_add(1);
        });
        info!("{} granted to {}", self.object, requester);
        true
    }

    /// `Held(requester) -> Free`, handing the object back to ambient physics.
    /// Ignored if the object is free or held by someone else.
    /// Returns whether the grant changed.
    pub fn request_release<W: ObjectWorld>(
        &mut self,
        world: &mut W,
        requester: &ParticipantId,
    ) -> bool {
        if !self.grant().is_held_by(requester) {
            debug!(
                "{} asked to release {} which it does not hold ({}), ignoring",
                requester,
                self.object,
                self.grant().name()
            );
            return false;
        }

        world.set_kinematic(&self.object, false);
        self.write(|state| {
            state.grant = GrantState::Free;
            state.kinematic = false;
            state.grant_epoch = state.grant_epoch.wrapping_add(1);
        });
        info!("{} released by {}", self.object, requester);
        true
    }

    /// Drive the object to `pose`, if and only if `requester` holds it.
    /// Returns whether the pose was applied.
    pub fn submit_pose<W: ObjectWorld>(
        &mut self,
        world: &mut W,
        requester: &ParticipantId,
        pose: Pose,
    ) -> bool {
        if !self.grant().is_held_by(requester) {
            trace!(
                "dropping pose for {} from {}, not the holder",
                self.object,
                requester
            );
            return false;
        }

        world.move_object(&self.object, &pose);
        self.write(|state| state.pose = pose);
        true
    }

    /// Teardown for a participant whose connection ended. Exactly the same
    /// transition as a release request from that participant.
    pub fn holder_disconnected<W: ObjectWorld>(
        &mut self,
        world: &mut W,
        participant: &ParticipantId,
    ) -> bool {
        self.request_release(world, participant)
    }

    /// Pull the simulated pose of a free object into the replicated state.
    /// Held objects are only moved by submissions, so they are skipped.
    /// Returns whether the replicated pose changed.
    pub fn sync_pose<W: ObjectWorld>(&mut self, world: &W, epsilon: f32) -> bool {
        if self.state.kinematic {
            return false;
        }
        let Some(pose) = world.object_pose(&self.object) else {
            return false;
        };
        if pose.approx_eq(&self.state.pose, epsilon) {
            return false;
        }
        self.write(|state| state.pose = pose);
        true
    }

    pub(crate) fn take_update(&mut self) -> Option<(Sequence, ObjectState)> {
        self.state.take_update()
    }

    fn write(&mut self, mutate: impl FnOnce(&mut ObjectState)) {
        let mut next = *self.state.get();
        mutate(&mut next);
        if let Err(error) = self.state.try_set(Writer::Server, next) {
            warn!("failed to write state of {}: {}", self.object, error);
        }
    }
}
