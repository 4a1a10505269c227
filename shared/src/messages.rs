use crate::{EntityKey, ObjectKey, ObjectState, ParticipantId, Pose, Sequence};

/// Messages a participant sends to the server role.
///
/// None of these expect a reply. The sender learns the outcome of a grab or
/// release by watching the replicated [`ObjectState`]. The requester identity
/// is never part of the payload: the server tags each message with the
/// participant whose connection delivered it.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientMessage {
    /// Latest value of the sender's own avatar pose
    EntityPose {
        entity: EntityKey,
        sequence: Sequence,
        pose: Pose,
    },
    /// Manipulation gesture started on `object`
    RequestGrab { object: ObjectKey },
    /// Manipulation gesture ended on `object`
    RequestRelease { object: ObjectKey },
    /// Hand pose that should drive `object` this physics tick
    SubmitPose { object: ObjectKey, pose: Pose },
}

impl ClientMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::EntityPose { .. } => "EntityPose",
            ClientMessage::RequestGrab { .. } => "RequestGrab",
            ClientMessage::RequestRelease { .. } => "RequestRelease",
            ClientMessage::SubmitPose { .. } => "SubmitPose",
        }
    }
}

/// Messages the server role sends to each participant
#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// A Replicated Entity came into existence. If `owner` is the receiving
    /// participant, this is its own avatar and it may start publishing.
    SpawnEntity {
        entity: EntityKey,
        owner: ParticipantId,
        sequence: Sequence,
        pose: Pose,
    },
    DespawnEntity { entity: EntityKey },
    EntityPose {
        entity: EntityKey,
        sequence: Sequence,
        pose: Pose,
    },
    SpawnObject {
        object: ObjectKey,
        sequence: Sequence,
        state: ObjectState,
    },
    ObjectState {
        object: ObjectKey,
        sequence: Sequence,
        state: ObjectState,
    },
}

impl ServerMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ServerMessage::SpawnEntity { .. } => "SpawnEntity",
            ServerMessage::DespawnEntity { .. } => "DespawnEntity",
            ServerMessage::EntityPose { .. } => "EntityPose",
            ServerMessage::SpawnObject { .. } => "SpawnObject",
            ServerMessage::ObjectState { .. } => "ObjectState",
        }
    }

    /// Field updates carry only a latest value and may be dropped by the
    /// transport. Everything else must be delivered.
    pub fn is_field_update(&self) -> bool {
        matches!(
            self,
            ServerMessage::EntityPose { .. } | ServerMessage::ObjectState { .. }
        )
    }
}
