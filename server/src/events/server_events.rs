use std::{mem, vec::IntoIter};

use tandem_shared::{EntityKey, ObjectKey, ParticipantId};

/// Everything that happened on the server since the last call to
/// [`Server::process`](crate::Server::process).
///
/// Read with `events.read::<SomeEvent>()`, which drains that kind of event.
pub struct ServerEvents {
    connections: Vec<(ParticipantId, EntityKey)>,
    disconnections: Vec<(ParticipantId, EntityKey)>,
    object_spawns: Vec<ObjectKey>,
    grabs: Vec<(ObjectKey, ParticipantId)>,
    releases: Vec<(ObjectKey, ParticipantId)>,
    empty: bool,
}

impl Default for ServerEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            object_spawns: Vec::new(),
            grabs: Vec::new(),
            releases: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ServerEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ServerEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, participant: &ParticipantId, entity: &EntityKey) {
        self.connections.push((*participant, *entity));
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, participant: &ParticipantId, entity: &EntityKey) {
        self.disconnections.push((*participant, *entity));
        self.empty = false;
    }

    pub(crate) fn push_object_spawn(&mut self, object: &ObjectKey) {
        self.object_spawns.push(*object);
        self.empty = false;
    }

    pub(crate) fn push_grab(&mut self, object: &ObjectKey, holder: &ParticipantId) {
        self.grabs.push((*object, *holder));
        self.empty = false;
    }

    pub(crate) fn push_release(&mut self, object: &ObjectKey, former_holder: &ParticipantId) {
        self.releases.push((*object, *former_holder));
        self.empty = false;
    }
}

// Event Trait
pub trait ServerEvent {
    type Iter;

    fn iter(events: &mut ServerEvents) -> Self::Iter;

    fn has(events: &ServerEvents) -> bool;
}

/// A participant was admitted; yields `(participant, its entity)`
pub struct ConnectEvent;
impl ServerEvent for ConnectEvent {
    type Iter = IntoIter<(ParticipantId, EntityKey)>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        mem::take(&mut events.connections).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.connections.is_empty()
    }
}

/// A participant left; yields `(participant, its despawned entity)`
pub struct DisconnectEvent;
impl ServerEvent for DisconnectEvent {
    type Iter = IntoIter<(ParticipantId, EntityKey)>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        mem::take(&mut events.disconnections).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.disconnections.is_empty()
    }
}

pub struct SpawnObjectEvent;
impl ServerEvent for SpawnObjectEvent {
    type Iter = IntoIter<ObjectKey>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        mem::take(&mut events.object_spawns).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.object_spawns.is_empty()
    }
}

/// An object went `Free -> Held`; yields `(object, holder)`
pub struct GrabEvent;
impl ServerEvent for GrabEvent {
    type Iter = IntoIter<(ObjectKey, ParticipantId)>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        mem::take(&mut events.grabs).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.grabs.is_empty()
    }
}

/// An object went `Held -> Free`, by request or by the holder disconnecting;
/// yields `(object, former holder)`
pub struct ReleaseEvent;
impl ServerEvent for ReleaseEvent {
    type Iter = IntoIter<(ObjectKey, ParticipantId)>;

    fn iter(events: &mut ServerEvents) -> Self::Iter {
        mem::take(&mut events.releases).into_iter()
    }

    fn has(events: &ServerEvents) -> bool {
        !events.releases.is_empty()
    }
}
