use std::{mem, vec::IntoIter};

use tandem_shared::{EntityKey, GrantState, ObjectKey, ParticipantId};

/// Everything the replicated state told this client since the events were
/// last taken. Read with `events.read::<SomeEvent>()`.
pub struct ClientEvents {
    entity_spawns: Vec<(EntityKey, ParticipantId)>,
    entity_despawns: Vec<EntityKey>,
    local_registrations: Vec<EntityKey>,
    object_spawns: Vec<ObjectKey>,
    grant_changes: Vec<(ObjectKey, GrantState, GrantState)>,
    empty: bool,
}

impl Default for ClientEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            entity_spawns: Vec::new(),
            entity_despawns: Vec::new(),
            local_registrations: Vec::new(),
            object_spawns: Vec::new(),
            grant_changes: Vec::new(),
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    pub(crate) fn push_entity_spawn(&mut self, entity: &EntityKey, owner: &ParticipantId) {
        self.entity_spawns.push((*entity, *owner));
        self.empty = false;
    }

    pub(crate) fn push_entity_despawn(&mut self, entity: &EntityKey) {
        self.entity_despawns.push(*entity);
        self.empty = false;
    }

    pub(crate) fn push_local_registration(&mut self, entity: &EntityKey) {
        self.local_registrations.push(*entity);
        self.empty = false;
    }

    pub(crate) fn push_object_spawn(&mut self, object: &ObjectKey) {
        self.object_spawns.push(*object);
        self.empty = false;
    }

    pub(crate) fn push_grant_change(
        &mut self,
        object: &ObjectKey,
        previous: GrantState,
        current: GrantState,
    ) {
        self.grant_changes.push((*object, previous, current));
        self.empty = false;
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

/// Yields `(entity, owner)` for every avatar the server announced,
/// including this client's own
pub struct EntitySpawnEvent;
impl ClientEvent for EntitySpawnEvent {
    type Iter = IntoIter<(EntityKey, ParticipantId)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        mem::take(&mut events.entity_spawns).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.entity_spawns.is_empty()
    }
}

pub struct EntityDespawnEvent;
impl ClientEvent for EntityDespawnEvent {
    type Iter = IntoIter<EntityKey>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        mem::take(&mut events.entity_despawns).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.entity_despawns.is_empty()
    }
}

/// The server announced this client's own avatar; publishing may start
pub struct LocalEntityRegisteredEvent;
impl ClientEvent for LocalEntityRegisteredEvent {
    type Iter = IntoIter<EntityKey>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        mem::take(&mut events.local_registrations).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.local_registrations.is_empty()
    }
}

pub struct ObjectSpawnEvent;
impl ClientEvent for ObjectSpawnEvent {
    type Iter = IntoIter<ObjectKey>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        mem::take(&mut events.object_spawns).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.object_spawns.is_empty()
    }
}

/// Yields `(object, previous grant, current grant)`
pub struct GrantChangeEvent;
impl ClientEvent for GrantChangeEvent {
    type Iter = IntoIter<(ObjectKey, GrantState, GrantState)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        mem::take(&mut events.grant_changes).into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.grant_changes.is_empty()
    }
}
