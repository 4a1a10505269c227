use std::{
    collections::{BTreeMap, VecDeque},
    mem,
    num::NonZeroUsize,
};

use log::{debug, info, trace, warn};

use tandem_shared::{
    transport::{PacketReceiver, PacketSender},
    ClientMessage, EntityKey, GrantState, HostType, KeyGenerator, ObjectKey, ObjectState, ParticipantId,
    Pose, ServerMessage,
};

use crate::{
    connection::connection::Connection,
    events::ServerEvents,
    user::Participant,
    world::{ownership_arbitrator::OwnershipArbitrator, replicated_entity::ReplicatedEntity},
    ObjectWorld, ServerConfig, ServerError,
};

/// The authoritative role of a session.
///
/// The server owns one inbound queue shared by every participant. Requests are
/// evaluated strictly in the order they were received, one at a time, and that
/// order is the only tie-break between concurrent requests.
pub struct Server {
    config: ServerConfig,
    participants: BTreeMap<ParticipantId, Participant>,
    entities: BTreeMap<EntityKey, ReplicatedEntity>,
    objects: BTreeMap<ObjectKey, OwnershipArbitrator>,
    entity_keys: KeyGenerator<EntityKey>,
    object_keys: KeyGenerator<ObjectKey>,
    inbound: VecDeque<(ParticipantId, ClientMessage)>,
    incoming_events: ServerEvents,
}

impl Server {
    /// Create a new Server
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            participants: BTreeMap::new(),
            entities: BTreeMap::new(),
            objects: BTreeMap::new(),
            entity_keys: KeyGenerator::new(),
            object_keys: KeyGenerator::new(),
            inbound: VecDeque::new(),
            incoming_events: ServerEvents::new(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The server always holds the authoritative role
    pub fn host_type(&self) -> HostType {
        HostType::Server
    }

    // Participants

    /// Admit a participant the session layer has already authenticated.
    ///
    /// Spawns its avatar entity, catches the newcomer up on every entity and
    /// object that already exists, and announces the new entity to everyone
    /// else. Everything is queued, and goes out on the next
    /// [`send_all_updates`](Self::send_all_updates).
    pub fn connect_participant(
        &mut self,
        participant: ParticipantId,
        sender: Box<dyn PacketSender<ServerMessage>>,
    ) -> Result<EntityKey, ServerError> {
        if self.participants.contains_key(&participant) {
            return Err(ServerError::ParticipantAlreadyConnected { participant });
        }

        let entity_key = self.entity_keys.generate();
        let entity = ReplicatedEntity::new(entity_key, participant, self.host_type());
        let mut connection = Connection::new(participant, sender);

        for existing in self.entities.values() {
            connection.queue(spawn_entity_message(existing));
        }
        for arbitrator in self.objects.values() {
            connection.queue(spawn_object_message(arbitrator));
        }

        let spawn = spawn_entity_message(&entity);
        for other in self.participants.values_mut() {
            other.connection_mut().queue(spawn.clone());
        }
        connection.queue(spawn);

        self.entities.insert(entity_key, entity);
        self.participants.insert(
            participant,
            Participant::new(participant, entity_key, connection),
        );

        info!("{} connected, avatar is {}", participant, entity_key);
        self.incoming_events
            .push_connection(&participant, &entity_key);

        Ok(entity_key)
    }

    /// Teardown for a connection that ended.
    ///
    /// Anything the participant sent that was not processed yet is discarded.
    /// Every grant it holds is released exactly as if it had asked to release,
    /// then its entity is despawned for everyone else. Unknown participants
    /// are ignored.
    pub fn disconnect_participant<W: ObjectWorld>(
        &mut self,
        world: &mut W,
        participant: &ParticipantId,
    ) {
        let Some(record) = self.participants.remove(participant) else {
            debug!("{} is not connected, nothing to tear down", participant);
            return;
        };

        let pending = self.inbound.len();
        self.inbound.retain(|(sender, _)| sender != participant);
        let discarded = pending - self.inbound.len();
        if discarded > 0 {
            debug!(
                "discarded {} unprocessed message(s) from {}",
                discarded, participant
            );
        }

        for arbitrator in self.objects.values_mut() {
            if arbitrator.holder_disconnected(world, participant) {
                self.incoming_events
                    .push_release(&arbitrator.object(), participant);
            }
        }

        let entity = record.entity();
        self.entities.remove(&entity);
        for other in self.participants.values_mut() {
            other
                .connection_mut()
                .queue(ServerMessage::DespawnEntity { entity });
        }

        info!("{} disconnected, {} despawned", participant, entity);
        self.incoming_events
            .push_disconnection(participant, &entity);
    }

    pub fn is_connected(&self, participant: &ParticipantId) -> bool {
        self.participants.contains_key(participant)
    }

    /// Connected participants, in id order
    pub fn participants(&self) -> impl Iterator<Item = ParticipantId> + '_ {
        self.participants.keys().copied()
    }

    /// The avatar entity owned by `participant`
    pub fn participant_entity(&self, participant: &ParticipantId) -> Option<EntityKey> {
        self.participants
            .get(participant)
            .map(|record| record.entity())
    }

    /// Returns an error if `participant` is not connected
    pub fn try_participant_entity(
        &self,
        participant: &ParticipantId,
    ) -> Result<EntityKey, ServerError> {
        self.participant_entity(participant)
            .ok_or(ServerError::ParticipantNotConnected {
                participant: *participant,
                operation: "participant_entity",
            })
    }

    // Entities

    /// Latest pose the owner of `entity` published
    pub fn entity_pose(&self, entity: &EntityKey) -> Option<&Pose> {
        self.entities.get(entity).map(|record| record.pose())
    }

    pub fn entity_owner(&self, entity: &EntityKey) -> Option<ParticipantId> {
        self.entities.get(entity).map(|record| record.owner())
    }

    // Objects

    /// World setup: create a shared object, free and under ambient physics
    pub fn spawn_object(&mut self, pose: Pose) -> ObjectKey {
        let object = self.object_keys.generate();
        let arbitrator = OwnershipArbitrator::new(object, pose, self.host_type());

        let spawn = spawn_object_message(&arbitrator);
        for participant in self.participants.values_mut() {
            participant.connection_mut().queue(spawn.clone());
        }

        self.objects.insert(object, arbitrator);
        info!("spawned {}", object);
        self.incoming_events.push_object_spawn(&object);

        object
    }

    pub fn object_state(&self, object: &ObjectKey) -> Option<&ObjectState> {
        self.objects.get(object).map(|arbitrator| arbitrator.state())
    }

    pub fn object_grant(&self, object: &ObjectKey) -> Option<GrantState> {
        self.objects.get(object).map(|arbitrator| arbitrator.grant())
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.objects.keys().copied()
    }

    // Messages

    /// Enqueue a message delivered by `sender`'s connection. Nothing is
    /// evaluated until [`process`](Self::process).
    pub fn receive_message(&mut self, sender: &ParticipantId, message: ClientMessage) {
        if !self.participants.contains_key(sender) {
            warn!(
                "dropping {} from {}, not connected",
                message.name(),
                sender
            );
            return;
        }
        trace!("queued {} from {}", message.name(), sender);
        self.inbound.push_back((*sender, message));
    }

    /// Drain everything currently readable on `receiver` into the inbound
    /// queue, tagged with `sender`
    pub fn receive(
        &mut self,
        sender: &ParticipantId,
        receiver: &mut dyn PacketReceiver<ClientMessage>,
    ) {
        loop {
            match receiver.receive() {
                Ok(Some(message)) => self.receive_message(sender, message),
                Ok(None) => break,
                Err(error) => {
                    warn!("stopped receiving from {}: {}", sender, error);
                    break;
                }
            }
        }
    }

    /// Messages received but not yet processed
    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    /// Evaluate queued requests in arrival order, then pull the simulated pose
    /// of every free object. Returns everything that happened since the
    /// previous call.
    pub fn process<W: ObjectWorld>(&mut self, world: &mut W) -> ServerEvents {
        let mut budget = self.config.inbound_budget.map(NonZeroUsize::get);
        while budget != Some(0) {
            let Some((sender, message)) = self.inbound.pop_front() else {
                break;
            };
            self.handle_message(world, &sender, message);
            if let Some(remaining) = budget.as_mut() {
                *remaining -= 1;
            }
        }

        let epsilon = self.config.pose_epsilon;
        for arbitrator in self.objects.values_mut() {
            arbitrator.sync_pose(world, epsilon);
        }

        mem::take(&mut self.incoming_events)
    }

    /// Queue every dirty replicated field for the participants that need it,
    /// then flush every connection. A field written several times since the
    /// previous call goes out once, with its latest value.
    pub fn send_all_updates(&mut self) {
        // (participant the update must not be echoed to, update)
        let mut updates: Vec<(Option<ParticipantId>, ServerMessage)> = Vec::new();

        for entity in self.entities.values_mut() {
            if let Some((sequence, pose)) = entity.take_update() {
                updates.push((
                    Some(entity.owner()),
                    ServerMessage::EntityPose {
                        entity: entity.key(),
                        sequence,
                        pose,
                    },
                ));
            }
        }
        for arbitrator in self.objects.values_mut() {
            if let Some((sequence, state)) = arbitrator.take_update() {
                updates.push((
                    None,
                    ServerMessage::ObjectState {
                        object: arbitrator.object(),
                        sequence,
                        state,
                    },
                ));
            }
        }

        for participant in self.participants.values_mut() {
            let id = participant.id();
            let connection = participant.connection_mut();
            for (skip, message) in &updates {
                if *skip == Some(id) {
                    continue;
                }
                connection.queue(message.clone());
            }
            if connection.has_outgoing() {
                connection.send_all();
            }
        }
    }

    // Private methods

    fn handle_message<W: ObjectWorld>(
        &mut self,
        world: &mut W,
        sender: &ParticipantId,
        message: ClientMessage,
    ) {
        match message {
            ClientMessage::EntityPose {
                entity,
                sequence,
                pose,
            } => {
                let Some(record) = self.entities.get_mut(&entity) else {
                    // a late update for an avatar that was just despawned
                    debug!(
                        "{}",
                        ServerError::EntityNotFound {
                            entity,
                            operation: "EntityPose",
                        }
                    );
                    return;
                };
                match record.try_receive_pose(sender, sequence, pose) {
                    Ok(true) => {}
                    Ok(false) => trace!(
                        "stale pose {} for {} from {}, ignoring",
                        sequence,
                        entity,
                        sender
                    ),
                    Err(error) => warn!(
                        "dropping pose for {} from {}: {}",
                        entity, sender, error
                    ),
                }
            }
            ClientMessage::RequestGrab { object } => {
                let Some(arbitrator) = self.objects.get_mut(&object) else {
                    warn!(
                        "{}",
                        ServerError::ObjectNotFound {
                            object,
                            operation: "RequestGrab",
                        }
                    );
                    return;
                };
                if arbitrator.request_grab(world, sender) {
                    self.incoming_events.push_grab(&object, sender);
                }
            }
            ClientMessage::RequestRelease { object } => {
                let Some(arbitrator) = self.objects.get_mut(&object) else {
                    warn!(
                        "{}",
                        ServerError::ObjectNotFound {
                            object,
                            operation: "RequestRelease",
                        }
                    );
                    return;
                };
                if arbitrator.request_release(world, sender) {
                    self.incoming_events.push_release(&object, sender);
                }
            }
            ClientMessage::SubmitPose { object, pose } => {
                let Some(arbitrator) = self.objects.get_mut(&object) else {
                    warn!(
                        "{}",
                        ServerError::ObjectNotFound {
                            object,
                            operation: "SubmitPose",
                        }
                    );
                    return;
                };
                arbitrator.submit_pose(world, sender, pose);
            }
        }
    }
}

fn spawn_entity_message(entity: &ReplicatedEntity) -> ServerMessage {
    ServerMessage::SpawnEntity {
        entity: entity.key(),
        owner: entity.owner(),
        sequence: entity.sequence(),
        pose: *entity.pose(),
    }
}

fn spawn_object_message(arbitrator: &OwnershipArbitrator) -> ServerMessage {
    ServerMessage::SpawnObject {
        object: arbitrator.object(),
        sequence: arbitrator.sequence(),
        state: *arbitrator.state(),
    }
}
