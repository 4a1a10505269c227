use std::{
    collections::{BTreeMap, VecDeque},
    mem,
};

use log::{debug, info, trace, warn};

use tandem_shared::{
    transport::{PacketReceiver, PacketSender},
    ClientMessage, EntityKey, GrantStatus, HostType, ObjectKey, ObjectState, ParticipantId, Pose,
    Sequence, ServerMessage,
};

use crate::{
    world::{
        local_avatar::LocalAvatar, object_view::ObjectView, remote_entity::RemoteEntityView,
    },
    ClientConfig, ClientError, ClientEvents, PoseSource,
};

/// One participant's side of a session.
///
/// The client never decides anything about shared objects. Gestures become
/// one-way requests, and the outcome is read back from the replicated object
/// state once the server has evaluated them.
pub struct Client {
    config: ClientConfig,
    local_id: ParticipantId,
    connected: bool,
    local_avatar: Option<LocalAvatar>,
    remote_entities: BTreeMap<EntityKey, RemoteEntityView>,
    objects: BTreeMap<ObjectKey, ObjectView>,
    outgoing: VecDeque<ClientMessage>,
    incoming_events: ClientEvents,
}

impl Client {
    /// Create a client for a participant the session layer has just
    /// connected as `local_id`
    pub fn new(config: ClientConfig, local_id: ParticipantId) -> Self {
        Self {
            config,
            local_id,
            connected: true,
            local_avatar: None,
            remote_entities: BTreeMap::new(),
            objects: BTreeMap::new(),
            outgoing: VecDeque::new(),
            incoming_events: ClientEvents::new(),
        }
    }

    pub fn local_id(&self) -> ParticipantId {
        self.local_id
    }

    /// Clients never hold the authoritative role
    pub fn host_type(&self) -> HostType {
        HostType::Client
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// The local avatar, once the server has announced it
    pub fn local_entity(&self) -> Option<EntityKey> {
        self.local_avatar.as_ref().map(|avatar| avatar.key())
    }

    /// The session ended. Every replicated view is cleared and further
    /// gestures are ignored.
    pub fn disconnect(&mut self) {
        if !self.connected {
            return;
        }
        self.connected = false;
        self.local_avatar = None;
        self.remote_entities.clear();
        self.objects.clear();
        self.outgoing.clear();
        info!("{} disconnected", self.local_id);
    }

    // Incoming

    /// Apply one replicated update from the server
    pub fn receive_message(&mut self, message: ServerMessage) {
        if !self.connected {
            trace!("dropping {}, not connected", message.name());
            return;
        }

        match message {
            ServerMessage::SpawnEntity {
                entity,
                owner,
                sequence,
                pose,
            } => self.spawn_entity(entity, owner, sequence, pose),
            ServerMessage::DespawnEntity { entity } => self.despawn_entity(&entity),
            ServerMessage::EntityPose {
                entity,
                sequence,
                pose,
            } => {
                let Some(view) = self.remote_entities.get_mut(&entity) else {
                    debug!("pose for unknown {}, ignoring", entity);
                    return;
                };
                match view.receive(sequence, pose) {
                    Ok(true) => {}
                    Ok(false) => trace!("stale pose {} for {}, ignoring", sequence, entity),
                    Err(error) => warn!("dropping pose for {}: {}", entity, error),
                }
            }
            ServerMessage::SpawnObject {
                object,
                sequence,
                state,
            } => {
                if self.objects.contains_key(&object) {
                    warn!("{} announced twice, ignoring", object);
                    return;
                }
                let host = self.host_type();
                self.objects
                    .insert(object, ObjectView::new(host, sequence, state));
                self.incoming_events.push_object_spawn(&object);
            }
            ServerMessage::ObjectState {
                object,
                sequence,
                state,
            } => {
                let Some(view) = self.objects.get_mut(&object) else {
                    debug!("state for unknown {}, ignoring", object);
                    return;
                };
                match view.receive(sequence, state) {
                    Ok(Some(previous)) => {
                        debug!(
                            "{} went {} -> {}",
                            object,
                            previous.name(),
                            view.grant().name()
                        );
                        self.incoming_events
                            .push_grant_change(&object, previous, view.grant());
                    }
                    Ok(None) => {}
                    Err(error) => warn!("dropping state for {}: {}", object, error),
                }
            }
        }
    }

    /// Apply everything currently readable on `receiver`, then return the
    /// events it produced
    pub fn receive(&mut self, receiver: &mut dyn PacketReceiver<ServerMessage>) -> ClientEvents {
        loop {
            match receiver.receive() {
                Ok(Some(message)) => self.receive_message(message),
                Ok(None) => break,
                Err(error) => {
                    warn!("stopped receiving: {}", error);
                    break;
                }
            }
        }
        self.take_events()
    }

    pub fn take_events(&mut self) -> ClientEvents {
        mem::take(&mut self.incoming_events)
    }

    // Avatars

    /// Sample `source` and publish the floor-locked result as the local
    /// avatar pose. Skipped, returning `false`, before the avatar has been
    /// announced or while tracking is unavailable.
    pub fn publish_local_pose(&mut self, source: &mut dyn PoseSource) -> bool {
        if !self.connected {
            return false;
        }
        let Some(avatar) = self.local_avatar.as_mut() else {
            trace!("local avatar not registered yet, skipping publish");
            return false;
        };
        let Some(tracked) = source.sample() else {
            trace!("tracking unavailable, skipping publish");
            return false;
        };
        match avatar.publish(&self.local_id, &tracked) {
            Ok(_) => true,
            Err(error) => {
                warn!("failed to publish local pose: {}", error);
                false
            }
        }
    }

    /// Advance every remote avatar toward its latest replicated pose
    pub fn render(&mut self, dt: f32) {
        let rate = self.config.interpolation_rate;
        for view in self.remote_entities.values_mut() {
            view.render(dt, rate);
        }
    }

    /// What should be drawn for `entity` right now. The local avatar shows
    /// the pose last published, everyone else the interpolated one.
    pub fn displayed_pose(&self, entity: &EntityKey) -> Option<Pose> {
        if let Some(avatar) = &self.local_avatar {
            if avatar.key() == *entity {
                return Some(*avatar.pose());
            }
        }
        self.remote_entities
            .get(entity)
            .map(|view| *view.displayed())
    }

    /// Latest replicated pose of `entity`, before interpolation
    pub fn replicated_pose(&self, entity: &EntityKey) -> Option<Pose> {
        if let Some(avatar) = &self.local_avatar {
            if avatar.key() == *entity {
                return Some(*avatar.pose());
            }
        }
        self.remote_entities.get(entity).map(|view| *view.target())
    }

    pub fn entity_owner(&self, entity: &EntityKey) -> Option<ParticipantId> {
        if let Some(avatar) = &self.local_avatar {
            if avatar.key() == *entity {
                return Some(self.local_id);
            }
        }
        self.remote_entities.get(entity).map(|view| view.owner())
    }

    /// Every avatar this client knows about, its own included
    pub fn entities(&self) -> impl Iterator<Item = EntityKey> + '_ {
        self.local_avatar
            .iter()
            .map(|avatar| avatar.key())
            .chain(self.remote_entities.keys().copied())
    }

    // Objects

    /// Manipulation gesture started. Any connected participant may ask for
    /// any object; the server decides. Ignored while disconnected or for an
    /// object that was never announced.
    pub fn begin_grab(&mut self, object: &ObjectKey) {
        if let Err(error) = self.try_begin_grab(object) {
            debug!("ignoring grab gesture: {}", error);
        }
    }

    pub fn try_begin_grab(&mut self, object: &ObjectKey) -> Result<(), ClientError> {
        self.check_connected("begin_grab")?;
        let view = self
            .objects
            .get_mut(object)
            .ok_or(ClientError::ObjectNotFound {
                object: *object,
                operation: "begin_grab",
            })?;
        if view.grant().is_free() {
            view.mark_requested();
        }
        self.outgoing
            .push_back(ClientMessage::RequestGrab { object: *object });
        Ok(())
    }

    /// Manipulation gesture ended. Ignored while disconnected or for an
    /// object that was never announced.
    pub fn end_grab(&mut self, object: &ObjectKey) {
        if let Err(error) = self.try_end_grab(object) {
            debug!("ignoring release gesture: {}", error);
        }
    }

    pub fn try_end_grab(&mut self, object: &ObjectKey) -> Result<(), ClientError> {
        self.check_connected("end_grab")?;
        let view = self
            .objects
            .get_mut(object)
            .ok_or(ClientError::ObjectNotFound {
                object: *object,
                operation: "end_grab",
            })?;
        view.clear_requested();
        self.outgoing
            .push_back(ClientMessage::RequestRelease { object: *object });
        Ok(())
    }

    /// Called every physics tick with the pose of the interactor currently
    /// selecting `object`. Sent only while the replicated grant names this
    /// client; otherwise, or without a pose, nothing goes out this tick.
    pub fn submit_hand_pose(&mut self, object: &ObjectKey, hand: Option<Pose>) -> bool {
        if !self.connected {
            return false;
        }
        let Some(view) = self.objects.get(object) else {
            return false;
        };
        if !view.grant().is_held_by(&self.local_id) {
            return false;
        }
        let Some(pose) = hand else {
            return false;
        };
        self.outgoing
            .push_back(ClientMessage::SubmitPose {
                object: *object,
                pose,
            });
        true
    }

    pub fn grant_status(&self, object: &ObjectKey) -> Option<GrantStatus> {
        self.objects
            .get(object)
            .map(|view| view.grant_status(&self.local_id))
    }

    pub fn object_state(&self, object: &ObjectKey) -> Option<&ObjectState> {
        self.objects.get(object).map(|view| view.state())
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectKey> + '_ {
        self.objects.keys().copied()
    }

    // Outgoing

    /// Everything waiting to be sent, in order. Gestures and hand poses come
    /// first, then the local avatar pose if it changed since the last call.
    pub fn take_outgoing(&mut self) -> Vec<ClientMessage> {
        if let Some(avatar) = self.local_avatar.as_mut() {
            if let Some((sequence, pose)) = avatar.take_update() {
                self.outgoing.push_back(ClientMessage::EntityPose {
                    entity: avatar.key(),
                    sequence,
                    pose,
                });
            }
        }
        self.outgoing.drain(..).collect()
    }

    /// Hand every outgoing message to `sender`. Returns how many were sent.
    pub fn send_all_updates(&mut self, sender: &dyn PacketSender<ClientMessage>) -> usize {
        let messages = self.take_outgoing();
        let total = messages.len();
        let mut sent = 0;
        for message in messages {
            trace!("sending {}", message.name());
            if let Err(error) = sender.send(message) {
                warn!("dropping {} outgoing message(s): {}", total - sent, error);
                break;
            }
            sent += 1;
        }
        sent
    }

    // Private methods

    fn check_connected(&self, operation: &'static str) -> Result<(), ClientError> {
        if self.connected {
            Ok(())
        } else {
            Err(ClientError::NotConnected { operation })
        }
    }

    fn spawn_entity(
        &mut self,
        entity: EntityKey,
        owner: ParticipantId,
        sequence: Sequence,
        pose: Pose,
    ) {
        if self.local_entity() == Some(entity) || self.remote_entities.contains_key(&entity) {
            warn!("{} announced twice, ignoring", entity);
            return;
        }
        let host = self.host_type();

        if owner == self.local_id {
            if let Some(existing) = &self.local_avatar {
                warn!(
                    "server announced {} for {}, which already owns {}",
                    entity,
                    owner,
                    existing.key()
                );
                return;
            }
            self.local_avatar = Some(LocalAvatar::new(entity, owner, host, sequence, pose));
            info!("{} registered as local avatar", entity);
            self.incoming_events.push_local_registration(&entity);
        } else {
            self.remote_entities
                .insert(entity, RemoteEntityView::new(owner, host, sequence, pose));
        }
        self.incoming_events.push_entity_spawn(&entity, &owner);
    }

    fn despawn_entity(&mut self, entity: &EntityKey) {
        if self.local_entity() == Some(*entity) {
            self.local_avatar = None;
        } else if self.remote_entities.remove(entity).is_none() {
            debug!("despawn of unknown {}, ignoring", entity);
            return;
        }
        self.incoming_events.push_entity_despawn(entity);
    }
}
