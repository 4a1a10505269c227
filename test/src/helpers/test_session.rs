use std::collections::BTreeMap;

use log::debug;

use tandem_client::{Client, ClientConfig};
use tandem_server::{Server, ServerConfig, ServerError, ServerEvents};
use tandem_shared::{EntityKey, ObjectKey, ParticipantId, Pose};

use crate::{LinkConditioner, LinkConditionerConfig, LocalTransportPair, TestClient, TestWorld};

/// Physics step used by [`TestSession::tick_and_exchange`], 72 Hz
pub const TICK_DT: f32 = 1.0 / 72.0;

/// One server, its physics world, and any number of clients wired to it in
/// memory. Every step is explicit so tests control delivery order.
pub struct TestSession {
    pub server: Server,
    pub world: TestWorld,
    clients: BTreeMap<ParticipantId, TestClient>,
    client_config: ClientConfig,
}

impl Default for TestSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default(), ClientConfig::default())
    }

    pub fn with_config(server_config: ServerConfig, client_config: ClientConfig) -> Self {
        Self {
            server: Server::new(server_config),
            world: TestWorld::new(),
            clients: BTreeMap::new(),
            client_config,
        }
    }

    // Participants

    pub fn connect(&mut self, id: u64) -> Result<ParticipantId, ServerError> {
        self.connect_over(id, LocalTransportPair::new())
    }

    /// Connect over a link that loses field updates on the way to the client
    pub fn connect_lossy(
        &mut self,
        id: u64,
        config: LinkConditionerConfig,
    ) -> Result<(ParticipantId, LinkConditioner), ServerError> {
        let (transport, conditioner) = LocalTransportPair::conditioned(config);
        let participant = self.connect_over(id, transport)?;
        Ok((participant, conditioner))
    }

    fn connect_over(
        &mut self,
        id: u64,
        transport: LocalTransportPair,
    ) -> Result<ParticipantId, ServerError> {
        let participant = ParticipantId::new(id);
        let (test_client, server_sender) =
            TestClient::new(self.client_config.clone(), participant, transport);
        self.server.connect_participant(participant, server_sender)?;
        self.clients.insert(participant, test_client);
        debug!("test session connected {}", participant);
        Ok(participant)
    }

    /// Tear down both sides of `participant`'s connection
    pub fn disconnect(&mut self, participant: &ParticipantId) {
        if let Some(mut test_client) = self.clients.remove(participant) {
            test_client.client.disconnect();
        }
        self.server
            .disconnect_participant(&mut self.world, participant);
    }

    pub fn client(&self, participant: &ParticipantId) -> &Client {
        &self.test_client(participant).client
    }

    pub fn client_mut(&mut self, participant: &ParticipantId) -> &mut Client {
        &mut self.test_client_mut(participant).client
    }

    pub fn test_client(&self, participant: &ParticipantId) -> &TestClient {
        match self.clients.get(participant) {
            Some(test_client) => test_client,
            None => panic!("{} is not connected to the test session", participant),
        }
    }

    pub fn test_client_mut(&mut self, participant: &ParticipantId) -> &mut TestClient {
        match self.clients.get_mut(participant) {
            Some(test_client) => test_client,
            None => panic!("{} is not connected to the test session", participant),
        }
    }

    pub fn entity_of(&self, participant: &ParticipantId) -> EntityKey {
        match self.server.participant_entity(participant) {
            Some(entity) => entity,
            None => panic!("{} has no entity", participant),
        }
    }

    // World

    pub fn spawn_object(&mut self, pose: Pose) -> ObjectKey {
        let object = self.server.spawn_object(pose);
        self.world.insert(object, pose);
        object
    }

    // Packet exchange

    /// Clients hand their queued messages to the transport, in id order
    pub fn flush_clients(&mut self) {
        let order: Vec<ParticipantId> = self.clients.keys().copied().collect();
        self.flush_clients_in_order(&order);
    }

    /// Clients hand their queued messages to the transport, in the given
    /// order. The server receives them in that same order.
    pub fn flush_clients_in_order(&mut self, order: &[ParticipantId]) {
        for participant in order {
            if let Some(test_client) = self.clients.get_mut(participant) {
                test_client.flush();
            }
        }
        for participant in order {
            if let Some(test_client) = self.clients.get_mut(participant) {
                self.server
                    .receive(participant, test_client.server_receiver());
            }
        }
    }

    /// Server evaluates its queue, then flushes updates to every client
    pub fn server_tick(&mut self) -> ServerEvents {
        let events = self.server.process(&mut self.world);
        self.server.send_all_updates();
        events
    }

    /// Every client applies whatever the server sent
    pub fn deliver_to_clients(&mut self) {
        for test_client in self.clients.values_mut() {
            test_client.deliver();
        }
    }

    /// One full round trip: clients to server, server tick, server to clients
    pub fn exchange_packets(&mut self) -> ServerEvents {
        self.flush_clients();
        let events = self.server_tick();
        self.deliver_to_clients();
        events
    }

    pub fn exchange_packets_n_times(&mut self, n: usize) {
        for _ in 0..n {
            self.exchange_packets();
        }
    }

    /// Advance physics by one tick, exchange packets, then render every
    /// client for the same duration
    pub fn tick_and_exchange(&mut self) -> ServerEvents {
        self.world.step(TICK_DT);
        let events = self.exchange_packets();
        for test_client in self.clients.values_mut() {
            test_client.client.render(TICK_DT);
        }
        events
    }
}
