use tandem_shared::{EntityKey, ParticipantId};

use crate::connection::connection::Connection;

/// A connected participant, as the server sees it
pub(crate) struct Participant {
    id: ParticipantId,
    entity: EntityKey,
    connection: Connection,
}

impl Participant {
    pub fn new(id: ParticipantId, entity: EntityKey, connection: Connection) -> Self {
        Self {
            id,
            entity,
            connection,
        }
    }

    pub fn id(&self) -> ParticipantId {
        self.id
    }

    /// The Replicated Entity this participant owns
    pub fn entity(&self) -> EntityKey {
        self.entity
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.connection
    }
}
