use tandem_shared::{
    GrantState, GrantStatus, HostType, ObjectState, ParticipantId, Property, PropertyError,
    Sequence, Writer,
};

/// Read-only view of a shared object, plus whether this client has a grab
/// request in flight for it
pub(crate) struct ObjectView {
    state: Property<ObjectState>,
    // grant epoch observed when the pending grab was sent
    requested_at: Option<u32>,
}

impl ObjectView {
    pub fn new(host: HostType, sequence: Sequence, state: ObjectState) -> Self {
        Self {
            state: Property::remote_owned(state, Writer::Server, host, sequence),
            requested_at: None,
        }
    }

    pub fn state(&self) -> &ObjectState {
        self.state.get()
    }

    pub fn grant(&self) -> GrantState {
        self.state.grant
    }

    pub fn grant_status(&self, local: &ParticipantId) -> GrantStatus {
        GrantStatus::observe(&self.state.grant, local, self.requested_at.is_some())
    }

    /// A grab request is going out now
    pub fn mark_requested(&mut self) {
        self.requested_at = Some(self.state.grant_epoch);
    }

    pub fn clear_requested(&mut self) {
        self.requested_at = None;
    }

    /// Mirror a replicated state. Returns the previous grant if this update
    /// changed it.
    pub fn receive(
        &mut self,
        sequence: Sequence,
        state: ObjectState,
    ) -> Result<Option<GrantState>, PropertyError> {
        let previous = self.grant();
        if !self.state.try_mirror(sequence, state)? {
            return Ok(None);
        }
        // a grant transition after the request means the server has
        // evaluated it, whether or not the grant we see now differs
        if self.requested_at != Some(self.state.grant_epoch) {
            self.requested_at = None;
        }
        if previous == self.grant() {
            return Ok(None);
        }
        Ok(Some(previous))
    }
}
