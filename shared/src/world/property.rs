use std::{fmt, ops::Deref};

use thiserror::Error;

use crate::{next_sequence, sequence_greater_than, HostType, ParticipantId, Sequence};

/// Identity of whoever is allowed to write a [`Property`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Writer {
    Server,
    Participant(ParticipantId),
}

impl Writer {
    /// Which side of the session performs writes as this identity
    pub fn host_type(&self) -> HostType {
        match self {
            Writer::Server => HostType::Server,
            Writer::Participant(_) => HostType::Client,
        }
    }
}

impl fmt::Display for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Writer::Server => write!(f, "server"),
            Writer::Participant(participant) => write!(f, "{}", participant),
        }
    }
}

/// Errors that can occur during Property operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Attempted an operation the Property's role does not support
    #[error("{property_type} Property should never {operation}")]
    InvalidOperation {
        property_type: &'static str,
        operation: &'static str,
    },

    /// Attempted to write a Property from the wrong side of the session
    #[error("Property held by the {host} cannot accept {operation} from {writer}, which writes from the {writer_host}")]
    WrongHost {
        operation: &'static str,
        host: HostType,
        writer: Writer,
        writer_host: HostType,
    },

    /// Attempted to write a Property without being its owner
    #[error("Must own Property before {operation}. Owner: {owner}, attempted by: {writer}")]
    InsufficientAuthority {
        operation: &'static str,
        owner: Writer,
        writer: Writer,
    },
}

#[derive(Clone)]
enum PropertyImpl<T: Clone> {
    HostOwned(HostOwnedProperty<T>),
    Relayed(RelayedProperty<T>),
    RemoteOwned(RemoteOwnedProperty<T>),
}

impl<T: Clone> PropertyImpl<T> {
    fn name(&self) -> &'static str {
        match self {
            PropertyImpl::HostOwned(_) => "HostOwned",
            PropertyImpl::Relayed(_) => "Relayed",
            PropertyImpl::RemoteOwned(_) => "RemoteOwned",
        }
    }
}

/// A single-writer replicated value.
///
/// Every copy of a field knows who its one authorized writer is. The writer's
/// own process holds a `HostOwned` copy, the server holds a `Relayed` copy of
/// participant-owned fields so it can forward them, and every other reader
/// holds a `RemoteOwned` mirror. Updates are stamped with a wrapping
/// [`Sequence`]; mirrors only ever move forward, so duplicated or reordered
/// deliveries of an older value are ignored.
///
/// Each copy also knows which side of the session holds it. A write is
/// checked against both the owner's identity and that side: local writes must
/// come from the same side, relayed ones from the other.
#[derive(Clone)]
pub struct Property<T: Clone> {
    owner: Writer,
    host: HostType,
    inner: PropertyImpl<T>,
}

impl<T: Clone> Property<T> {
    /// Create the writer-side copy of a field, held by `host`
    pub fn host_owned(value: T, owner: Writer, host: HostType) -> Self {
        Self {
            owner,
            host,
            inner: PropertyImpl::HostOwned(HostOwnedProperty::new(value)),
        }
    }

    /// Create the forwarding copy of a field written on the other side of
    /// the session, held by `host`
    pub fn relayed(value: T, owner: Writer, host: HostType) -> Self {
        Self {
            owner,
            host,
            inner: PropertyImpl::Relayed(RelayedProperty::new(value)),
        }
    }

    /// Create a read-only mirror held by `host`, initialized from a snapshot
    /// taken at `sequence`
    pub fn remote_owned(value: T, owner: Writer, host: HostType, sequence: Sequence) -> Self {
        Self {
            owner,
            host,
            inner: PropertyImpl::RemoteOwned(RemoteOwnedProperty::new(value, sequence)),
        }
    }

    /// Continue numbering from `sequence`, so that the next write is newer
    /// than a snapshot the readers already hold
    pub fn starting_at(mut self, sequence: Sequence) -> Self {
        match &mut self.inner {
            PropertyImpl::HostOwned(inner) => inner.sequence = sequence,
            PropertyImpl::Relayed(inner) => inner.sequence = sequence,
            PropertyImpl::RemoteOwned(inner) => inner.sequence = sequence,
        }
        self
    }

    pub fn owner(&self) -> Writer {
        self.owner
    }

    /// Side of the session holding this copy
    pub fn host_type(&self) -> HostType {
        self.host
    }

    pub fn get(&self) -> &T {
        match &self.inner {
            PropertyImpl::HostOwned(inner) => &inner.value,
            PropertyImpl::Relayed(inner) => &inner.value,
            PropertyImpl::RemoteOwned(inner) => &inner.value,
        }
    }

    /// Sequence of the value currently held
    pub fn sequence(&self) -> Sequence {
        match &self.inner {
            PropertyImpl::HostOwned(inner) => inner.sequence,
            PropertyImpl::Relayed(inner) => inner.sequence,
            PropertyImpl::RemoteOwned(inner) => inner.sequence,
        }
    }

    /// Whether a value has been written that has not yet been taken for
    /// sending
    pub fn is_dirty(&self) -> bool {
        match &self.inner {
            PropertyImpl::HostOwned(inner) => inner.dirty,
            PropertyImpl::Relayed(inner) => inner.dirty,
            PropertyImpl::RemoteOwned(_) => false,
        }
    }

    /// Write a new value as `writer`.
    ///
    /// # Panics
    ///
    /// Panics if `writer` is not the owner, or if this is not the writer-side
    /// copy. Consider using `try_set` for non-panicking error handling.
    pub fn set(&mut self, writer: Writer, value: T) {
        if let Err(error) = self.try_set(writer, value) {
            panic!("{}", error);
        }
    }

    /// Try to write a new value as `writer`.
    ///
    /// Returns an error if `writer` is not the owner or writes from another
    /// side than this copy's, or if this is a relayed or mirrored copy.
    pub fn try_set(&mut self, writer: Writer, value: T) -> Result<(), PropertyError> {
        self.check_authority(writer, "setting a Property")?;
        let host = self.host;
        match &mut self.inner {
            PropertyImpl::HostOwned(inner) => {
                check_host(host, writer, host, "a local write")?;
                inner.set(value);
                Ok(())
            }
            other => Err(PropertyError::InvalidOperation {
                property_type: other.name(),
                operation: "be set locally",
            }),
        }
    }

    /// Try to accept an update that arrived from `sender` over the network.
    ///
    /// Returns `Ok(true)` if the value was applied and is now pending to be
    /// forwarded, `Ok(false)` if it was older than what is already held.
    /// Returns an error if `sender` is not the owner, if `sender` writes from
    /// the same side as this copy, or if this is not a relayed copy.
    pub fn try_relay(
        &mut self,
        sender: Writer,
        sequence: Sequence,
        value: T,
    ) -> Result<bool, PropertyError> {
        self.check_authority(sender, "relaying a Property")?;
        let host = self.host;
        match &mut self.inner {
            PropertyImpl::Relayed(inner) => {
                check_host(host, sender, host.invert(), "a relayed update")?;
                Ok(inner.receive(sequence, value))
            }
            other => Err(PropertyError::InvalidOperation {
                property_type: other.name(),
                operation: "be relayed",
            }),
        }
    }

    /// Mirror an update received from the network.
    ///
    /// # Panics
    ///
    /// Panics if this is not a mirrored copy.
    /// Consider using `try_mirror` for non-panicking error handling.
    pub fn mirror(&mut self, sequence: Sequence, value: T) -> bool {
        match self.try_mirror(sequence, value) {
            Ok(applied) => applied,
            Err(error) => panic!("{}", error),
        }
    }

    /// Try to mirror an update received from the network.
    ///
    /// Returns `Ok(true)` if the value was applied, `Ok(false)` if it was
    /// stale. Returns an error on the writer-side or relayed copies, which
    /// never take values from the network this way.
    pub fn try_mirror(&mut self, sequence: Sequence, value: T) -> Result<bool, PropertyError> {
        match &mut self.inner {
            PropertyImpl::RemoteOwned(inner) => Ok(inner.mirror(sequence, value)),
            other => Err(PropertyError::InvalidOperation {
                property_type: other.name(),
                operation: "be mirrored",
            }),
        }
    }

    /// Takes the pending update, if any. Several writes between two calls
    /// collapse into the latest one.
    pub fn take_update(&mut self) -> Option<(Sequence, T)> {
        match &mut self.inner {
            PropertyImpl::HostOwned(inner) => inner.take_update(),
            PropertyImpl::Relayed(inner) => inner.take_update(),
            PropertyImpl::RemoteOwned(_) => None,
        }
    }

    fn check_authority(&self, writer: Writer, operation: &'static str) -> Result<(), PropertyError> {
        if writer != self.owner {
            return Err(PropertyError::InsufficientAuthority {
                operation,
                owner: self.owner,
                writer,
            });
        }
        Ok(())
    }
}

fn check_host(
    host: HostType,
    writer: Writer,
    expected: HostType,
    operation: &'static str,
) -> Result<(), PropertyError> {
    let writer_host = writer.host_type();
    if writer_host != expected {
        return Err(PropertyError::WrongHost {
            operation,
            host,
            writer,
            writer_host,
        });
    }
    Ok(())
}

impl<T: Clone> Deref for Property<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

// HostOwnedProperty
#[derive(Clone)]
struct HostOwnedProperty<T: Clone> {
    value: T,
    sequence: Sequence,
    dirty: bool,
}

impl<T: Clone> HostOwnedProperty<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            sequence: 0,
            dirty: false,
        }
    }

    fn set(&mut self, value: T) {
        self.value = value;
        self.sequence = next_sequence(self.sequence);
        self.dirty = true;
    }

    fn take_update(&mut self) -> Option<(Sequence, T)> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some((self.sequence, self.value.clone()))
    }
}

// RelayedProperty
#[derive(Clone)]
struct RelayedProperty<T: Clone> {
    value: T,
    sequence: Sequence,
    dirty: bool,
}

impl<T: Clone> RelayedProperty<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            sequence: 0,
            dirty: false,
        }
    }

    fn receive(&mut self, sequence: Sequence, value: T) -> bool {
        if !sequence_greater_than(sequence, self.sequence) {
            return false;
        }
        self.value = value;
        self.sequence = sequence;
        self.dirty = true;
        true
    }

    fn take_update(&mut self) -> Option<(Sequence, T)> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some((self.sequence, self.value.clone()))
    }
}

// RemoteOwnedProperty
#[derive(Clone)]
struct RemoteOwnedProperty<T: Clone> {
    value: T,
    sequence: Sequence,
}

impl<T: Clone> RemoteOwnedProperty<T> {
    fn new(value: T, sequence: Sequence) -> Self {
        Self { value, sequence }
    }

    fn mirror(&mut self, sequence: Sequence, value: T) -> bool {
        if !sequence_greater_than(sequence, self.sequence) {
            return false;
        }
        self.value = value;
        self.sequence = sequence;
        true
    }
}
