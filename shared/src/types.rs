use std::fmt;

use crate::KeyId;

/// Wrapping sequence number stamped on every replicated field update
pub type Sequence = u16;

/// Which side of the session this process is running as. Only the
/// `Server` role evaluates arbitration requests, and every [`Property`]
/// copy checks writers against the side holding it.
///
/// [`Property`]: crate::Property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Server => write!(f, "server"),
            HostType::Client => write!(f, "client"),
        }
    }
}

// ParticipantId

/// Opaque identifier the session layer assigns when it admits a connection.
/// Stable for the lifetime of that connection.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ParticipantId(u64);

impl ParticipantId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl KeyId for ParticipantId {
    fn to_u64(&self) -> u64 {
        self.0
    }

    fn from_u64(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "participant#{}", self.0)
    }
}

// EntityKey

/// Key of a participant's Replicated Entity (its avatar)
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct EntityKey(u64);

impl KeyId for EntityKey {
    fn to_u64(&self) -> u64 {
        self.0
    }

    fn from_u64(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

// ObjectKey

/// Key of a Shared Manipulable Object
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct ObjectKey(u64);

impl KeyId for ObjectKey {
    fn to_u64(&self) -> u64 {
        self.0
    }

    fn from_u64(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}
