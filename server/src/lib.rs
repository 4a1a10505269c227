//! # Tandem Server
//! The authoritative role of a shared session. Relays every participant's
//! avatar pose to everyone else, and arbitrates exclusive manipulation of
//! shared objects: one holder at a time, first request wins, holder's hand
//! pose drives the object until it lets go or disconnects.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tandem_shared::{
        transport, ClientMessage, EntityKey, GrantState, HostType, ObjectKey, ObjectState, ParticipantId,
        Pose, Quat, ServerMessage, Vec3,
    };
}

mod connection;
mod error;
mod events;
mod server;
mod user;
mod world;

pub use error::ServerError;
pub use events::{
    ConnectEvent, DisconnectEvent, GrabEvent, ReleaseEvent, ServerEvent, ServerEvents,
    SpawnObjectEvent,
};
pub use server::{Server, ServerConfig};
pub use world::{object_world::ObjectWorld, ownership_arbitrator::OwnershipArbitrator};
