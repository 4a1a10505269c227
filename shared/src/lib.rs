//! # Tandem Shared
//! Common functionality shared between tandem-server & tandem-client crates.
//!
//! Holds the identifiers every participant agrees on, the [`Pose`] value
//! type, the owner-write replicated [`Property`], the wire messages and the
//! transport traits the external session layer plugs into.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod key_generator;
mod messages;
mod pose;
mod types;
mod world;
mod wrapping_number;

pub mod transport;

pub use key_generator::{KeyGenerator, KeyId};
pub use messages::{ClientMessage, ServerMessage};
pub use pose::Pose;
pub use types::{EntityKey, HostType, ObjectKey, ParticipantId, Sequence};
pub use world::{
    delegation::{grant_state::GrantState, grant_status::GrantStatus},
    object_state::ObjectState,
    property::{Property, PropertyError, Writer},
};
pub use wrapping_number::{next_sequence, sequence_greater_than};

pub use glam::{EulerRot, Quat, Vec3};
