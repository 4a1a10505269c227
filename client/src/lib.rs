//! # Tandem Client
//! The participant side of a shared session. Publishes the local avatar pose
//! (floor-locked, yaw only), interpolates every other participant's avatar
//! toward its latest replicated pose, and turns manipulation gestures into
//! grab and release requests. Grants are never replied to: the client reads
//! them off the replicated object state.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use tandem_shared::{
        transport, ClientMessage, EntityKey, GrantState, GrantStatus, HostType, ObjectKey, ObjectState,
        ParticipantId, Pose, Quat, ServerMessage, Vec3,
    };
}

mod client;
mod client_config;
mod client_events;
mod error;
mod pose_source;
mod world;

pub use client::Client;
pub use client_config::ClientConfig;
pub use client_events::{
    ClientEvent, ClientEvents, EntityDespawnEvent, EntitySpawnEvent, GrantChangeEvent,
    LocalEntityRegisteredEvent, ObjectSpawnEvent,
};
pub use error::ClientError;
pub use pose_source::{PoseSource, RigBinding, TrackedPose, TrackingRig};
