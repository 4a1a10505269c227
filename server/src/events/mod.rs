mod server_events;

pub use server_events::{
    ConnectEvent, DisconnectEvent, GrabEvent, ReleaseEvent, ServerEvent, ServerEvents,
    SpawnObjectEvent,
};
