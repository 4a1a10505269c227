pub mod object_world;
pub mod ownership_arbitrator;
pub(crate) mod replicated_entity;
