pub mod delegation;
pub mod object_state;
pub mod property;
