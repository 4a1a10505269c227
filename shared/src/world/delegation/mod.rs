pub mod grant_state;
pub mod grant_status;
