use std::{default::Default, num::NonZeroUsize};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Maximum number of inbound messages evaluated per call to
    /// `Server::process`. Anything beyond stays queued, in order, for the
    /// next call. `None` drains the whole queue every time.
    pub inbound_budget: Option<NonZeroUsize>,
    /// Tolerance for [`Pose::approx_eq`] when deciding whether a free object's
    /// simulated pose moved enough to be replicated. Applies to each position
    /// axis, and to `1 - |dot|` of the two orientations.
    ///
    /// [`Pose::approx_eq`]: tandem_shared::Pose::approx_eq
    pub pose_epsilon: f32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            inbound_budget: None,
            pose_epsilon: 1e-4,
        }
    }
}
