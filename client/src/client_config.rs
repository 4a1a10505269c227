use std::default::Default;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Rate `k`, per second, at which remote avatars close the gap to their
    /// latest replicated pose. Each render step covers `min(1, k * dt)` of
    /// the remaining distance.
    pub interpolation_rate: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            interpolation_rate: 20.0,
        }
    }
}
