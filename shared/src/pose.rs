use glam::{EulerRot, Quat, Vec3};

/// A position and orientation in world space.
///
/// Poses are values: they are replaced wholesale on update and never
/// partially mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    position: Vec3,
    rotation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Heading around the vertical axis, in radians
    pub fn yaw(&self) -> f32 {
        let (yaw, _pitch, _roll) = self.rotation.to_euler(EulerRot::YXZ);
        yaw
    }

    /// Projects a head-tracking sample onto the body pose that gets
    /// replicated: the vertical component comes from `floor_height` instead of
    /// the tracked head, and only yaw survives from the orientation.
    pub fn floor_locked(&self, floor_height: f32) -> Self {
        let position = Vec3::new(self.position.x, floor_height, self.position.z);
        let rotation = Quat::from_rotation_y(self.yaw());
        Self::new(position, rotation)
    }

    /// Moves `t` of the way toward `target`: linear for position, spherical
    /// for orientation. `t` is clamped to `[0, 1]`.
    pub fn interpolate(&self, target: &Pose, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return *target;
        }
        Self::new(
            self.position.lerp(target.position, t),
            self.rotation.slerp(target.rotation, t).normalize(),
        )
    }

    /// Equality within `epsilon`. `q` and `-q` describe the same orientation
    /// and compare equal.
    pub fn approx_eq(&self, other: &Pose, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - epsilon
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
