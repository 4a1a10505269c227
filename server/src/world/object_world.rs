use tandem_shared::{ObjectKey, Pose};

/// The server's handle on the physical simulation of shared objects.
///
/// Implemented by whatever physics integration hosts the objects. The server
/// only ever toggles kinematic mode and places kinematic objects; while an
/// object is not kinematic the simulation moves it and the server reads the
/// result back through `object_pose`.
pub trait ObjectWorld {
    /// Switch between submission-driven (`true`) and ambient (`false`)
    /// physics for `object`
    fn set_kinematic(&mut self, object: &ObjectKey, kinematic: bool);

    /// Move a kinematic object to `pose`
    fn move_object(&mut self, object: &ObjectKey, pose: &Pose);

    /// Current simulated pose of `object`, if the simulation knows it
    fn object_pose(&self, object: &ObjectKey) -> Option<Pose>;
}
