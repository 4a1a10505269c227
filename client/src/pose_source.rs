use log::info;

use tandem_shared::Pose;

/// One sample of the local participant's tracking
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedPose {
    /// Raw head pose, full 6-DoF
    pub head: Pose,
    /// Height of the tracked floor in world space
    pub floor_height: f32,
}

/// Where the local avatar pose comes from.
///
/// Returning `None` means tracking is not available this tick. The tick is
/// skipped, it is never an error.
pub trait PoseSource {
    fn sample(&mut self) -> Option<TrackedPose>;
}

/// A tracking rig that has been located in the scene
pub trait TrackingRig {
    /// `None` while the headset has lost tracking
    fn head_pose(&self) -> Option<Pose>;

    fn floor_height(&self) -> f32;
}

/// A [`PoseSource`] bound lazily to a [`TrackingRig`].
///
/// The rig usually appears some time after the session starts. Until it
/// does, every sample runs `probe` again and yields nothing. The first rig
/// the probe finds is kept for good and the probe is never run again.
pub struct RigBinding<R: TrackingRig, F: FnMut() -> Option<R>> {
    probe: F,
    rig: Option<R>,
}

impl<R: TrackingRig, F: FnMut() -> Option<R>> RigBinding<R, F> {
    pub fn new(probe: F) -> Self {
        Self { probe, rig: None }
    }

    pub fn is_bound(&self) -> bool {
        self.rig.is_some()
    }

    pub fn rig(&self) -> Option<&R> {
        self.rig.as_ref()
    }

    fn bind(&mut self) -> Option<&R> {
        if self.rig.is_none() {
            self.rig = (self.probe)();
            if self.rig.is_some() {
                info!("tracking rig bound");
            }
        }
        self.rig.as_ref()
    }
}

impl<R: TrackingRig, F: FnMut() -> Option<R>> PoseSource for RigBinding<R, F> {
    fn sample(&mut self) -> Option<TrackedPose> {
        let rig = self.bind()?;
        Some(TrackedPose {
            head: rig.head_pose()?,
            floor_height: rig.floor_height(),
        })
    }
}
