//! Stand-in for the physics engine, for E2E testing.
//! Free bodies fall under gravity and come to rest on the floor plane; kinematic
//! bodies stay exactly where the last submitted pose put them.
use std::collections::HashMap;

use tandem_server::{shared::Vec3, ObjectWorld};
use tandem_shared::{ObjectKey, Pose};

pub const GRAVITY: f32 = -9.81;
pub const FLOOR_HEIGHT: f32 = 0.0;

#[derive(Clone, Copy, Debug)]
pub struct TestBody {
    pub pose: Pose,
    pub velocity: Vec3,
    pub kinematic: bool,
}

#[derive(Default)]
pub struct TestWorld {
    bodies: HashMap<ObjectKey, TestBody>,
    kinematic_switches: usize,
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: ObjectKey, pose: Pose) {
        self.bodies.insert(
            object,
            TestBody {
                pose,
                velocity: Vec3::ZERO,
                kinematic: false,
            },
        );
    }

    pub fn body(&self, object: &ObjectKey) -> Option<&TestBody> {
        self.bodies.get(object)
    }

    pub fn is_kinematic(&self, object: &ObjectKey) -> bool {
        self.bodies
            .get(object)
            .map(|body| body.kinematic)
            .unwrap_or(false)
    }

    /// How many times any body switched between kinematic and simulated
    pub fn kinematic_switches(&self) -> usize {
        self.kinematic_switches
    }

    /// Advance ambient physics by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if body.kinematic {
                continue;
            }
            let mut position = body.pose.position();
            if position.y <= FLOOR_HEIGHT && body.velocity.y <= 0.0 {
                body.velocity = Vec3::ZERO;
                continue;
            }
            body.velocity.y += GRAVITY * dt;
            position += body.velocity * dt;
            if position.y < FLOOR_HEIGHT {
                position.y = FLOOR_HEIGHT;
                body.velocity = Vec3::ZERO;
            }
            body.pose = Pose::new(position, body.pose.rotation());
        }
    }
}

impl ObjectWorld for TestWorld {
    fn set_kinematic(&mut self, object: &ObjectKey, kinematic: bool) {
        if let Some(body) = self.bodies.get_mut(object) {
            if body.kinematic != kinematic {
                self.kinematic_switches += 1;
            }
            body.kinematic = kinematic;
            body.velocity = Vec3::ZERO;
        }
    }

    fn move_object(&mut self, object: &ObjectKey, pose: &Pose) {
        if let Some(body) = self.bodies.get_mut(object) {
            body.pose = *pose;
        }
    }

    fn object_pose(&self, object: &ObjectKey) -> Option<Pose> {
        self.bodies.get(object).map(|body| body.pose)
    }
}
