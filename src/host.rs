//! Services the embedding application supplies to the solvers.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Quat, Vec3};

use crate::math::Pose;

/// Per-frame time source.
pub trait Clock {
    fn delta_time(&self) -> f32;
}

/// Supplies the pose being followed (a head, hand or controller), or `None`
/// while it is not tracked.
pub trait TrackedTargetProvider {
    fn tracked_pose(&self) -> Option<Pose>;
}

/// Supplies the viewer/camera pose for camera-relative orientation.
pub trait ViewerPoseProvider {
    fn viewer_pose(&self) -> Option<Pose>;
}

/// The transform of the object being driven.
pub trait HostTransform {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn local_scale(&self) -> Vec3;
    fn set_local_scale(&mut self, scale: Vec3);

    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation(), self.local_scale())
    }
}

impl HostTransform for Pose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn local_scale(&self) -> Vec3 {
        self.scale
    }

    fn set_local_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }
}

/// A clock that reports the same frame time forever.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub f32);

impl Clock for FixedClock {
    fn delta_time(&self) -> f32 {
        self.0
    }
}

/// A clock whose frame time can be changed from outside through a clone.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    delta: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta: Rc::new(Cell::new(delta_time)),
        }
    }

    pub fn set_delta_time(&self, delta_time: f32) {
        self.delta.set(delta_time);
    }
}

impl Clock for ManualClock {
    fn delta_time(&self) -> f32 {
        self.delta.get()
    }
}

/// A shared, settable pose usable as either provider.
///
/// Clones share the same slot, so the host keeps one handle to move the
/// tracked object while the solver handler reads through another.
#[derive(Debug, Clone, Default)]
pub struct PoseSlot {
    pose: Rc<Cell<Option<Pose>>>,
}

impl PoseSlot {
    pub fn new(pose: Pose) -> Self {
        Self {
            pose: Rc::new(Cell::new(Some(pose))),
        }
    }

    pub fn untracked() -> Self {
        Self::default()
    }

    pub fn set(&self, pose: Pose) {
        self.pose.set(Some(pose));
    }

    pub fn clear(&self) {
        self.pose.set(None);
    }

    pub fn get(&self) -> Option<Pose> {
        self.pose.get()
    }
}

impl TrackedTargetProvider for PoseSlot {
    fn tracked_pose(&self) -> Option<Pose> {
        self.get()
    }
}

impl ViewerPoseProvider for PoseSlot {
    fn viewer_pose(&self) -> Option<Pose> {
        self.get()
    }
}

impl TrackedTargetProvider for Option<Pose> {
    fn tracked_pose(&self) -> Option<Pose> {
        *self
    }
}

impl ViewerPoseProvider for Option<Pose> {
    fn viewer_pose(&self) -> Option<Pose> {
        *self
    }
}
