use glam::{Quat, Vec3};

/// Values that can be blended toward a goal once per frame.
pub trait Smoothable: Clone + Copy {
    fn interpolate(self, goal: Self, t: f32) -> Self;

    /// A zero `lerp_time` returns `goal` exactly.
    fn smooth_to(self, goal: Self, delta_time: f32, lerp_time: f32) -> Self {
        let t = smoothing_factor(delta_time, lerp_time);
        if t >= 1.0 {
            goal
        } else {
            self.interpolate(goal, t)
        }
    }
}

impl Smoothable for Vec3 {
    fn interpolate(self, goal: Self, t: f32) -> Self {
        self.lerp(goal, t)
    }
}

impl Smoothable for Quat {
    fn interpolate(self, goal: Self, t: f32) -> Self {
        self.slerp(goal, t).normalize()
    }
}

pub fn smoothing_factor(delta_time: f32, lerp_time: f32) -> f32 {
    if lerp_time == 0.0 {
        1.0
    } else {
        (delta_time / lerp_time).clamp(0.0, 1.0)
    }
}
