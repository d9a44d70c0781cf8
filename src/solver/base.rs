use std::fmt::Debug;

use glam::{Quat, Vec3};

use super::config::{SolverConfig, SolverSettings};
use crate::dynamics::Smoothable;
use crate::host::HostTransform;
use crate::math::Pose;

/// `goal` is shared by every solver of one object, in run order.
pub struct Frame<'a> {
    pub delta_time: f32,
    pub goal: &'a mut Pose,
    pub host: &'a mut dyn HostTransform,
    pub target: Option<Pose>,
    pub viewer: Option<Pose>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolverState {
    #[default]
    Inactive,
    Active,
}

#[derive(Debug, Clone)]
pub struct SolverBase {
    settings: SolverSettings,
    config: SolverConfig,
    linking_available: bool,
    state: SolverState,
    current_lifetime: f32,
}

impl Default for SolverBase {
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

impl SolverBase {
    pub fn new(settings: SolverSettings) -> Self {
        let config = settings.resolve();
        Self {
            settings,
            config,
            linking_available: true,
            state: SolverState::Inactive,
            current_lifetime: 0.0,
        }
    }

    pub fn from_config(config: SolverConfig) -> Self {
        Self::new(SolverSettings::from_config(config))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Takes effect at the next activation.
    pub fn set_settings(&mut self, settings: SolverSettings) {
        self.settings = settings;
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SolverState::Active
    }

    pub fn current_lifetime(&self) -> f32 {
        self.current_lifetime
    }

    pub fn update_linked_transform(&self) -> bool {
        self.config.update_linked_transform
    }

    pub fn initialize(&mut self, linking_available: bool) {
        self.linking_available = linking_available;
        self.config = self.resolve_config();
    }

    pub fn activate(&mut self, goal: &mut Pose, host: &dyn HostTransform) {
        self.config = self.resolve_config();
        goal.scale = if self.config.maintain_scale {
            host.local_scale()
        } else {
            Vec3::ONE
        };
        self.current_lifetime = 0.0;
        self.state = SolverState::Active;
    }

    pub fn deactivate(&mut self) {
        self.state = SolverState::Inactive;
    }

    /// True once the configured lifetime has run out.
    pub fn advance_lifetime(&mut self, delta_time: f32) -> bool {
        self.current_lifetime += delta_time;
        self.config.lifetime > 0.0 && self.current_lifetime >= self.config.lifetime
    }

    fn resolve_config(&self) -> SolverConfig {
        let mut config = self.settings.resolve();
        if config.update_linked_transform && !self.linking_available {
            log::warn!(
                "no shared goal pose available while update_linked_transform is set, disabling it"
            );
            config.update_linked_transform = false;
        }
        config
    }

    pub fn working_position(&self, frame: &Frame<'_>) -> Vec3 {
        if self.update_linked_transform() {
            frame.goal.position
        } else {
            frame.host.position()
        }
    }

    pub fn set_working_position(&self, frame: &mut Frame<'_>, position: Vec3) {
        if self.update_linked_transform() {
            frame.goal.position = position;
        } else {
            frame.host.set_position(position);
        }
    }

    pub fn working_rotation(&self, frame: &Frame<'_>) -> Quat {
        if self.update_linked_transform() {
            frame.goal.rotation
        } else {
            frame.host.rotation()
        }
    }

    pub fn set_working_rotation(&self, frame: &mut Frame<'_>, rotation: Quat) {
        if self.update_linked_transform() {
            frame.goal.rotation = rotation;
        } else {
            frame.host.set_rotation(rotation);
        }
    }

    pub fn working_scale(&self, frame: &Frame<'_>) -> Vec3 {
        if self.update_linked_transform() {
            frame.goal.scale
        } else {
            frame.host.local_scale()
        }
    }

    pub fn set_working_scale(&self, frame: &mut Frame<'_>, scale: Vec3) {
        if self.update_linked_transform() {
            frame.goal.scale = scale;
        } else {
            frame.host.set_local_scale(scale);
        }
    }

    pub fn working_pose(&self, frame: &Frame<'_>) -> Pose {
        Pose::new(
            self.working_position(frame),
            self.working_rotation(frame),
            self.working_scale(frame),
        )
    }

    pub fn snap_to(&self, frame: &mut Frame<'_>, pose: Pose) {
        self.snap_goal_to(frame, pose);
        self.set_working_position(frame, pose.position);
        self.set_working_rotation(frame, pose.rotation);
        self.set_working_scale(frame, pose.scale);
    }

    pub fn snap_goal_to(&self, frame: &mut Frame<'_>, pose: Pose) {
        *frame.goal = pose;
    }

    pub fn add_offset(&self, frame: &mut Frame<'_>, offset: Vec3) {
        frame.goal.position += offset;
    }

    /// Moves the host transform toward the shared goal, whatever the linked
    /// setting. Ends a chain whose last solver only wrote to the goal.
    pub fn update_transform_to_goal(&self, frame: &mut Frame<'_>) {
        let goal = *frame.goal;
        if !self.config.smoothing {
            frame.host.set_position(goal.position);
            frame.host.set_rotation(goal.rotation);
            frame.host.set_local_scale(goal.scale);
            return;
        }

        let dt = frame.delta_time;
        let position = frame.host.position().smooth_to(goal.position, dt, self.config.move_lerp_time);
        let rotation = frame.host.rotation().smooth_to(goal.rotation, dt, self.config.rotate_lerp_time);
        let scale = frame.host.local_scale().smooth_to(goal.scale, dt, self.config.scale_lerp_time);
        frame.host.set_position(position);
        frame.host.set_rotation(rotation);
        frame.host.set_local_scale(scale);
    }

    pub fn update_working_to_goal(&self, frame: &mut Frame<'_>) {
        self.update_working_position_to_goal(frame);
        self.update_working_rotation_to_goal(frame);
        self.update_working_scale_to_goal(frame);
    }

    pub fn update_working_position_to_goal(&self, frame: &mut Frame<'_>) {
        let goal = frame.goal.position;
        let position = if self.config.smoothing {
            self.working_position(frame)
                .smooth_to(goal, frame.delta_time, self.config.move_lerp_time)
        } else {
            goal
        };
        self.set_working_position(frame, position);
    }

    pub fn update_working_rotation_to_goal(&self, frame: &mut Frame<'_>) {
        let goal = frame.goal.rotation;
        let rotation = if self.config.smoothing {
            self.working_rotation(frame)
                .smooth_to(goal, frame.delta_time, self.config.rotate_lerp_time)
        } else {
            goal
        };
        self.set_working_rotation(frame, rotation);
    }

    pub fn update_working_scale_to_goal(&self, frame: &mut Frame<'_>) {
        let goal = frame.goal.scale;
        let scale = if self.config.smoothing {
            self.working_scale(frame)
                .smooth_to(goal, frame.delta_time, self.config.scale_lerp_time)
        } else {
            goal
        };
        self.set_working_scale(frame, scale);
    }
}

/// A stage that turns the tracked and viewer poses into a goal pose.
pub trait Solver: Debug {
    fn name(&self) -> &'static str;

    fn base(&self) -> &SolverBase;

    fn base_mut(&mut self) -> &mut SolverBase;

    fn compute_goal(&mut self, frame: &mut Frame<'_>);

    fn initialize(&mut self, linking_available: bool) {
        self.base_mut().initialize(linking_available);
    }

    fn on_activate(&mut self, goal: &mut Pose, host: &dyn HostTransform) {
        self.base_mut().activate(goal, host);
        log::debug!("{} solver activated", self.name());
    }

    fn on_deactivate(&mut self) {
        self.base_mut().deactivate();
        log::debug!("{} solver deactivated", self.name());
    }

    fn update(&mut self, frame: &mut Frame<'_>) {
        if !self.base().is_active() {
            return;
        }

        if self.base_mut().advance_lifetime(frame.delta_time) {
            log::debug!("{} solver lifetime expired", self.name());
            self.on_deactivate();
            return;
        }

        self.compute_goal(frame);
        self.base().update_working_to_goal(frame);
    }

    fn is_active(&self) -> bool {
        self.base().is_active()
    }
}
