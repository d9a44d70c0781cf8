use glam::Vec3;

use super::base::{Frame, Solver};
use crate::host::{Clock, FixedClock, HostTransform, TrackedTargetProvider, ViewerPoseProvider};
use crate::math::Pose;

/// Owns the shared goal pose of one object and runs its solvers in order.
pub struct SolverHandler {
    solvers: Vec<Box<dyn Solver>>,
    goal: Pose,
    clock: Box<dyn Clock>,
    target: Box<dyn TrackedTargetProvider>,
    viewer: Box<dyn ViewerPoseProvider>,
    delta_time: f32,
}

impl SolverHandler {
    pub fn builder() -> SolverHandlerBuilder {
        SolverHandlerBuilder::new()
    }

    pub fn goal(&self) -> Pose {
        self.goal
    }

    /// Frame time sampled by the most recent [`SolverHandler::update`].
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn solver_count(&self) -> usize {
        self.solvers.len()
    }

    pub fn solver(&self, index: usize) -> Option<&dyn Solver> {
        self.solvers.get(index).map(|s| s.as_ref())
    }

    pub fn solver_mut(&mut self, index: usize) -> Option<&mut (dyn Solver + 'static)> {
        self.solvers.get_mut(index).map(|s| s.as_mut())
    }

    pub fn solvers(&self) -> impl Iterator<Item = &dyn Solver> + '_ {
        self.solvers.iter().map(|s| s.as_ref())
    }

    pub fn active_count(&self) -> usize {
        self.solvers.iter().filter(|s| s.is_active()).count()
    }

    /// Runs every active solver for one frame. When the last active solver is
    /// linked, the host is then moved toward the goal it left behind.
    pub fn update(&mut self, host: &mut dyn HostTransform) {
        let delta_time = self.clock.delta_time();
        let target = self.target.tracked_pose();
        let viewer = self.viewer.viewer_pose();
        self.delta_time = delta_time;

        for solver in self.solvers.iter_mut() {
            let mut frame = Frame {
                delta_time,
                goal: &mut self.goal,
                host: &mut *host,
                target,
                viewer,
            };
            solver.update(&mut frame);
        }

        let last = self.solvers.iter().rev().find(|s| s.is_active());
        if let Some(last) = last.filter(|s| s.base().update_linked_transform()) {
            let mut frame = Frame {
                delta_time,
                goal: &mut self.goal,
                host,
                target,
                viewer,
            };
            last.base().update_transform_to_goal(&mut frame);
        }
    }

    /// Enables or disables one solver. Returns false for an unknown index.
    pub fn set_enabled(&mut self, index: usize, enabled: bool, host: &dyn HostTransform) -> bool {
        let Some(solver) = self.solvers.get_mut(index) else {
            return false;
        };

        match (enabled, solver.is_active()) {
            (true, false) => solver.on_activate(&mut self.goal, host),
            (false, true) => solver.on_deactivate(),
            _ => {}
        }
        true
    }

    /// Jumps every active solver straight to `pose`, e.g. after a teleport.
    pub fn snap_to(&mut self, pose: Pose, host: &mut dyn HostTransform) {
        let delta_time = self.delta_time;
        for solver in self.solvers.iter().filter(|s| s.is_active()) {
            let mut frame = Frame {
                delta_time,
                goal: &mut self.goal,
                host: &mut *host,
                target: None,
                viewer: None,
            };
            solver.base().snap_to(&mut frame, pose);
        }
    }

    pub fn add_offset(&mut self, offset: Vec3) {
        self.goal.position += offset;
    }
}

impl std::fmt::Debug for SolverHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverHandler")
            .field("solvers", &self.solvers)
            .field("goal", &self.goal)
            .field("delta_time", &self.delta_time)
            .finish()
    }
}

pub struct SolverHandlerBuilder {
    solvers: Vec<Box<dyn Solver>>,
    clock: Box<dyn Clock>,
    target: Box<dyn TrackedTargetProvider>,
    viewer: Box<dyn ViewerPoseProvider>,
    linking: bool,
}

impl SolverHandlerBuilder {
    pub fn new() -> Self {
        Self {
            solvers: Vec::new(),
            clock: Box::new(FixedClock(1.0 / 60.0)),
            target: Box::new(None::<Pose>),
            viewer: Box::new(None::<Pose>),
            linking: true,
        }
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn target<T: TrackedTargetProvider + 'static>(mut self, target: T) -> Self {
        self.target = Box::new(target);
        self
    }

    pub fn viewer<V: ViewerPoseProvider + 'static>(mut self, viewer: V) -> Self {
        self.viewer = Box::new(viewer);
        self
    }

    /// Solvers run in the order they are added.
    pub fn add_solver<S: Solver + 'static>(mut self, solver: S) -> Self {
        self.solvers.push(Box::new(solver));
        self
    }

    pub fn linking(mut self, linking: bool) -> Self {
        self.linking = linking;
        self
    }

    pub fn build(self, host: &dyn HostTransform) -> SolverHandler {
        let mut goal = host.pose();
        let mut solvers = self.solvers;
        for solver in solvers.iter_mut() {
            solver.initialize(self.linking);
            solver.on_activate(&mut goal, host);
        }

        log::debug!("solver handler built with {} solvers", solvers.len());

        SolverHandler {
            solvers,
            goal,
            clock: self.clock,
            target: self.target,
            viewer: self.viewer,
            delta_time: 0.0,
        }
    }
}

impl Default for SolverHandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
