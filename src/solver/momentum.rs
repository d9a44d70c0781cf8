use serde::{Deserialize, Serialize};

use super::base::{Frame, Solver, SolverBase};
use super::config::{load_toml, SolverConfig, SolverSettings};
use crate::dynamics::{MomentumConfig, MomentumIntegrator};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumPreset {
    #[serde(flatten)]
    pub solver: SolverConfig,
    #[serde(flatten)]
    pub momentum: MomentumConfig,
}

impl MomentumPreset {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let preset: Self = load_toml(source)?;
        preset.solver.validate()?;
        preset.momentum.validate()?;
        Ok(preset)
    }
}

/// Chases the goal left by earlier solvers with velocity and drag. Runs last
/// in a chain, unlinked.
#[derive(Debug, Clone)]
pub struct MomentumSolver {
    base: SolverBase,
    config: MomentumConfig,
    integrator: MomentumIntegrator,
}

impl Default for MomentumSolver {
    fn default() -> Self {
        Self::new(SolverSettings::default(), MomentumConfig::default())
    }
}

impl MomentumSolver {
    pub fn new(settings: SolverSettings, config: MomentumConfig) -> Self {
        Self {
            base: SolverBase::new(settings),
            config,
            integrator: MomentumIntegrator::new(),
        }
    }

    pub fn from_preset(preset: &MomentumPreset) -> Self {
        Self::new(SolverSettings::from_config(preset.solver), preset.momentum)
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut MomentumConfig {
        &mut self.config
    }

    pub fn integrator(&self) -> &MomentumIntegrator {
        &self.integrator
    }
}

impl Solver for MomentumSolver {
    fn name(&self) -> &'static str {
        "momentum"
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolverBase {
        &mut self.base
    }

    fn on_deactivate(&mut self) {
        self.integrator.reset();
        self.base.deactivate();
    }

    fn compute_goal(&mut self, frame: &mut Frame<'_>) {
        let goal = frame.goal.position;
        let mut current = self.base.working_position(frame);

        let depth_axis = frame
            .target
            .filter(|_| self.config.snap_z)
            .map(|t| (t.position, t.forward()));
        if let Some((origin, forward)) = depth_axis {
            let goal_depth = (goal - origin).dot(forward);
            let current_depth = (current - origin).dot(forward);
            current += forward * (goal_depth - current_depth);
            self.integrator.cancel_along(forward);
        }

        frame.goal.position =
            self.integrator
                .update(current, goal, frame.delta_time, &self.config);
    }
}
