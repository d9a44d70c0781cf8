use glam::{Quat, Vec3};
use serde::{Deserialize, Deserializer, Serialize};

use super::base::{Frame, Solver, SolverBase};
use super::config::{load_toml, SolverConfig, SolverSettings};
use crate::error::ConfigError;
use crate::math::angles;

/// How the orbiting object is turned once it has been placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrientationMode {
    #[default]
    FollowTracked,
    /// Tracked heading only, level with the horizon.
    YawOnly,
    Unmodified,
    CameraAligned,
    FaceTracked,
    CameraFacing,
    /// Anything the host handed us that is not a known mode.
    #[serde(other)]
    Unknown,
}

impl From<i32> for OrientationMode {
    fn from(code: i32) -> Self {
        match code {
            0 => Self::FollowTracked,
            1 => Self::YawOnly,
            2 => Self::Unmodified,
            3 => Self::CameraAligned,
            4 => Self::FaceTracked,
            5 => Self::CameraFacing,
            _ => Self::Unknown,
        }
    }
}

const DEFAULT_TETHER_STEPS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalConfig {
    pub orientation_mode: OrientationMode,
    /// In the tracked object's frame, -Z forward. Applied before `world_offset`.
    pub local_offset: Vec3,
    /// Euler degrees (pitch, yaw, roll).
    pub local_rotation_offset: Vec3,
    pub world_offset: Vec3,
    pub use_angle_stepping: bool,
    #[serde(deserialize_with = "deserialize_tether_steps")]
    tether_angle_steps: u32,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            orientation_mode: OrientationMode::FollowTracked,
            local_offset: Vec3::new(0.0, -1.0, -1.0),
            local_rotation_offset: Vec3::ZERO,
            world_offset: Vec3::ZERO,
            use_angle_stepping: false,
            tether_angle_steps: DEFAULT_TETHER_STEPS,
        }
    }
}

impl OrbitalConfig {
    pub fn tether_angle_steps(&self) -> u32 {
        self.tether_angle_steps
    }

    /// Clamped into `[2, 24]`.
    pub fn set_tether_angle_steps(&mut self, steps: i32) {
        self.tether_angle_steps = angles::clamp_tether_steps(steps);
    }

    pub fn with_tether_angle_steps(mut self, steps: i32) -> Self {
        self.set_tether_angle_steps(steps);
        self
    }

    pub fn with_orientation_mode(mut self, mode: OrientationMode) -> Self {
        self.orientation_mode = mode;
        self
    }

    pub fn with_local_offset(mut self, offset: Vec3) -> Self {
        self.local_offset = offset;
        self
    }

    pub fn with_local_rotation_offset(mut self, euler_degrees: Vec3) -> Self {
        self.local_rotation_offset = euler_degrees;
        self
    }

    pub fn with_world_offset(mut self, offset: Vec3) -> Self {
        self.world_offset = offset;
        self
    }

    pub fn with_angle_stepping(mut self, enabled: bool) -> Self {
        self.use_angle_stepping = enabled;
        self
    }
}

fn deserialize_tether_steps<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let clamped = raw.clamp(
        angles::MIN_TETHER_STEPS as i64,
        angles::MAX_TETHER_STEPS as i64,
    );
    Ok(clamped as u32)
}

/// Shared smoothing settings and orbital settings in one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalPreset {
    #[serde(flatten)]
    pub solver: SolverConfig,
    #[serde(flatten)]
    pub orbital: OrbitalConfig,
}

impl OrbitalPreset {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let preset: Self = load_toml(source)?;
        preset.solver.validate()?;
        Ok(preset)
    }
}

/// Keeps an object at an offset around the tracked pose.
#[derive(Debug, Clone)]
pub struct OrbitalSolver {
    base: SolverBase,
    config: OrbitalConfig,
}

impl Default for OrbitalSolver {
    fn default() -> Self {
        Self::new(SolverSettings::default(), OrbitalConfig::default())
    }
}

impl OrbitalSolver {
    pub fn new(settings: SolverSettings, config: OrbitalConfig) -> Self {
        Self {
            base: SolverBase::new(settings),
            config,
        }
    }

    pub fn from_preset(preset: &OrbitalPreset) -> Self {
        Self::new(SolverSettings::from_config(preset.solver), preset.orbital)
    }

    pub fn config(&self) -> &OrbitalConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut OrbitalConfig {
        &mut self.config
    }

    /// Rotation assumed for the tracked object while nothing is tracked.
    pub fn untracked_rotation() -> Quat {
        angles::from_yaw_degrees(1.0)
    }

    fn snap_to_tether_steps(&self, rotation: Quat, target: Option<Quat>) -> Quat {
        match target {
            Some(target_rotation) if self.config.use_angle_stepping => {
                let yaw = angles::yaw_degrees(target_rotation);
                let stepped = angles::step_angle(yaw, self.config.tether_angle_steps);
                angles::with_yaw(rotation, stepped)
            }
            _ => rotation,
        }
    }

    fn desired_rotation(&self, desired_position: Vec3, frame: &Frame<'_>) -> Quat {
        let target = frame.target;
        let rotation = match self.config.orientation_mode {
            OrientationMode::FollowTracked => target.map_or(Quat::IDENTITY, |t| t.rotation),
            OrientationMode::YawOnly => target.map_or(Quat::IDENTITY, |t| angles::yaw_only(t.rotation)),
            OrientationMode::Unmodified => frame.host.rotation(),
            OrientationMode::CameraAligned => frame.viewer.map_or(Quat::IDENTITY, |v| v.rotation),
            OrientationMode::FaceTracked => target.map_or(Quat::IDENTITY, |t| {
                angles::look_rotation(t.position - desired_position, Vec3::Y)
            }),
            OrientationMode::CameraFacing => frame.viewer.map_or(Quat::IDENTITY, |v| {
                angles::look_rotation(v.position - desired_position, Vec3::Y)
            }),
            OrientationMode::Unknown => {
                log::error!("invalid orientation mode for orbital solver, using identity");
                Quat::IDENTITY
            }
        };

        self.snap_to_tether_steps(rotation, target.map(|t| t.rotation))
    }
}

impl Solver for OrbitalSolver {
    fn name(&self) -> &'static str {
        "orbital"
    }

    fn base(&self) -> &SolverBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SolverBase {
        &mut self.base
    }

    fn compute_goal(&mut self, frame: &mut Frame<'_>) {
        let tracked_rotation = frame.target.map(|t| t.rotation);
        let target_position = frame.target.map_or(Vec3::ZERO, |t| t.position);
        let target_rotation = tracked_rotation.unwrap_or_else(Self::untracked_rotation);
        let yaw_only = angles::yaw_only(target_rotation);

        let desired_position = target_position
            + self.snap_to_tether_steps(target_rotation, tracked_rotation) * self.config.local_offset
            + self.snap_to_tether_steps(yaw_only, tracked_rotation) * self.config.world_offset;

        let desired_rotation = angles::from_euler_degrees(self.config.local_rotation_offset)
            * self.desired_rotation(desired_position, frame);

        frame.goal.position = desired_position;
        frame.goal.rotation = desired_rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pose;

    const EPS: f32 = 1e-4;

    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-6
    }

    fn snapping() -> SolverSettings {
        SolverSettings::from_config(SolverConfig {
            move_lerp_time: 0.0,
            rotate_lerp_time: 0.0,
            ..Default::default()
        })
    }

    /// Runs one activated update and returns (goal, host).
    fn solve(
        config: OrbitalConfig,
        target: Option<Pose>,
        viewer: Option<Pose>,
        host: Pose,
    ) -> (Pose, Pose) {
        let mut solver = OrbitalSolver::new(snapping(), config);
        let mut goal = Pose::IDENTITY;
        let mut host = host;
        solver.initialize(true);
        solver.on_activate(&mut goal, &host);
        let mut frame = Frame {
            delta_time: 0.016,
            goal: &mut goal,
            host: &mut host,
            target,
            viewer,
        };
        solver.update(&mut frame);
        (goal, host)
    }

    fn yaw_pose(position: Vec3, yaw: f32) -> Pose {
        Pose::from_position_rotation(position, angles::from_yaw_degrees(yaw))
    }

    #[test]
    fn follows_target_at_local_offset() {
        let config = OrbitalConfig::default().with_local_offset(Vec3::new(0.0, -1.0, 1.0));
        let target = Pose::from_position(Vec3::new(0.0, 0.0, 5.0));
        let (goal, host) = solve(config, Some(target), None, Pose::IDENTITY);
        assert!((goal.position - Vec3::new(0.0, -1.0, 6.0)).length() < EPS);
        assert!(same_rotation(goal.rotation, Quat::IDENTITY));
        assert!((host.position - goal.position).length() < EPS);
    }

    #[test]
    fn local_offset_turns_with_target() {
        let config = OrbitalConfig {
            local_offset: Vec3::NEG_Z,
            ..Default::default()
        };
        let target = yaw_pose(Vec3::ZERO, 90.0);
        let (goal, _) = solve(config, Some(target), None, Pose::IDENTITY);
        assert!((goal.position - Vec3::NEG_X).length() < EPS);
    }

    #[test]
    fn world_offset_ignores_target_pitch() {
        let config = OrbitalConfig {
            local_offset: Vec3::ZERO,
            world_offset: Vec3::NEG_Z * 2.0,
            ..Default::default()
        };
        let pitched = Pose::from_position_rotation(
            Vec3::ZERO,
            angles::from_euler_degrees(Vec3::new(60.0, 0.0, 0.0)),
        );
        let (goal, _) = solve(config, Some(pitched), None, Pose::IDENTITY);
        assert!((goal.position - Vec3::new(0.0, 0.0, -2.0)).length() < EPS);
    }

    #[test]
    fn angle_stepping_snaps_heading() {
        let config = OrbitalConfig {
            local_offset: Vec3::NEG_Z,
            use_angle_stepping: true,
            ..Default::default()
        }
        .with_tether_angle_steps(4);
        let target = yaw_pose(Vec3::ZERO, 100.0);
        let (goal, _) = solve(config, Some(target), None, Pose::IDENTITY);

        assert!(same_rotation(goal.rotation, angles::from_yaw_degrees(90.0)));
        assert!((goal.position - Vec3::NEG_X).length() < EPS);
    }

    #[test]
    fn angle_stepping_keeps_pitch() {
        let config = OrbitalConfig {
            use_angle_stepping: true,
            ..Default::default()
        }
        .with_tether_angle_steps(4);
        let tilted = angles::from_euler_degrees(Vec3::new(20.0, 100.0, 0.0));
        let target = Pose::from_position_rotation(Vec3::ZERO, tilted);
        let (goal, _) = solve(config, Some(target), None, Pose::IDENTITY);

        let euler = angles::to_euler_degrees(goal.rotation);
        assert!((euler.x - 20.0).abs() < 1e-2);
        assert!((euler.y - 90.0).abs() < 1e-2);
    }

    #[test]
    fn yaw_only_levels_rotation() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::YawOnly,
            ..Default::default()
        };
        let tilted = angles::from_euler_degrees(Vec3::new(-30.0, 45.0, 10.0));
        let target = Pose::from_position_rotation(Vec3::ZERO, tilted);
        let (goal, _) = solve(config, Some(target), None, Pose::IDENTITY);
        assert!(same_rotation(goal.rotation, angles::from_yaw_degrees(45.0)));
    }

    #[test]
    fn unmodified_keeps_host_rotation() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::Unmodified,
            ..Default::default()
        };
        let host_rotation = Quat::from_rotation_x(0.8);
        let host = Pose::from_position_rotation(Vec3::ZERO, host_rotation);
        let (goal, _) = solve(config, Some(yaw_pose(Vec3::ZERO, 30.0)), None, host);
        assert!(same_rotation(goal.rotation, host_rotation));
    }

    #[test]
    fn camera_aligned_copies_viewer() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::CameraAligned,
            ..Default::default()
        };
        let viewer = yaw_pose(Vec3::ONE, 210.0);
        let (goal, _) = solve(config, Some(Pose::IDENTITY), Some(viewer), Pose::IDENTITY);
        assert!(same_rotation(goal.rotation, viewer.rotation));
    }

    #[test]
    fn face_tracked_looks_back_at_target() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::FaceTracked,
            local_offset: Vec3::new(0.0, 0.0, -2.0),
            ..Default::default()
        };
        let (goal, _) = solve(config, Some(Pose::IDENTITY), None, Pose::IDENTITY);
        // Placed at (0,0,-2), so it has to look along +Z.
        assert!((goal.rotation * Vec3::NEG_Z - Vec3::Z).length() < EPS);
    }

    #[test]
    fn camera_facing_looks_at_viewer() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::CameraFacing,
            local_offset: Vec3::ZERO,
            ..Default::default()
        };
        let viewer = Pose::from_position(Vec3::new(3.0, 0.0, 0.0));
        let (goal, _) = solve(config, Some(Pose::IDENTITY), Some(viewer), Pose::IDENTITY);
        assert!((goal.rotation * Vec3::NEG_Z - Vec3::X).length() < EPS);
    }

    #[test]
    fn unknown_mode_falls_back_to_identity() {
        let config = OrbitalConfig {
            orientation_mode: OrientationMode::from(42),
            ..Default::default()
        };
        let (goal, _) = solve(config, Some(yaw_pose(Vec3::ZERO, 70.0)), None, Pose::IDENTITY);
        assert!(same_rotation(goal.rotation, Quat::IDENTITY));
    }

    #[test]
    fn local_rotation_offset_is_applied_in_front() {
        let config = OrbitalConfig {
            local_rotation_offset: Vec3::new(0.0, 30.0, 0.0),
            ..Default::default()
        };
        let (goal, _) = solve(config, Some(yaw_pose(Vec3::ZERO, 15.0)), None, Pose::IDENTITY);
        assert!(same_rotation(goal.rotation, angles::from_yaw_degrees(45.0)));
    }

    #[test]
    fn untracked_target_degrades_gracefully() {
        let config = OrbitalConfig {
            local_offset: Vec3::ZERO,
            use_angle_stepping: true,
            ..Default::default()
        };
        let (goal, _) = solve(config, None, None, Pose::IDENTITY);
        assert_eq!(goal.position, Vec3::ZERO);
        assert!(same_rotation(goal.rotation, Quat::IDENTITY));
    }

    #[test]
    fn untracked_offset_uses_one_degree_heading() {
        let config = OrbitalConfig::default().with_local_offset(Vec3::new(0.0, 0.0, -2.0));
        let (goal, _) = solve(config, None, None, Pose::IDENTITY);

        let expected = angles::from_yaw_degrees(1.0) * Vec3::new(0.0, 0.0, -2.0);
        assert!((goal.position - expected).length() < EPS);
        assert!(goal.position.x.abs() > 1e-2);
        // FollowTracked has nothing to follow.
        assert!(same_rotation(goal.rotation, Quat::IDENTITY));
    }

    #[test]
    fn default_offset_sits_in_front_of_target() {
        let config = OrbitalConfig::default();
        assert_eq!(config.local_offset, Vec3::new(0.0, -1.0, -1.0));

        let target = yaw_pose(Vec3::ZERO, 0.0);
        let (goal, _) = solve(config, Some(target), None, Pose::IDENTITY);
        let ahead = goal.position.dot(target.forward());
        assert!(ahead > 0.0);
    }

    #[test]
    fn builders_set_public_fields() {
        let config = OrbitalConfig::default()
            .with_orientation_mode(OrientationMode::CameraFacing)
            .with_local_offset(Vec3::X)
            .with_local_rotation_offset(Vec3::new(0.0, 10.0, 0.0))
            .with_world_offset(Vec3::Y)
            .with_angle_stepping(true)
            .with_tether_angle_steps(30);
        assert_eq!(config.orientation_mode, OrientationMode::CameraFacing);
        assert_eq!(config.local_offset, Vec3::X);
        assert_eq!(config.local_rotation_offset, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(config.world_offset, Vec3::Y);
        assert!(config.use_angle_stepping);
        assert_eq!(config.tether_angle_steps(), 24);
    }

    #[test]
    fn tether_steps_setter_clamps() {
        let mut config = OrbitalConfig::default();
        assert_eq!(config.tether_angle_steps(), 6);
        config.set_tether_angle_steps(1);
        assert_eq!(config.tether_angle_steps(), 2);
        config.set_tether_angle_steps(-40);
        assert_eq!(config.tether_angle_steps(), 2);
        config.set_tether_angle_steps(100);
        assert_eq!(config.tether_angle_steps(), 24);
    }

    #[test]
    fn preset_parses_and_clamps_steps() {
        let preset = OrbitalPreset::from_toml_str(
            r#"
            move_lerp_time = 0.3
            orientation_mode = "face_tracked"
            use_angle_stepping = true
            tether_angle_steps = 99
            local_offset = [0.0, 0.0, -1.5]
            "#,
        )
        .unwrap();
        assert_eq!(preset.solver.move_lerp_time, 0.3);
        assert_eq!(preset.orbital.orientation_mode, OrientationMode::FaceTracked);
        assert_eq!(preset.orbital.tether_angle_steps(), 24);
        assert_eq!(preset.orbital.local_offset, Vec3::new(0.0, 0.0, -1.5));

        let solver = OrbitalSolver::from_preset(&preset);
        assert_eq!(solver.base().config().move_lerp_time, 0.3);
    }

    #[test]
    fn preset_maps_unrecognized_mode_to_unknown() {
        let preset = OrbitalPreset::from_toml_str(r#"orientation_mode = "sideways""#).unwrap();
        assert_eq!(preset.orbital.orientation_mode, OrientationMode::Unknown);
    }
}
