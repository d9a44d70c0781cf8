//! # mr-solvers
//!
//! Spatial solvers for mixed-reality object placement: each frame they turn a
//! tracked pose (head, hand, controller) into a smoothed goal pose for an
//! object and move the object toward it.
//!
//! ## Features
//! - Goal/working pose pipeline with per-axis exponential smoothing
//! - Orbital solver with optional angle stepping around the tracked object
//! - Momentum solver that follows earlier solvers with inertia
//! - Solver chaining through a shared goal pose, in a fixed order
//! - TOML presets with per-instance overrides
//!
//! ## Example
//! ```rust,ignore
//! use mr_solvers::host::{FixedClock, PoseSlot};
//! use mr_solvers::solver::{OrbitalSolver, SolverHandler};
//! use mr_solvers::Pose;
//! use glam::Vec3;
//!
//! let head = PoseSlot::new(Pose::from_position(Vec3::new(0.0, 1.6, 0.0)));
//! let mut object = Pose::IDENTITY;
//!
//! let mut handler = SolverHandler::builder()
//!     .clock(FixedClock(1.0 / 60.0))
//!     .target(head.clone())
//!     .add_solver(OrbitalSolver::default())
//!     .build(&object);
//!
//! // Once per frame
//! handler.update(&mut object);
//! println!("object at {:?}", object.position);
//! ```

pub mod dynamics;
pub mod error;
pub mod host;
pub mod math;
pub mod solver;

pub use dynamics::{MomentumConfig, MomentumIntegrator, Smoothable};
pub use error::ConfigError;
pub use host::{Clock, HostTransform, TrackedTargetProvider, ViewerPoseProvider};
pub use math::Pose;
pub use solver::{
    Frame, MomentumPreset, MomentumSolver, OrbitalConfig, OrbitalPreset, OrbitalSolver,
    OrientationMode, Solver, SolverBase, SolverConfig, SolverHandler, SolverOverrides,
    SolverSettings, SolverState,
};
