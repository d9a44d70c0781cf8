//! Solvers module
//!
//! The [`SolverBase`] goal/working pipeline, the concrete solvers, and the
//! [`SolverHandler`] that chains them over one shared goal pose.

pub mod base;
pub mod config;
pub mod handler;
pub mod momentum;
pub mod orbital;

pub use base::{Frame, Solver, SolverBase, SolverState};
pub use config::{SolverConfig, SolverOverrides, SolverSettings};
pub use handler::{SolverHandler, SolverHandlerBuilder};
pub use momentum::{MomentumPreset, MomentumSolver};
pub use orbital::{OrbitalConfig, OrbitalPreset, OrbitalSolver, OrientationMode};
