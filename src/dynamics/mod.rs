//! Per-frame blending and inertia used by the solvers.

mod momentum;
mod smoothing;

pub use momentum::{MomentumConfig, MomentumIntegrator, SETTLE_DISTANCE};
pub use smoothing::{smoothing_factor, Smoothable};
