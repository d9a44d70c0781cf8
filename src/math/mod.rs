//! Math utilities module
//!
//! Provides the `Pose` type, Euler/yaw helpers and re-exports from glam.

pub mod angles;
mod transform;

pub use transform::Pose;

// Re-export commonly used glam types
pub use glam::{Quat, Vec3};
