use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const SETTLE_DISTANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub resistance: f32,
    /// Drag is `resistance * speed^resistance_velocity_power`.
    pub resistance_velocity_power: f32,
    pub acceleration_rate: f32,
    /// Extra acceleration per unit of distance to the goal.
    pub springiness: f32,
    /// Hold the goal's depth along the tracked forward axis.
    pub snap_z: bool,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            resistance: 0.99,
            resistance_velocity_power: 1.5,
            acceleration_rate: 10.0,
            springiness: 0.0,
            snap_z: true,
        }
    }
}

impl MomentumConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("resistance", self.resistance),
            ("resistance_velocity_power", self.resistance_velocity_power),
            ("acceleration_rate", self.acceleration_rate),
            ("springiness", self.springiness),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("{value} is not finite"),
                });
            }
            if value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("{value} is negative"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MomentumIntegrator {
    velocity: Vec3,
}

impl MomentumIntegrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn cancel_along(&mut self, axis: Vec3) {
        let axis = axis.normalize_or_zero();
        self.velocity -= axis * self.velocity.dot(axis);
    }

    pub fn update(&mut self, current: Vec3, goal: Vec3, dt: f32, config: &MomentumConfig) -> Vec3 {
        if dt <= 0.0 {
            return current;
        }

        let delta = goal - current;
        let distance = delta.length();
        if distance > SETTLE_DISTANCE {
            let rate = config.acceleration_rate + config.springiness * distance;
            self.velocity += delta / distance * rate * dt;
        }

        let speed = self.velocity.length();
        if speed > 0.0 {
            let drag = config.resistance * speed.powf(config.resistance_velocity_power) * dt;
            self.velocity *= (speed - drag.min(speed)) / speed;
        }

        current + self.velocity * dt
    }
}
