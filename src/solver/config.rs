use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smoothing and lifetime settings shared by every solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Write to the shared goal pose instead of the host transform.
    pub update_linked_transform: bool,
    /// Seconds to close the position gap; 0 snaps.
    pub move_lerp_time: f32,
    pub rotate_lerp_time: f32,
    pub scale_lerp_time: f32,
    pub smoothing: bool,
    pub maintain_scale: bool,
    /// Seconds until the solver deactivates itself; 0 means forever.
    pub lifetime: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            update_linked_transform: false,
            move_lerp_time: 0.1,
            rotate_lerp_time: 0.1,
            scale_lerp_time: 0.0,
            smoothing: true,
            maintain_scale: true,
            lifetime: 0.0,
        }
    }
}

impl SolverConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = load_toml(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in self.times() {
            if !is_valid_time(value) {
                return Err(ConfigError::InvalidTime { field, value });
            }
        }
        Ok(())
    }

    /// Replaces negative or non-finite times with 0, logging each fix.
    pub fn sanitized(mut self) -> Self {
        for (field, value) in self.times() {
            if !is_valid_time(value) {
                log::warn!("{field} = {value} is not a valid duration, using 0");
            }
        }
        self.move_lerp_time = sanitize_time(self.move_lerp_time);
        self.rotate_lerp_time = sanitize_time(self.rotate_lerp_time);
        self.scale_lerp_time = sanitize_time(self.scale_lerp_time);
        self.lifetime = sanitize_time(self.lifetime);
        self
    }

    fn times(&self) -> [(&'static str, f32); 4] {
        [
            ("move_lerp_time", self.move_lerp_time),
            ("rotate_lerp_time", self.rotate_lerp_time),
            ("scale_lerp_time", self.scale_lerp_time),
            ("lifetime", self.lifetime),
        ]
    }
}

fn is_valid_time(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn sanitize_time(value: f32) -> f32 {
    if is_valid_time(value) {
        value
    } else {
        0.0
    }
}

pub(crate) fn load_toml<T: DeserializeOwned>(source: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(source)?)
}

/// Per-instance values that take precedence over a shared preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOverrides {
    pub update_linked_transform: Option<bool>,
    pub move_lerp_time: Option<f32>,
    pub rotate_lerp_time: Option<f32>,
    pub scale_lerp_time: Option<f32>,
    pub smoothing: Option<bool>,
    pub maintain_scale: Option<bool>,
    pub lifetime: Option<f32>,
}

impl SolverOverrides {
    pub fn apply_to(&self, base: SolverConfig) -> SolverConfig {
        SolverConfig {
            update_linked_transform: self
                .update_linked_transform
                .unwrap_or(base.update_linked_transform),
            move_lerp_time: self.move_lerp_time.unwrap_or(base.move_lerp_time),
            rotate_lerp_time: self.rotate_lerp_time.unwrap_or(base.rotate_lerp_time),
            scale_lerp_time: self.scale_lerp_time.unwrap_or(base.scale_lerp_time),
            smoothing: self.smoothing.unwrap_or(base.smoothing),
            maintain_scale: self.maintain_scale.unwrap_or(base.maintain_scale),
            lifetime: self.lifetime.unwrap_or(base.lifetime),
        }
    }
}

/// Where a solver's effective [`SolverConfig`] comes from.
#[derive(Debug, Clone, Default)]
pub struct SolverSettings {
    preset: Option<Arc<SolverConfig>>,
    overrides: SolverOverrides,
}

impl SolverSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: SolverConfig) -> Self {
        Self {
            preset: Some(Arc::new(config)),
            overrides: SolverOverrides::default(),
        }
    }

    pub fn with_preset(mut self, preset: Arc<SolverConfig>) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_overrides(mut self, overrides: SolverOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn preset(&self) -> Option<&SolverConfig> {
        self.preset.as_deref()
    }

    pub fn overrides(&self) -> &SolverOverrides {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut SolverOverrides {
        &mut self.overrides
    }

    /// Overrides laid over the preset, or over defaults without one.
    pub fn resolve(&self) -> SolverConfig {
        let base = self.preset.as_deref().copied().unwrap_or_default();
        self.overrides.apply_to(base).sanitized()
    }
}
