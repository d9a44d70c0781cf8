use thiserror::Error;

/// Errors raised while loading or validating solver configuration.
///
/// Running solvers never fail; anomalies at runtime are logged and degraded
/// around instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {value} (must be finite and >= 0)")]
    InvalidTime { field: &'static str, value: f32 },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}
