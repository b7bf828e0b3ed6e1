//! Configuration for INKPACT signing sessions.
//!
//! Provides the validated configuration a session runs under: canvas
//! logical size, pen style, the required consent key-set, attestor
//! requirements, and network/geolocation timeouts.
//!
//! # Example
//!
//! ```
//! use inkpact_core::config::SessionConfig;
//! use std::time::Duration;
//!
//! let config = SessionConfig::builder()
//!     .with_canvas(400, 200)
//!     .with_required_consents(["terms", "esign-act"])
//!     .with_geolocation_timeout(Duration::from_secs(3))
//!     .build();
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use inkpact_capture::Rgba8;
use inkpact_consent::{AttestorRequirements, ConsentConfig};

/// Default canvas logical width in pixels.
const DEFAULT_CANVAS_WIDTH: u32 = 400;

/// Default canvas logical height in pixels.
const DEFAULT_CANVAS_HEIGHT: u32 = 200;

/// Default pen width in logical pixels.
const DEFAULT_PEN_WIDTH: f32 = 2.5;

/// Default bound on geolocation acquisition.
const DEFAULT_GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on one submission attempt.
const DEFAULT_SUBMISSION_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors found by [`SessionConfig::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Validated configuration for one signing session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Canvas logical width in pixels.
    pub canvas_width: u32,
    /// Canvas logical height in pixels.
    pub canvas_height: u32,
    /// Pen color for stroke rendering.
    pub pen_color: Rgba8,
    /// Pen width in logical pixels.
    pub pen_width: f32,
    /// The required consent key-set (never hardcoded).
    pub consent: ConsentConfig,
    /// Which attestor records are required.
    pub attestors: AttestorRequirements,
    /// Bound on best-effort geolocation acquisition.
    pub geolocation_timeout: Duration,
    /// Bound on one submission attempt.
    pub submission_timeout: Duration,
}

impl SessionConfig {
    /// Create a configuration builder.
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking fields in
    /// declaration order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "canvas".into(),
                reason: format!(
                    "dimensions must be non-zero, got {}x{}",
                    self.canvas_width, self.canvas_height
                ),
            });
        }
        if !self.pen_width.is_finite() || self.pen_width <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "pen_width".into(),
                reason: format!("must be a positive finite number, got {}", self.pen_width),
            });
        }
        if self.geolocation_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "geolocation_timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.submission_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "submission_timeout".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            pen_color: Rgba8::BLACK,
            pen_width: DEFAULT_PEN_WIDTH,
            consent: ConsentConfig::default(),
            attestors: AttestorRequirements::none(),
            geolocation_timeout: DEFAULT_GEOLOCATION_TIMEOUT,
            submission_timeout: DEFAULT_SUBMISSION_TIMEOUT,
        }
    }
}

/// Builder for [`SessionConfig`].
#[derive(Clone, Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Start from the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the canvas logical size.
    pub fn with_canvas(mut self, width: u32, height: u32) -> Self {
        self.config.canvas_width = width;
        self.config.canvas_height = height;
        self
    }

    /// Set the pen color.
    pub fn with_pen_color(mut self, color: Rgba8) -> Self {
        self.config.pen_color = color;
        self
    }

    /// Set the pen width.
    pub fn with_pen_width(mut self, width: f32) -> Self {
        self.config.pen_width = width;
        self
    }

    /// Set the required consent keys.
    pub fn with_required_consents<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.consent = ConsentConfig::new(keys);
        self
    }

    /// Require a complete witness record.
    pub fn require_witness(mut self) -> Self {
        self.config.attestors.witness_required = true;
        self
    }

    /// Require a complete notary record.
    pub fn require_notary(mut self) -> Self {
        self.config.attestors.notary_required = true;
        self
    }

    /// Bound geolocation acquisition.
    pub fn with_geolocation_timeout(mut self, timeout: Duration) -> Self {
        self.config.geolocation_timeout = timeout;
        self
    }

    /// Bound one submission attempt.
    pub fn with_submission_timeout(mut self, timeout: Duration) -> Self {
        self.config.submission_timeout = timeout;
        self
    }

    /// Finish building.
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_canvas_rejected() {
        let config = SessionConfig::builder().with_canvas(0, 200).build();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "canvas"));
    }

    #[test]
    fn test_bad_pen_width_rejected() {
        let config = SessionConfig::builder().with_pen_width(0.0).build();
        assert!(config.validate().is_err());
        let config = SessionConfig::builder().with_pen_width(f32::NAN).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let config = SessionConfig::builder()
            .with_geolocation_timeout(Duration::ZERO)
            .build();
        assert!(config.validate().is_err());
        let config = SessionConfig::builder()
            .with_submission_timeout(Duration::ZERO)
            .build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_sets_consents_and_attestors() {
        let config = SessionConfig::builder()
            .with_required_consents(["terms", "privacy"])
            .require_witness()
            .build();
        assert_eq!(config.consent.required_keys().len(), 2);
        assert!(config.attestors.witness_required);
        assert!(!config.attestors.notary_required);
    }
}
