//! Device context records.
//!
//! Pure data describing the client environment at signing time. Collection
//! happens behind an injected trait in `inkpact-core`; this crate only
//! defines the frozen shapes and the derived fingerprint. Geolocation is
//! best-effort: an unavailable reading is a recorded outcome, never an
//! error.

use serde::{Deserialize, Serialize};

use crate::domain::{domain_hash, purposes};
use crate::hash::Hash256;

/// Display characteristics of the capture device.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenProfile {
    /// Screen width in physical pixels.
    pub width_px: u32,
    /// Screen height in physical pixels.
    pub height_px: u32,
    /// Device pixel ratio (e.g. 2.0 on HiDPI displays).
    pub pixel_ratio: f32,
}

/// A best-effort geolocation reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeolocationFix {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Reported accuracy radius in meters.
    pub accuracy_m: f32,
    /// When the fix was obtained, in milliseconds.
    pub captured_at_ms: u64,
}

/// Outcome of geolocation acquisition.
///
/// Unavailability (denied permission, timeout, unsupported host) is an
/// ordinary recorded outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GeolocationStatus {
    /// A reading was obtained.
    Fix(GeolocationFix),
    /// No reading could be obtained.
    Unavailable {
        /// Why the reading is unavailable.
        reason: String,
    },
}

impl GeolocationStatus {
    /// Convenience constructor for the unavailable case.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The fix, if one was obtained.
    pub fn fix(&self) -> Option<&GeolocationFix> {
        match self {
            Self::Fix(fix) => Some(fix),
            Self::Unavailable { .. } => None,
        }
    }
}

/// The client environment frozen into an evidence package.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceContext {
    /// Client user agent string.
    pub user_agent: String,
    /// BCP 47 locale tag (e.g. `en-US`).
    pub locale: String,
    /// IANA timezone name (e.g. `America/New_York`).
    pub timezone: String,
    /// Host platform identifier (e.g. `desktop-linux`).
    pub platform: String,
    /// Display characteristics.
    pub screen: ScreenProfile,
    /// Best-effort geolocation outcome.
    pub geolocation: GeolocationStatus,
}

impl DeviceContext {
    /// A context recording that nothing could be collected.
    ///
    /// Used when the collector never reported before submission; every
    /// field degrades to an explicit unknown rather than blocking.
    pub fn unknown() -> Self {
        Self {
            user_agent: "unknown".into(),
            locale: "und".into(),
            timezone: "UTC".into(),
            platform: "unknown".into(),
            screen: ScreenProfile {
                width_px: 0,
                height_px: 0,
                pixel_ratio: 1.0,
            },
            geolocation: GeolocationStatus::unavailable("context collection did not complete"),
        }
    }

    /// Non-reversible fingerprint over the stable context fields.
    ///
    /// Geolocation is excluded: a fingerprint identifies the device
    /// profile, and a moving device is the same device.
    pub fn fingerprint(&self) -> Hash256 {
        domain_hash(
            purposes::DEVICE_FINGERPRINT,
            &[
                self.user_agent.as_bytes(),
                self.locale.as_bytes(),
                self.timezone.as_bytes(),
                self.platform.as_bytes(),
                &self.screen.width_px.to_be_bytes(),
                &self.screen.height_px.to_be_bytes(),
                &self.screen.pixel_ratio.to_be_bytes(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DeviceContext {
        DeviceContext {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".into(),
            locale: "en-US".into(),
            timezone: "America/New_York".into(),
            platform: "desktop-linux".into(),
            screen: ScreenProfile {
                width_px: 2560,
                height_px: 1440,
                pixel_ratio: 1.0,
            },
            geolocation: GeolocationStatus::unavailable("permission denied"),
        }
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(context().fingerprint(), context().fingerprint());
    }

    #[test]
    fn test_fingerprint_changes_with_profile() {
        let mut other = context();
        other.user_agent = "Mozilla/5.0 (Macintosh)".into();
        assert_ne!(context().fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_fingerprint_ignores_geolocation() {
        let mut moved = context();
        moved.geolocation = GeolocationStatus::Fix(GeolocationFix {
            latitude: 40.7,
            longitude: -74.0,
            accuracy_m: 15.0,
            captured_at_ms: 1000,
        });
        assert_eq!(context().fingerprint(), moved.fingerprint());
    }

    #[test]
    fn test_geolocation_accessors() {
        let status = GeolocationStatus::Fix(GeolocationFix {
            latitude: 1.0,
            longitude: 2.0,
            accuracy_m: 5.0,
            captured_at_ms: 10,
        });
        assert!(status.fix().is_some());
        assert!(GeolocationStatus::unavailable("timeout").fix().is_none());
    }

    #[test]
    fn test_unknown_context_is_explicit() {
        let ctx = DeviceContext::unknown();
        assert_eq!(ctx.user_agent, "unknown");
        assert!(ctx.geolocation.fix().is_none());
    }
}
