//! Device context collection.
//!
//! Ambient host facilities (user agent, locale, screen, geolocation) are
//! wrapped behind the injected [`DeviceContextCollector`] trait returning
//! pure data, so core logic is testable without a real browser or device.
//!
//! Geolocation is strictly best-effort: acquisition runs under a bounded
//! timeout and degrades to [`GeolocationStatus::Unavailable`] on timeout
//! or refusal. It never blocks and never fails the workflow.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::debug;

use inkpact_evidence::{DeviceContext, GeolocationFix, GeolocationStatus};

/// Collects the client environment for evidence freezing.
///
/// Uses `async_trait` so collection can run on a spawned task regardless
/// of the concrete collector.
#[async_trait]
pub trait DeviceContextCollector: Send + Sync {
    /// The device profile, with geolocation left unavailable.
    async fn device_context(&self) -> DeviceContext;

    /// A best-effort geolocation reading, `None` when the host cannot or
    /// will not provide one.
    async fn geolocation(&self) -> Option<GeolocationFix>;
}

/// Collect the full device context with bounded geolocation.
///
/// The profile and the geolocation reading are acquired concurrently; the
/// reading is merged in when it arrives within `geolocation_timeout` and
/// recorded as unavailable otherwise.
pub async fn collect<C: DeviceContextCollector>(
    collector: &C,
    geolocation_timeout: Duration,
) -> DeviceContext {
    let (mut context, fix) = tokio::join!(
        collector.device_context(),
        timeout(geolocation_timeout, collector.geolocation()),
    );
    context.geolocation = match fix {
        Ok(Some(fix)) => GeolocationStatus::Fix(fix),
        Ok(None) => GeolocationStatus::unavailable("not provided by host"),
        Err(_) => {
            debug!(timeout_ms = geolocation_timeout.as_millis() as u64, "geolocation timed out");
            GeolocationStatus::unavailable("timed out")
        }
    };
    context
}

/// A collector returning fixed data, for tests and headless hosts.
#[derive(Clone, Debug)]
pub struct StaticContextCollector {
    context: DeviceContext,
    fix: Option<GeolocationFix>,
}

impl StaticContextCollector {
    /// Collector returning the given profile and no geolocation.
    pub fn new(context: DeviceContext) -> Self {
        Self { context, fix: None }
    }

    /// Collector returning the given profile and geolocation fix.
    pub fn with_fix(context: DeviceContext, fix: GeolocationFix) -> Self {
        Self {
            context,
            fix: Some(fix),
        }
    }
}

#[async_trait]
impl DeviceContextCollector for StaticContextCollector {
    async fn device_context(&self) -> DeviceContext {
        self.context.clone()
    }

    async fn geolocation(&self) -> Option<GeolocationFix> {
        self.fix.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpact_evidence::ScreenProfile;

    fn profile() -> DeviceContext {
        DeviceContext {
            user_agent: "test-agent".into(),
            locale: "en-US".into(),
            timezone: "UTC".into(),
            platform: "test".into(),
            screen: ScreenProfile {
                width_px: 800,
                height_px: 600,
                pixel_ratio: 1.0,
            },
            geolocation: GeolocationStatus::unavailable("pending"),
        }
    }

    fn fix() -> GeolocationFix {
        GeolocationFix {
            latitude: 51.5,
            longitude: -0.1,
            accuracy_m: 20.0,
            captured_at_ms: 1000,
        }
    }

    #[tokio::test]
    async fn test_collect_merges_fix() {
        let collector = StaticContextCollector::with_fix(profile(), fix());
        let context = collect(&collector, Duration::from_secs(1)).await;
        assert_eq!(context.geolocation.fix().unwrap().latitude, 51.5);
        assert_eq!(context.user_agent, "test-agent");
    }

    #[tokio::test]
    async fn test_collect_records_absence() {
        let collector = StaticContextCollector::new(profile());
        let context = collect(&collector, Duration::from_secs(1)).await;
        assert!(context.geolocation.fix().is_none());
    }

    #[tokio::test]
    async fn test_slow_geolocation_times_out() {
        struct SlowCollector;

        #[async_trait]
        impl DeviceContextCollector for SlowCollector {
            async fn device_context(&self) -> DeviceContext {
                DeviceContext::unknown()
            }

            async fn geolocation(&self) -> Option<GeolocationFix> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                None
            }
        }

        tokio::time::pause();
        let handle = tokio::spawn(async {
            let collector = SlowCollector;
            collect(&collector, Duration::from_millis(100)).await
        });
        tokio::time::advance(Duration::from_millis(150)).await;
        let context = handle.await.unwrap();
        assert!(matches!(
            context.geolocation,
            GeolocationStatus::Unavailable { .. }
        ));
    }
}
